// crates/geoconf-verify/src/lib.rs
//
// geoconf-verify: Compatibility rules between geometry configuration records,
// and run-level checks that geometry information is present.

pub mod compat;
pub mod info_check;

// Re-export key types for ergonomic access from downstream crates.
pub use compat::CompatibilityChecker;
pub use info_check::{GeometryInfoCheck, InfoCheckConfig, InfoCheckOutcome, InfoRequirement};
