// crates/geoconf-writer/src/lib.rs
//
// geoconf-writer: The per-run geometry configuration protocol.
//
// On every run opening, the configuration writer resolves what earlier jobs
// recorded about the geometry (full record, legacy marker, or nothing),
// checks it against the live geometry, and persists exactly one
// authoritative record into the output run. A legacy marker writer is
// provided to produce pre-protocol inputs.

pub mod legacy_writer;
pub mod source;
pub mod state;
pub mod writer;

// Re-export key types for ergonomic access from downstream crates.
pub use legacy_writer::{LegacyGeometryInfoWriter, LEGACY_WRITER_LABEL};
pub use source::{RecordSource, StoredConfiguration};
pub use state::{WriterState, WriterStateMachine};
pub use writer::{ConfigurationWriter, RecordOrigin, UnitOutcome, Verdict, WriterPolicy};
