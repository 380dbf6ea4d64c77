// crates/geoconf-core/src/lib.rs
//
// geoconf-core: Core types, traits, and errors for the geometry
// configuration compatibility protocol.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the versioned configuration record, the legacy marker it can be
// upgraded from, run/product identifiers, the error taxonomy, and the
// interfaces of the two external collaborators (geometry provider and
// run record store).

pub mod error;
pub mod legacy;
pub mod record;
pub mod tag;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use geoconf_core::ConfigurationRecord;`

pub use error::{GeoError, Incompatibility, MismatchReport};
pub use legacy::LegacyMarker;
pub use record::{
    ConfigurationRecord, DataVersion, DATA_VERSION_CURRENT, DATA_VERSION_LEGACY,
    DATA_VERSION_UNSET,
};
pub use tag::{ProductKind, ProductTag, RunId, GEOMETRY_CONFIGURATION_WRITER_LABEL};
pub use traits::{GeometryProvider, RunRecordStore};
