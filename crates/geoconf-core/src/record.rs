// crates/geoconf-core/src/record.rs
//
// The versioned geometry configuration record persisted into each run.
//
// Version history:
//   0  unset (default-constructed); never valid
//   1  detector name only (legacy format, upgraded from `RunData`)
//   2  detector name + full geometry service configuration text

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Version of the record data layout.
pub type DataVersion = u32;

/// Layout written by default-constructed records. Never valid.
pub const DATA_VERSION_UNSET: DataVersion = 0;

/// Legacy layout: only the detector name is meaningful.
pub const DATA_VERSION_LEGACY: DataVersion = 1;

/// Current layout: detector name plus the full configuration text.
pub const DATA_VERSION_CURRENT: DataVersion = 2;

/// Summary of the geometry configuration a job was run with.
///
/// Records are immutable once built: they are either produced from the live
/// geometry provider or reconstructed from what a previous job persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    /// Layout version; governs which of the other fields are meaningful.
    pub data_version: DataVersion,
    /// Name of the detector geometry (version 1+). Compared case-sensitively.
    pub detector_name: String,
    /// Full geometry service configuration as text (version 2+).
    /// Diagnostic only: it is never part of a compatibility decision.
    #[serde(default)]
    pub geometry_service_configuration: String,
}

impl ConfigurationRecord {
    /// Build a version 2 record from the live geometry configuration.
    pub fn current(detector_name: impl Into<String>, configuration: impl Into<String>) -> Self {
        Self {
            data_version: DATA_VERSION_CURRENT,
            detector_name: detector_name.into(),
            geometry_service_configuration: configuration.into(),
        }
    }

    /// Build a version 1 record carrying only a detector name.
    pub fn legacy(detector_name: impl Into<String>) -> Self {
        Self {
            data_version: DATA_VERSION_LEGACY,
            detector_name: detector_name.into(),
            geometry_service_configuration: String::new(),
        }
    }

    /// Whether the record has been filled at all.
    pub fn is_valid(&self) -> bool {
        self.data_version >= DATA_VERSION_LEGACY
    }

    /// Whether the full configuration text is meaningful for this version.
    pub fn has_configuration_text(&self) -> bool {
        self.data_version >= DATA_VERSION_CURRENT
    }

    /// Lower-case hex SHA-256 of the configuration text.
    ///
    /// Used to summarize the configuration in one-line diagnostics.
    pub fn configuration_digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.geometry_service_configuration.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for ConfigurationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "invalid configuration record (version {})", self.data_version);
        }

        write!(f, "version: {}", self.data_version)?;
        write!(f, "\ndetector name: '{}'", self.detector_name)?;
        if self.has_configuration_text() {
            write!(
                f,
                "\nservice configuration:\n{}",
                self.geometry_service_configuration
            )?;
        }
        Ok(())
    }
}
