// crates/geoconf-core/src/legacy.rs
//
// Legacy `RunData` marker: the run-level summary older jobs wrote before the
// full configuration record existed. It carries only a detector name.

use serde::{Deserialize, Serialize};

use crate::record::ConfigurationRecord;

/// Minimal legacy record carrying a detector name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMarker {
    /// Detector name, lower-cased by the writers that produced it.
    pub detector_name: String,
}

impl LegacyMarker {
    pub fn new(detector_name: impl Into<String>) -> Self {
        Self {
            detector_name: detector_name.into(),
        }
    }

    /// Upgrade to the version 1 configuration record format.
    pub fn to_record(&self) -> ConfigurationRecord {
        ConfigurationRecord::legacy(self.detector_name.clone())
    }
}
