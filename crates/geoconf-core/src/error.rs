// crates/geoconf-core/src/error.rs

use std::fmt;

use thiserror::Error;

use crate::record::ConfigurationRecord;
use crate::tag::{ProductTag, RunId};

/// Protocol-wide error types for geometry configuration handling.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Storage layer error (RocksDB, in-memory store).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A product was put twice into the same run.
    #[error("Product {tag} already persisted in {unit}")]
    AlreadyPersisted { unit: RunId, tag: ProductTag },

    /// Previous and current geometry configurations are incompatible.
    #[error("{0}")]
    ConfigurationMismatch(Box<MismatchReport>),

    /// A geometry information check did not pass.
    #[error("Geometry information check failed: {0}")]
    CheckFailed(String),

    /// Invalid job or service configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid state transition.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<serde_json::Error> for GeoError {
    fn from(e: serde_json::Error) -> Self {
        GeoError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for GeoError {
    fn from(e: toml::de::Error) -> Self {
        GeoError::Serialization(e.to_string())
    }
}

impl From<toml::ser::Error> for GeoError {
    fn from(e: toml::ser::Error) -> Self {
        GeoError::Serialization(e.to_string())
    }
}

/// Why two configuration records are not compatible.
///
/// Checks run in the order of the variants; the first failure wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Incompatibility {
    #[error("invalid configuration A")]
    InvalidA,

    #[error("invalid configuration B")]
    InvalidB,

    #[error("detector name mismatch: '{a}' vs '{b}'")]
    DetectorNameMismatch { a: String, b: String },
}

/// Diagnostic payload of a fatal configuration mismatch.
///
/// Carries both records in full so that a version skew can be root-caused
/// from the error message alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchReport {
    pub unit: RunId,
    pub reason: Incompatibility,
    /// Configuration found in the input (or upgraded from a legacy marker).
    pub previous: ConfigurationRecord,
    /// Configuration of the geometry in this job.
    pub current: ConfigurationRecord,
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Geometry configuration in {} is not compatible with the current one ({})",
            self.unit, self.reason
        )?;
        write!(f, "\n--- previous configuration ---\n{}", self.previous)?;
        write!(f, "\n--- current configuration ---\n{}", self.current)?;
        Ok(())
    }
}
