// crates/geoconf-core/src/tag.rs
//
// Identifiers for processing units and the products persisted into them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Producer label under which the full configuration record is persisted.
pub const GEOMETRY_CONFIGURATION_WRITER_LABEL: &str = "GeometryConfigurationWriter";

/// Identifier of a processing unit (a run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub u32);

impl RunId {
    pub fn number(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run {}", self.0)
    }
}

/// Type of a run-level product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductKind {
    /// Full `ConfigurationRecord`.
    GeometryConfiguration,
    /// Legacy detector-name marker.
    RunData,
}

impl ProductKind {
    /// Stable short tag used in storage keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::GeometryConfiguration => "geometry_configuration",
            ProductKind::RunData => "run_data",
        }
    }
}

/// (product type, producer label) pair identifying a product within a run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductTag {
    pub kind: ProductKind,
    pub label: String,
}

impl ProductTag {
    pub fn new(kind: ProductKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
        }
    }

    /// Tag of the full record written by the configuration writer.
    pub fn geometry_configuration() -> Self {
        Self::new(
            ProductKind::GeometryConfiguration,
            GEOMETRY_CONFIGURATION_WRITER_LABEL,
        )
    }

    /// Tag of a legacy marker written by `label`.
    pub fn run_data(label: impl Into<String>) -> Self {
        Self::new(ProductKind::RunData, label)
    }
}

impl fmt::Display for ProductTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.label)
    }
}
