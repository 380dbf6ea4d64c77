// crates/geoconf-core/src/traits.rs

use async_trait::async_trait;

use crate::error::GeoError;
use crate::legacy::LegacyMarker;
use crate::record::ConfigurationRecord;
use crate::tag::RunId;

/// Source of the live geometry configuration.
///
/// Implemented by geoconf-cli (`GeometryService`). Implementations are
/// expected to be fully initialized before they are handed out.
pub trait GeometryProvider: Send + Sync {
    /// Name of the detector geometry in use.
    fn detector_name(&self) -> &str;

    /// Full configuration of the geometry service, rendered as text.
    fn configuration_text(&self) -> String;

    /// Version 2 record describing the live configuration.
    fn configuration_record(&self) -> ConfigurationRecord {
        ConfigurationRecord::current(self.detector_name(), self.configuration_text())
    }
}

/// Run-scoped persistent product store supplied by the host.
///
/// Implemented by geoconf-store (in-memory and RocksDB backends).
/// Products are write-once: a second put under the same run and tag must
/// fail with `GeoError::AlreadyPersisted`.
#[async_trait]
pub trait RunRecordStore: Send + Sync {
    /// Read the configuration record written by `label` into `unit`.
    async fn get_configuration(
        &self,
        unit: RunId,
        label: &str,
    ) -> Result<Option<ConfigurationRecord>, GeoError>;

    /// Persist a configuration record under `label` into `unit`.
    async fn put_configuration(
        &self,
        unit: RunId,
        label: &str,
        record: &ConfigurationRecord,
    ) -> Result<(), GeoError>;

    /// All legacy markers in `unit` with their producer labels, in the
    /// store's iteration order.
    async fn legacy_markers(&self, unit: RunId) -> Result<Vec<(String, LegacyMarker)>, GeoError>;

    /// Persist a legacy marker under `label` into `unit`.
    async fn put_legacy_marker(
        &self,
        unit: RunId,
        label: &str,
        marker: &LegacyMarker,
    ) -> Result<(), GeoError>;
}
