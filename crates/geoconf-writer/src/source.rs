// crates/geoconf-writer/src/source.rs
//
// Resolution of the "previous" configuration of a run, and of the
// "current" configuration from the live geometry.
//
// Lookup order for the previous configuration:
//   1. full record persisted by an earlier job under the writer label
//   2. first legacy `RunData` marker, upgraded to a version 1 record
//   3. nothing: this job is the first in the processing chain

use std::sync::Arc;

use geoconf_core::error::GeoError;
use geoconf_core::legacy::LegacyMarker;
use geoconf_core::record::ConfigurationRecord;
use geoconf_core::tag::{RunId, GEOMETRY_CONFIGURATION_WRITER_LABEL};
use geoconf_core::traits::{GeometryProvider, RunRecordStore};

/// What a run holds about its past geometry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredConfiguration {
    /// Full record written by a previous job.
    Full(ConfigurationRecord),
    /// Legacy marker, with the label of the producer that wrote it.
    Legacy { label: String, marker: LegacyMarker },
    /// No geometry information at all.
    Absent,
}

impl StoredConfiguration {
    /// Convert to the canonical record shape.
    ///
    /// Legacy markers become version 1 records; `Absent` becomes `None`.
    pub fn into_record(self) -> Option<ConfigurationRecord> {
        match self {
            StoredConfiguration::Full(record) => Some(record),
            StoredConfiguration::Legacy { marker, .. } => Some(marker.to_record()),
            StoredConfiguration::Absent => None,
        }
    }
}

/// Produces the previous and current configuration records of a run.
#[derive(Clone)]
pub struct RecordSource {
    geometry: Arc<dyn GeometryProvider>,
    input: Arc<dyn RunRecordStore>,
}

impl RecordSource {
    /// `input` is the store holding what earlier jobs wrote into the run.
    pub fn new(geometry: Arc<dyn GeometryProvider>, input: Arc<dyn RunRecordStore>) -> Self {
        Self { geometry, input }
    }

    /// Find what `unit` records about its past configuration.
    pub async fn lookup(&self, unit: RunId) -> Result<StoredConfiguration, GeoError> {
        if let Some(record) = self
            .input
            .get_configuration(unit, GEOMETRY_CONFIGURATION_WRITER_LABEL)
            .await?
        {
            tracing::debug!("Geometry configuration information from {}:\n{}", unit, record);
            return Ok(StoredConfiguration::Full(record));
        }

        let mut markers = self.input.legacy_markers(unit).await?.into_iter();
        let Some((label, marker)) = markers.next() else {
            tracing::debug!("No geometry configuration information in {}", unit);
            return Ok(StoredConfiguration::Absent);
        };

        for (ignored, other) in markers {
            tracing::debug!(
                "Ignoring additional legacy geometry record '{}' (name '{}') in {}",
                ignored,
                other.detector_name,
                unit
            );
        }
        tracing::debug!(
            "Built geometry configuration information from legacy record '{}' in {}:\n{}",
            label,
            unit,
            marker.to_record()
        );

        Ok(StoredConfiguration::Legacy { label, marker })
    }

    /// Previous configuration of `unit`, if any job recorded one.
    pub async fn previous(&self, unit: RunId) -> Result<Option<ConfigurationRecord>, GeoError> {
        Ok(self.lookup(unit).await?.into_record())
    }

    /// Configuration of the live geometry.
    pub fn current(&self) -> ConfigurationRecord {
        let record = self.geometry.configuration_record();
        tracing::debug!("Geometry configuration information from service:\n{}", record);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoconf_store::InMemoryRunStore;

    struct FixedGeometry;

    impl GeometryProvider for FixedGeometry {
        fn detector_name(&self) -> &str {
            "dune10kt"
        }

        fn configuration_text(&self) -> String {
            "Name = \"dune10kt\"\n".to_string()
        }
    }

    fn source(store: Arc<InMemoryRunStore>) -> RecordSource {
        RecordSource::new(Arc::new(FixedGeometry), store)
    }

    #[tokio::test]
    async fn full_record_wins_over_legacy_markers() {
        let store = Arc::new(InMemoryRunStore::new());
        let full = ConfigurationRecord::current("dune10kt", "text");
        store
            .put_legacy_marker(RunId(1), "legacy", &LegacyMarker::new("lbne"))
            .await
            .unwrap();
        store
            .put_configuration(RunId(1), GEOMETRY_CONFIGURATION_WRITER_LABEL, &full)
            .await
            .unwrap();

        let found = source(store).lookup(RunId(1)).await.unwrap();
        assert_eq!(found, StoredConfiguration::Full(full));
    }

    #[tokio::test]
    async fn first_legacy_marker_is_upgraded() {
        let store = Arc::new(InMemoryRunStore::new());
        store
            .put_legacy_marker(RunId(1), "gen", &LegacyMarker::new("lbne"))
            .await
            .unwrap();
        store
            .put_legacy_marker(RunId(1), "sim", &LegacyMarker::new("lbne35t"))
            .await
            .unwrap();

        let previous = source(store).previous(RunId(1)).await.unwrap();
        assert_eq!(previous, Some(ConfigurationRecord::legacy("lbne")));
    }

    #[tokio::test]
    async fn empty_run_has_no_previous() {
        let store = Arc::new(InMemoryRunStore::new());
        let src = source(store);
        assert_eq!(src.lookup(RunId(4)).await.unwrap(), StoredConfiguration::Absent);
        assert!(src.previous(RunId(4)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn current_comes_from_geometry() {
        let src = source(Arc::new(InMemoryRunStore::new()));
        let current = src.current();
        assert_eq!(current.data_version, 2);
        assert_eq!(current.detector_name, "dune10kt");
        assert_eq!(current.geometry_service_configuration, "Name = \"dune10kt\"\n");
    }

    #[test]
    fn into_record_covers_every_shape() {
        let full = ConfigurationRecord::current("a", "x");
        assert_eq!(StoredConfiguration::Full(full.clone()).into_record(), Some(full));
        assert_eq!(
            StoredConfiguration::Legacy {
                label: "l".into(),
                marker: LegacyMarker::new("b"),
            }
            .into_record(),
            Some(ConfigurationRecord::legacy("b"))
        );
        assert_eq!(StoredConfiguration::Absent.into_record(), None);
    }
}
