// crates/geoconf-writer/src/legacy_writer.rs
//
// Producer of legacy `RunData` markers.
//
// Writes the same lower-cased detector name into every run it opens, the
// way jobs did before the full configuration record existed. Used to build
// legacy-format inputs for the configuration writer.

use std::sync::Arc;

use geoconf_core::error::GeoError;
use geoconf_core::legacy::LegacyMarker;
use geoconf_core::tag::RunId;
use geoconf_core::traits::RunRecordStore;

/// Default producer label of the legacy writer.
pub const LEGACY_WRITER_LABEL: &str = "LegacyGeometryInfoWriter";

/// Writes a legacy marker into each run.
pub struct LegacyGeometryInfoWriter {
    label: String,
    marker: LegacyMarker,
    output: Arc<dyn RunRecordStore>,
}

impl LegacyGeometryInfoWriter {
    /// The detector name is lower-cased once, at construction. Only ASCII
    /// letters change.
    pub fn new(
        label: impl Into<String>,
        detector_name: &str,
        output: Arc<dyn RunRecordStore>,
    ) -> Self {
        Self {
            label: label.into(),
            marker: LegacyMarker::new(detector_name.to_ascii_lowercase()),
            output,
        }
    }

    pub fn marker(&self) -> &LegacyMarker {
        &self.marker
    }

    /// Put a copy of the marker into `unit`.
    pub async fn on_unit_open(&self, unit: RunId) -> Result<(), GeoError> {
        self.output
            .put_legacy_marker(unit, &self.label, &self.marker)
            .await?;
        tracing::debug!(
            "Wrote legacy geometry record '{}' (name '{}') into {}",
            self.label,
            self.marker.detector_name,
            unit
        );
        Ok(())
    }
}
