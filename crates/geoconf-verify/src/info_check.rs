// crates/geoconf-verify/src/info_check.rs
//
// Run-level check that geometry information is present in a run and, if
// requested, names the expected detector.
//
// Full records and legacy markers are checked independently; each check is
// optional. Name matching here ignores ASCII case, unlike the compatibility
// rule: it validates a user-typed expectation, not a job-to-job chain.

use serde::Deserialize;

use geoconf_core::error::GeoError;
use geoconf_core::legacy::LegacyMarker;
use geoconf_core::record::ConfigurationRecord;
use geoconf_core::tag::{ProductTag, RunId, GEOMETRY_CONFIGURATION_WRITER_LABEL};
use geoconf_core::traits::RunRecordStore;

/// What to require of one kind of geometry information.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfoRequirement {
    /// Expected detector name. Absent or empty accepts any name.
    #[serde(default, alias = "Name")]
    pub name: Option<String>,

    /// Whether a run without this information fails the check.
    #[serde(default = "default_required", alias = "Required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl InfoRequirement {
    /// Require presence, accepting any detector name.
    pub fn any() -> Self {
        Self {
            name: None,
            required: true,
        }
    }

    /// Require presence of the named detector.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            required: true,
        }
    }

    /// Make the information optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn expected_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    fn describe(&self) -> String {
        let name = match self.expected_name() {
            Some(name) => format!("must match '{}'", name),
            None => "(any name)".to_string(),
        };
        let kind = if self.required { "mandatory" } else { "optional" };
        format!("{} [{}]", name, kind)
    }
}

/// Configuration of `GeometryInfoCheck`. Each check runs only if present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InfoCheckConfig {
    /// Check on the full configuration record.
    #[serde(default, alias = "GeometryInfo")]
    pub geometry_info: Option<InfoRequirement>,

    /// Check on legacy `RunData` markers.
    #[serde(default, alias = "LegacyInfo")]
    pub legacy_info: Option<InfoRequirement>,
}

/// What the check found in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoCheckOutcome {
    /// Full record, if that check ran and found one.
    pub geometry_info: Option<ConfigurationRecord>,
    /// First legacy marker with its producer label, if that check ran and
    /// found any.
    pub legacy_info: Option<(String, LegacyMarker)>,
}

/// Verifies that geometry information is available in a run.
#[derive(Debug, Clone)]
pub struct GeometryInfoCheck {
    config: InfoCheckConfig,
}

impl GeometryInfoCheck {
    pub fn new(config: InfoCheckConfig) -> Self {
        tracing::debug!(
            "Geometry information check: full record {}; legacy {}",
            config
                .geometry_info
                .as_ref()
                .map_or_else(|| "not requested".to_string(), InfoRequirement::describe),
            config
                .legacy_info
                .as_ref()
                .map_or_else(|| "not requested".to_string(), InfoRequirement::describe),
        );
        Self { config }
    }

    /// Run the configured checks on `unit`.
    ///
    /// Returns `GeoError::CheckFailed` on the first failing check.
    pub async fn check_run(
        &self,
        store: &dyn RunRecordStore,
        unit: RunId,
    ) -> Result<InfoCheckOutcome, GeoError> {
        let mut outcome = InfoCheckOutcome::default();

        if let Some(requirement) = &self.config.geometry_info {
            outcome.geometry_info = Self::check_geometry_info(store, unit, requirement).await?;
        }
        if let Some(requirement) = &self.config.legacy_info {
            outcome.legacy_info = Self::check_legacy_info(store, unit, requirement).await?;
        }

        Ok(outcome)
    }

    async fn check_geometry_info(
        store: &dyn RunRecordStore,
        unit: RunId,
        requirement: &InfoRequirement,
    ) -> Result<Option<ConfigurationRecord>, GeoError> {
        let Some(record) = store
            .get_configuration(unit, GEOMETRY_CONFIGURATION_WRITER_LABEL)
            .await?
        else {
            tracing::debug!("No geometry information found in {}", unit);
            if !requirement.required {
                return Ok(None);
            }
            return Err(GeoError::CheckFailed(format!(
                "Required geometry information not found as '{}' in {}",
                ProductTag::geometry_configuration(),
                unit
            )));
        };

        tracing::debug!(
            "Found geometry information (version {}) in {}; geometry name is '{}'",
            record.data_version,
            unit,
            record.detector_name
        );

        if let Some(expected) = requirement.expected_name() {
            if !record.detector_name.eq_ignore_ascii_case(expected) {
                return Err(GeoError::CheckFailed(format!(
                    "Geometry information reports an unexpected name '{}' ('{}' expected)",
                    record.detector_name, expected
                )));
            }
        }

        Ok(Some(record))
    }

    async fn check_legacy_info(
        store: &dyn RunRecordStore,
        unit: RunId,
        requirement: &InfoRequirement,
    ) -> Result<Option<(String, LegacyMarker)>, GeoError> {
        let markers = store.legacy_markers(unit).await?;
        let Some((label, marker)) = markers.first().cloned() else {
            tracing::debug!("No legacy geometry information found in {}", unit);
            if !requirement.required {
                return Ok(None);
            }
            return Err(GeoError::CheckFailed(format!(
                "No legacy geometry information found in {}",
                unit
            )));
        };

        tracing::debug!(
            "Found {} legacy geometry records in {}; using '{}' (name '{}')",
            markers.len(),
            unit,
            label,
            marker.detector_name
        );

        if let Some(expected) = requirement.expected_name() {
            if !marker.detector_name.eq_ignore_ascii_case(expected) {
                return Err(GeoError::CheckFailed(format!(
                    "Geometry legacy information reports an unexpected name '{}' ('{}' expected)",
                    marker.detector_name, expected
                )));
            }
        }

        Ok(Some((label, marker)))
    }
}
