// crates/geoconf-writer/src/writer.rs
//
// ConfigurationWriter: stamps the authoritative geometry configuration into
// each run and enforces compatibility with what earlier jobs recorded.
//
// Once a processing chain has established a record, it is carried forward
// unchanged: only the first job of a chain stamps its own configuration.

use std::sync::Arc;

use geoconf_core::error::{GeoError, Incompatibility, MismatchReport};
use geoconf_core::record::ConfigurationRecord;
use geoconf_core::tag::{RunId, GEOMETRY_CONFIGURATION_WRITER_LABEL};
use geoconf_core::traits::{GeometryProvider, RunRecordStore};
use geoconf_verify::CompatibilityChecker;

use crate::source::{RecordSource, StoredConfiguration};
use crate::state::{WriterState, WriterStateMachine};

/// What to do when the previous configuration is incompatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterPolicy {
    /// Abort the run on mismatch; otherwise only warn.
    pub fatal_on_mismatch: bool,
}

impl WriterPolicy {
    /// Policy matching the `SkipConfigurationCheck` option.
    pub fn from_skip_check(skip_configuration_check: bool) -> Self {
        Self {
            fatal_on_mismatch: !skip_configuration_check,
        }
    }
}

impl Default for WriterPolicy {
    fn default() -> Self {
        Self::from_skip_check(false)
    }
}

/// Where the persisted record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOrigin {
    /// Full record found in the input, carried forward.
    Full,
    /// Upgraded from the legacy marker written by `label`.
    Legacy { label: String },
    /// Stamped from the live geometry (first job in the chain).
    Current,
}

/// Result of the compatibility step of a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing to compare against.
    FirstInChain,
    /// Previous and current configurations are compatible.
    Compatible,
    /// Incompatible, but the policy let the run continue.
    MismatchTolerated(Incompatibility),
}

/// Summary of one completed writer pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOutcome {
    pub unit: RunId,
    /// Record written into the output run.
    pub persisted: ConfigurationRecord,
    pub origin: RecordOrigin,
    pub verdict: Verdict,
}

/// Writes geometry configuration information into runs.
pub struct ConfigurationWriter {
    source: RecordSource,
    output: Arc<dyn RunRecordStore>,
    checker: CompatibilityChecker,
    policy: WriterPolicy,
    state: WriterStateMachine,
}

impl ConfigurationWriter {
    /// Create a writer reading past records from `input` and writing the
    /// authoritative record into `output`.
    pub fn new(
        geometry: Arc<dyn GeometryProvider>,
        input: Arc<dyn RunRecordStore>,
        output: Arc<dyn RunRecordStore>,
        policy: WriterPolicy,
    ) -> Self {
        Self {
            source: RecordSource::new(geometry, input),
            output,
            checker: CompatibilityChecker::new(),
            policy,
            state: WriterStateMachine::new(),
        }
    }

    pub fn policy(&self) -> WriterPolicy {
        self.policy
    }

    pub fn state(&self) -> WriterState {
        self.state.current()
    }

    /// Process the opening of `unit`.
    ///
    /// On a fatal mismatch nothing is persisted and
    /// `GeoError::ConfigurationMismatch` carries both configurations.
    pub async fn on_unit_open(&mut self, unit: RunId) -> Result<UnitOutcome, GeoError> {
        let result = self.run_pass(unit).await;
        if result.is_err() {
            self.state.reset();
        }
        result
    }

    async fn run_pass(&mut self, unit: RunId) -> Result<UnitOutcome, GeoError> {
        self.state.transition(WriterState::CollectingPrevious)?;
        let stored = self.source.lookup(unit).await?;
        let found_origin = match &stored {
            StoredConfiguration::Full(_) => Some(RecordOrigin::Full),
            StoredConfiguration::Legacy { label, .. } => Some(RecordOrigin::Legacy {
                label: label.clone(),
            }),
            StoredConfiguration::Absent => None,
        };
        let previous = stored.into_record();

        self.state.transition(WriterState::CollectingCurrent)?;
        let current = self.source.current();

        self.state.transition(WriterState::Comparing)?;
        let verdict = match &previous {
            None => Verdict::FirstInChain,
            Some(previous) => match self.checker.compare(previous, &current) {
                Ok(()) => Verdict::Compatible,
                Err(reason) if self.policy.fatal_on_mismatch => {
                    return Err(GeoError::ConfigurationMismatch(Box::new(MismatchReport {
                        unit,
                        reason,
                        previous: previous.clone(),
                        current,
                    })));
                }
                Err(reason) => {
                    tracing::warn!(
                        "Geometry configuration in {} is not compatible with the current one ({}); continuing as configuration check is skipped",
                        unit,
                        reason
                    );
                    Verdict::MismatchTolerated(reason)
                }
            },
        };

        self.state.transition(WriterState::Persisting)?;
        let (persisted, origin) = match (previous, found_origin) {
            (Some(previous), Some(origin)) => (previous, origin),
            _ => (current, RecordOrigin::Current),
        };
        self.output
            .put_configuration(unit, GEOMETRY_CONFIGURATION_WRITER_LABEL, &persisted)
            .await?;

        self.state.transition(WriterState::Idle)?;
        tracing::debug!(
            "Persisted geometry configuration into {} ({:?}, digest {})",
            unit,
            origin,
            persisted.configuration_digest()
        );

        Ok(UnitOutcome {
            unit,
            persisted,
            origin,
            verdict,
        })
    }
}
