// crates/geoconf-cli/src/commands/write.rs
//
// `geoconf write`: stamp the geometry configuration into runs.
//
// Reads what earlier jobs recorded from the input store (if any), checks it
// against the job's geometry, and writes the authoritative record into the
// output store. Without an input store the job starts a processing chain.

use std::sync::Arc;

use clap::Args;

use geoconf_core::error::GeoError;
use geoconf_core::tag::RunId;
use geoconf_core::traits::{GeometryProvider, RunRecordStore};
use geoconf_store::InMemoryRunStore;
use geoconf_writer::{ConfigurationWriter, UnitOutcome, Verdict, WriterPolicy};

use super::{expand_tilde, open_existing_store, open_store, run_ids};
use crate::config::JobConfig;
use crate::geometry::GeometryService;

/// Arguments of `geoconf write`.
#[derive(Debug, Args)]
pub struct WriteCmd {
    /// Run number to process; repeat for several runs.
    #[arg(long = "run", required = true)]
    pub runs: Vec<u32>,

    /// Store written by the previous job of the chain (must exist).
    #[arg(long)]
    pub input: Option<String>,

    /// Store to write into (default: `store_path` from the job configuration).
    #[arg(long)]
    pub output: Option<String>,

    /// Only warn on configuration mismatch.
    #[arg(long)]
    pub skip_configuration_check: bool,
}

/// Run the write command.
pub async fn run(cmd: &WriteCmd, config: &JobConfig) -> Result<(), Box<dyn std::error::Error>> {
    let geometry = Arc::new(GeometryService::new(config.geometry.clone())?);
    let policy = WriterPolicy::from_skip_check(
        cmd.skip_configuration_check || config.geometry.skip_configuration_check,
    );

    let output_path = expand_tilde(cmd.output.as_deref().unwrap_or(&config.store_path));
    let input: Arc<dyn RunRecordStore> = match &cmd.input {
        Some(path) => {
            if expand_tilde(path) == output_path {
                return Err(GeoError::Config(format!(
                    "input and output stores must differ (both {})",
                    output_path
                ))
                .into());
            }
            Arc::new(open_existing_store(path)?)
        }
        None => {
            tracing::info!("No input store: this job starts a processing chain");
            Arc::new(InMemoryRunStore::new())
        }
    };
    let output: Arc<dyn RunRecordStore> = Arc::new(open_store(&output_path)?);

    tracing::info!(
        "Writing geometry configuration of '{}' into {} ({} run(s), mismatch {})",
        geometry.detector_name(),
        output_path,
        cmd.runs.len(),
        if policy.fatal_on_mismatch { "fatal" } else { "tolerated" }
    );

    tracing::debug!(
        "GDML description {}, served to Geant4 as {}",
        geometry.gdml_path(),
        geometry.geant4_path()
    );

    let outcomes = write_runs(geometry, input, output, policy, &run_ids(&cmd.runs)).await?;
    for outcome in &outcomes {
        println!("{}", describe(outcome));
    }

    Ok(())
}

/// Process `runs` in order, stopping at the first error.
pub async fn write_runs(
    geometry: Arc<dyn GeometryProvider>,
    input: Arc<dyn RunRecordStore>,
    output: Arc<dyn RunRecordStore>,
    policy: WriterPolicy,
    runs: &[RunId],
) -> Result<Vec<UnitOutcome>, GeoError> {
    let mut writer = ConfigurationWriter::new(geometry, input, output, policy);
    let mut outcomes = Vec::with_capacity(runs.len());
    for &unit in runs {
        outcomes.push(writer.on_unit_open(unit).await?);
    }
    Ok(outcomes)
}

/// One-line summary of a writer pass.
fn describe(outcome: &UnitOutcome) -> String {
    let verdict = match &outcome.verdict {
        Verdict::FirstInChain => "first in chain".to_string(),
        Verdict::Compatible => "compatible".to_string(),
        Verdict::MismatchTolerated(reason) => format!("MISMATCH tolerated: {}", reason),
    };
    format!(
        "{}: '{}' (version {}, {:?}) {}",
        outcome.unit,
        outcome.persisted.detector_name,
        outcome.persisted.data_version,
        outcome.origin,
        verdict
    )
}
