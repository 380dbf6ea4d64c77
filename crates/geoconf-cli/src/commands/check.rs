// crates/geoconf-cli/src/commands/check.rs
//
// `geoconf check`: verify that runs carry geometry information.
//
// Checks come from the `[check]` section of the job configuration; the
// command-line flags add or override them.

use clap::Args;

use geoconf_core::error::GeoError;
use geoconf_core::tag::RunId;
use geoconf_core::traits::RunRecordStore;
use geoconf_verify::{GeometryInfoCheck, InfoCheckConfig, InfoRequirement};

use super::{open_existing_store, run_ids};
use crate::config::JobConfig;

/// Arguments of `geoconf check`.
#[derive(Debug, Args)]
pub struct CheckCmd {
    /// Run number to check; repeat for several runs.
    #[arg(long = "run", required = true)]
    pub runs: Vec<u32>,

    /// Store to read (default: `store_path` from the job configuration).
    #[arg(long)]
    pub store: Option<String>,

    /// Require a full configuration record naming this detector.
    #[arg(long)]
    pub name: Option<String>,

    /// Require a legacy marker naming this detector.
    #[arg(long)]
    pub legacy_name: Option<String>,
}

/// Run the check command.
pub async fn run(cmd: &CheckCmd, config: &JobConfig) -> Result<(), Box<dyn std::error::Error>> {
    let check_config = effective_config(cmd, &config.check);
    if check_config.geometry_info.is_none() && check_config.legacy_info.is_none() {
        tracing::warn!("No geometry information check configured: nothing to verify");
    }

    let store = open_existing_store(cmd.store.as_deref().unwrap_or(&config.store_path))?;
    let check = GeometryInfoCheck::new(check_config);
    for unit in run_ids(&cmd.runs) {
        check_unit(&check, &store, unit).await?;
    }

    Ok(())
}

/// Merge command-line requirements over the configured ones.
fn effective_config(cmd: &CheckCmd, configured: &InfoCheckConfig) -> InfoCheckConfig {
    let mut config = configured.clone();
    if let Some(name) = &cmd.name {
        config.geometry_info = Some(InfoRequirement::named(name.clone()));
    }
    if let Some(name) = &cmd.legacy_name {
        config.legacy_info = Some(InfoRequirement::named(name.clone()));
    }
    config
}

async fn check_unit(
    check: &GeometryInfoCheck,
    store: &dyn RunRecordStore,
    unit: RunId,
) -> Result<(), GeoError> {
    let outcome = check.check_run(store, unit).await?;
    match &outcome.geometry_info {
        Some(record) => println!(
            "{}: geometry configuration '{}' (version {})",
            unit, record.detector_name, record.data_version
        ),
        None => println!("{}: no geometry configuration checked", unit),
    }
    if let Some((label, marker)) = &outcome.legacy_info {
        println!(
            "{}: legacy marker '{}' from '{}'",
            unit, marker.detector_name, label
        );
    }
    Ok(())
}
