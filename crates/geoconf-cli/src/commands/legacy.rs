// crates/geoconf-cli/src/commands/legacy.rs
//
// `geoconf legacy`: write legacy `RunData` markers into runs.
//
// Produces inputs in the format used before full configuration records
// existed: only the (lower-cased) detector name of the job's geometry.

use std::sync::Arc;

use clap::Args;

use geoconf_writer::{LegacyGeometryInfoWriter, LEGACY_WRITER_LABEL};

use super::{open_store, run_ids};
use crate::config::JobConfig;

/// Arguments of `geoconf legacy`.
#[derive(Debug, Args)]
pub struct LegacyCmd {
    /// Run number to stamp; repeat for several runs.
    #[arg(long = "run", required = true)]
    pub runs: Vec<u32>,

    /// Store to write into (default: `store_path` from the job configuration).
    #[arg(long)]
    pub store: Option<String>,

    /// Producer label of the markers.
    #[arg(long, default_value = LEGACY_WRITER_LABEL)]
    pub label: String,

    /// Detector name (default: `Name` of the configured geometry).
    #[arg(long)]
    pub name: Option<String>,
}

/// Run the legacy command.
pub async fn run(cmd: &LegacyCmd, config: &JobConfig) -> Result<(), Box<dyn std::error::Error>> {
    let name = cmd.name.as_deref().unwrap_or(&config.geometry.name);
    if name.is_empty() {
        return Err("no detector name: pass --name or set geometry Name".into());
    }

    let store = Arc::new(open_store(cmd.store.as_deref().unwrap_or(&config.store_path))?);
    let writer = LegacyGeometryInfoWriter::new(cmd.label.clone(), name, store);

    for unit in run_ids(&cmd.runs) {
        writer.on_unit_open(unit).await?;
        println!(
            "{}: legacy marker '{}' written by '{}'",
            unit,
            writer.marker().detector_name,
            cmd.label
        );
    }

    Ok(())
}
