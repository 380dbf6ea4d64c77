// crates/geoconf-cli/src/commands/show.rs
//
// `geoconf show`: list the geometry products stored in a run.

use clap::Args;

use geoconf_core::error::GeoError;
use geoconf_core::tag::{RunId, GEOMETRY_CONFIGURATION_WRITER_LABEL};
use geoconf_core::traits::RunRecordStore;

use super::open_existing_store;
use crate::config::JobConfig;
use crate::output::{format_json, format_table, OutputFormat, ProductRow};

/// Arguments of `geoconf show`.
#[derive(Debug, Args)]
pub struct ShowCmd {
    /// Run number to inspect.
    #[arg(long)]
    pub run: u32,

    /// Store to read (default: `store_path` from the job configuration).
    #[arg(long)]
    pub store: Option<String>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Also print the full configuration text of the record.
    #[arg(long)]
    pub full: bool,
}

/// Run the show command.
pub async fn run(cmd: &ShowCmd, config: &JobConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_existing_store(cmd.store.as_deref().unwrap_or(&config.store_path))?;
    let unit = RunId(cmd.run);
    let rows = collect_rows(&store, unit).await?;

    if rows.is_empty() {
        println!("No geometry information in {}", unit);
        return Ok(());
    }

    match OutputFormat::from_json_flag(cmd.json) {
        OutputFormat::Table => println!("{}", format_table(&rows)),
        OutputFormat::Json => println!("{}", format_json(&rows)),
    }

    if cmd.full {
        if let Some(record) = store
            .get_configuration(unit, GEOMETRY_CONFIGURATION_WRITER_LABEL)
            .await?
        {
            println!();
            println!("{}", record);
        }
    }

    Ok(())
}

/// Full record first, then legacy markers in store order.
async fn collect_rows(store: &dyn RunRecordStore, unit: RunId) -> Result<Vec<ProductRow>, GeoError> {
    let mut rows = Vec::new();
    if let Some(record) = store
        .get_configuration(unit, GEOMETRY_CONFIGURATION_WRITER_LABEL)
        .await?
    {
        rows.push(ProductRow::from_record(
            GEOMETRY_CONFIGURATION_WRITER_LABEL,
            &record,
        ));
    }
    for (label, marker) in store.legacy_markers(unit).await? {
        rows.push(ProductRow::from_marker(&label, &marker));
    }
    Ok(rows)
}
