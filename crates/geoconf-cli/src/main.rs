// crates/geoconf-cli/src/main.rs
//
// CLI entrypoint for the geometry configuration tools.
//
// Loads the job configuration, initializes tracing, and dispatches to the
// write, check, legacy and show subcommands. Any error is logged and turns
// into a non-zero exit code.

mod commands;
mod config;
mod geometry;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::check::CheckCmd;
use commands::legacy::LegacyCmd;
use commands::show::ShowCmd;
use commands::write::WriteCmd;
use config::JobConfig;

/// geoconf: geometry configuration consistency across processing jobs.
#[derive(Parser, Debug)]
#[command(
    name = "geoconf",
    version = "0.1.0",
    about = "Stamp and verify detector geometry configuration across processing chains"
)]
struct Cli {
    /// Path to the TOML job configuration file.
    #[arg(long, global = true, default_value = "~/.geoconf/job.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Write the geometry configuration record into runs.
    Write(WriteCmd),

    /// Check that runs carry the expected geometry information.
    Check(CheckCmd),

    /// Write legacy detector-name markers into runs.
    Legacy(LegacyCmd),

    /// Show the geometry products stored in a run.
    Show(ShowCmd),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from TOML file, falling back to defaults only if
    // there is no file. A file that does not parse stops the job.
    let config_path = commands::expand_tilde(&cli.config);
    let loaded = JobConfig::load_if_present(&config_path);
    let config = match &loaded {
        Ok(Some(cfg)) => cfg.clone(),
        _ => JobConfig::default(),
    };

    // RUST_LOG wins over the configured log level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &loaded {
        Ok(Some(_)) => tracing::info!("Loaded configuration from {}", config_path),
        Ok(None) => tracing::warn!("No config file at {}. Using defaults.", config_path),
        Err(e) => {
            tracing::error!("Could not load config from {}: {}", config_path, e);
            return ExitCode::FAILURE;
        }
    }
    tracing::info!("Store path: {}", config.store_path);
    tracing::info!(
        "Geometry: '{}' (GDML '{}{}')",
        config.geometry.name,
        config.geometry.relative_path,
        config.geometry.gdml
    );

    let result = match &cli.command {
        Commands::Write(cmd) => commands::write::run(cmd, &config).await,
        Commands::Check(cmd) => commands::check::run(cmd, &config).await,
        Commands::Legacy(cmd) => commands::legacy::run(cmd, &config).await,
        Commands::Show(cmd) => commands::show::run(cmd, &config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
