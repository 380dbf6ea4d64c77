// crates/geoconf-cli/src/config.rs
//
// Job configuration for the geoconf CLI.
// Loaded from a TOML file or populated with sensible defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

use geoconf_verify::InfoCheckConfig;

/// Runtime configuration of one job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Directory of the RocksDB run store this job writes into.
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Geometry service configuration.
    #[serde(default)]
    pub geometry: GeometryConfig,

    /// Checks run by `geoconf check`.
    #[serde(default, alias = "GeometryInfoCheck")]
    pub check: InfoCheckConfig,
}

fn default_store_path() -> String {
    "~/.geoconf/runs".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            log_level: default_log_level(),
            geometry: GeometryConfig::default(),
            check: InfoCheckConfig::default(),
        }
    }
}

impl JobConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: JobConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from `path`, or `None` if there is no file there.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_if_present(path: &str) -> Result<Option<Self>, Box<dyn std::error::Error>> {
        match Self::load(path) {
            Ok(config) => Ok(Some(config)),
            Err(e)
                if e
                    .downcast_ref::<io::Error>()
                    .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Configuration table of the geometry service.
///
/// Keys keep the names used in geometry configuration files. The whole
/// table, serialized back to TOML, is the configuration text stamped into
/// version 2 records, so field order here is the order of that text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Detector name.
    #[serde(rename = "Name", default)]
    pub name: String,

    /// Prepended to the GDML and ROOT file names.
    #[serde(rename = "RelativePath", default)]
    pub relative_path: String,

    /// GDML description file (mandatory).
    #[serde(rename = "GDML", default)]
    pub gdml: String,

    /// ROOT description file.
    #[serde(rename = "ROOT", default)]
    pub root: String,

    /// Serve Geant4 the "_nowires" variant of the GDML file.
    #[serde(rename = "DisableWiresInG4", default)]
    pub disable_wires_in_g4: bool,

    /// Downgrade configuration mismatches to warnings.
    #[serde(
        rename = "SkipConfigurationCheck",
        alias = "skip_configuration_check",
        default
    )]
    pub skip_configuration_check: bool,

    /// Channel map sorting parameters (opaque).
    #[serde(rename = "SortingParameters", default)]
    pub sorting_parameters: toml::Table,

    /// Geometry builder parameters (opaque).
    #[serde(rename = "Builder", default)]
    pub builder: toml::Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_empty_file() {
        let config: JobConfig = toml::from_str("").unwrap();
        assert_eq!(config.store_path, "~/.geoconf/runs");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.geometry, GeometryConfig::default());
        assert!(!config.geometry.skip_configuration_check);
        assert!(config.check.geometry_info.is_none());
        assert!(config.check.legacy_info.is_none());
    }

    #[test]
    fn parses_geometry_table_with_file_key_names() {
        let config: JobConfig = toml::from_str(
            r#"
            store_path = "/data/runs"
            log_level = "debug"

            [geometry]
            Name = "dune10kt_v1"
            RelativePath = "dune/"
            GDML = "dune10kt_v1.gdml"
            ROOT = "dune10kt_v1.gdml"
            DisableWiresInG4 = true
            SkipConfigurationCheck = true

            [geometry.SortingParameters]
            tool_type = "GeoObjectSorterAPA"

            [geometry.Builder]
            tool_type = "GeometryBuilderStandard"
            "#,
        )
        .unwrap();

        assert_eq!(config.store_path, "/data/runs");
        assert_eq!(config.log_level, "debug");
        let geometry = &config.geometry;
        assert_eq!(geometry.name, "dune10kt_v1");
        assert_eq!(geometry.relative_path, "dune/");
        assert_eq!(geometry.gdml, "dune10kt_v1.gdml");
        assert!(geometry.disable_wires_in_g4);
        assert!(geometry.skip_configuration_check);
        assert_eq!(
            geometry.sorting_parameters.get("tool_type").and_then(|v| v.as_str()),
            Some("GeoObjectSorterAPA")
        );
        assert_eq!(geometry.builder.len(), 1);
    }

    #[test]
    fn skip_flag_accepts_snake_case_key() {
        let config: JobConfig =
            toml::from_str("[geometry]\nName = \"lbne\"\nskip_configuration_check = true\n")
                .unwrap();
        assert!(config.geometry.skip_configuration_check);
    }

    #[test]
    fn parses_check_section() {
        let config: JobConfig = toml::from_str(
            r#"
            [check.GeometryInfo]
            Name = "DUNE10kt"

            [check.LegacyInfo]
            Required = false
            "#,
        )
        .unwrap();

        let geometry_info = config.check.geometry_info.unwrap();
        assert_eq!(geometry_info.name.as_deref(), Some("DUNE10kt"));
        assert!(geometry_info.required);
        assert!(!config.check.legacy_info.unwrap().required);
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("geoconf_job_{}.toml", uuid::Uuid::now_v7()));
        fs::write(&path, "store_path = \"/tmp/x\"\n[geometry]\nName = \"lbne\"\n").unwrap();

        let config = JobConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.store_path, "/tmp/x");
        assert_eq!(config.geometry.name, "lbne");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_reports_missing_file() {
        assert!(JobConfig::load("/nonexistent/geoconf/job.toml").is_err());
    }

    #[test]
    fn missing_file_is_not_present() {
        let loaded = JobConfig::load_if_present("/nonexistent/geoconf/job.toml").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_file_is_an_error_not_defaults() {
        let path = std::env::temp_dir().join(format!("geoconf_bad_{}.toml", uuid::Uuid::now_v7()));
        fs::write(&path, "[check.GeometryInfo\nName = \"dune10kt\"\n").unwrap();

        let result = JobConfig::load_if_present(path.to_str().unwrap());
        assert!(result.is_err());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn present_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("geoconf_ok_{}.toml", uuid::Uuid::now_v7()));
        fs::write(&path, "[check.GeometryInfo]\nName = \"dune10kt\"\n").unwrap();

        let config = JobConfig::load_if_present(path.to_str().unwrap())
            .unwrap()
            .unwrap();
        assert!(config.check.geometry_info.is_some());

        let _ = fs::remove_file(&path);
    }
}
