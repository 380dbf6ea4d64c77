// crates/geoconf-cli/src/output.rs
//
// Output formatting utilities for the geoconf CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

use geoconf_core::legacy::LegacyMarker;
use geoconf_core::record::ConfigurationRecord;
use geoconf_core::tag::ProductKind;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

/// One geometry product of a run, as listed by `geoconf show`.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ProductRow {
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Version")]
    pub data_version: u32,
    #[tabled(rename = "Detector")]
    pub detector_name: String,
    #[tabled(rename = "Digest")]
    pub digest: String,
}

impl ProductRow {
    pub fn from_record(label: &str, record: &ConfigurationRecord) -> Self {
        Self {
            kind: ProductKind::GeometryConfiguration.as_str().to_string(),
            label: label.to_string(),
            data_version: record.data_version,
            detector_name: record.detector_name.clone(),
            digest: short_digest(record),
        }
    }

    pub fn from_marker(label: &str, marker: &LegacyMarker) -> Self {
        Self {
            kind: ProductKind::RunData.as_str().to_string(),
            label: label.to_string(),
            data_version: 0,
            detector_name: marker.detector_name.clone(),
            digest: "-".to_string(),
        }
    }
}

/// First 12 hex digits of the configuration digest, or "-" without text.
fn short_digest(record: &ConfigurationRecord) -> String {
    if !record.has_configuration_text() {
        return "-".to_string();
    }
    record.configuration_digest().chars().take(12).collect()
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_describe_both_product_kinds() {
        let full = ProductRow::from_record(
            "GeometryConfigurationWriter",
            &ConfigurationRecord::current("dune10kt", "Name = \"dune10kt\"\n"),
        );
        assert_eq!(full.kind, "geometry_configuration");
        assert_eq!(full.data_version, 2);
        assert_eq!(full.digest.len(), 12);

        let legacy = ProductRow::from_record("x", &ConfigurationRecord::legacy("lbne"));
        assert_eq!(legacy.digest, "-");

        let marker = ProductRow::from_marker("gen", &LegacyMarker::new("lbne"));
        assert_eq!(marker.kind, "run_data");
        assert_eq!(marker.detector_name, "lbne");
    }

    #[test]
    fn table_and_json_contain_fields() {
        let rows = vec![ProductRow::from_marker("gen", &LegacyMarker::new("lbne"))];

        let table = format_table(&rows);
        assert!(table.contains("Detector"));
        assert!(table.contains("lbne"));

        let json = format_json(&rows);
        assert!(json.contains("\"detector_name\": \"lbne\""));
    }
}
