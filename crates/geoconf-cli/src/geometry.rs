// crates/geoconf-cli/src/geometry.rs
//
// Geometry service of a geoconf job.
//
// Holds the geometry configuration table and the version 2 record that
// describes it. The record is built once, at construction, so every run the
// job opens is compared against the same text.

use geoconf_core::error::GeoError;
use geoconf_core::record::ConfigurationRecord;
use geoconf_core::traits::GeometryProvider;

use crate::config::GeometryConfig;

/// Suffix of the GDML file served to Geant4 when wires are disabled.
const NO_WIRES_SUFFIX: &str = "_nowires";

/// Live geometry configured from a `[geometry]` table.
#[derive(Debug, Clone)]
pub struct GeometryService {
    config: GeometryConfig,
    record: ConfigurationRecord,
}

impl GeometryService {
    /// Validate the configuration and build its configuration record.
    pub fn new(config: GeometryConfig) -> Result<Self, GeoError> {
        if config.name.is_empty() {
            return Err(GeoError::Config(
                "geometry Name must not be empty".to_string(),
            ));
        }
        if config.gdml.is_empty() {
            return Err(GeoError::Config(format!(
                "geometry '{}' has no GDML file",
                config.name
            )));
        }

        let text = toml::to_string_pretty(&config)?;
        let record = ConfigurationRecord::current(config.name.clone(), text);
        tracing::debug!("Geometry configuration information:\n{}", record);

        Ok(Self { config, record })
    }

    /// Path of the GDML description, with the relative path prepended.
    pub fn gdml_path(&self) -> String {
        format!("{}{}", self.config.relative_path, self.config.gdml)
    }

    /// Path of the GDML description served to Geant4.
    pub fn geant4_path(&self) -> String {
        if !self.config.disable_wires_in_g4 {
            return self.gdml_path();
        }
        let gdml = &self.config.gdml;
        let name = match gdml.rfind('.') {
            Some(dot) => format!("{}{}{}", &gdml[..dot], NO_WIRES_SUFFIX, &gdml[dot..]),
            None => format!("{}{}", gdml, NO_WIRES_SUFFIX),
        };
        format!("{}{}", self.config.relative_path, name)
    }
}

impl GeometryProvider for GeometryService {
    fn detector_name(&self) -> &str {
        &self.record.detector_name
    }

    fn configuration_text(&self) -> String {
        self.record.geometry_service_configuration.clone()
    }

    fn configuration_record(&self) -> ConfigurationRecord {
        self.record.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str) -> GeometryConfig {
        GeometryConfig {
            name: name.to_string(),
            relative_path: "dune/".to_string(),
            gdml: format!("{}.gdml", name),
            root: format!("{}.gdml", name),
            ..GeometryConfig::default()
        }
    }

    #[test]
    fn record_is_version_two_with_configuration_keys() {
        let mut cfg = config("dune10kt_v1");
        cfg.skip_configuration_check = true;
        cfg.builder
            .insert("tool_type".to_string(), toml::Value::from("GeometryBuilderStandard"));
        let service = GeometryService::new(cfg).unwrap();

        let record = service.configuration_record();
        assert_eq!(record.data_version, 2);
        assert_eq!(record.detector_name, "dune10kt_v1");
        let text = &record.geometry_service_configuration;
        assert!(text.contains("Name = \"dune10kt_v1\""));
        assert!(text.contains("GDML = \"dune10kt_v1.gdml\""));
        assert!(text.contains("SkipConfigurationCheck = true"));
        assert!(text.contains("GeometryBuilderStandard"));
        assert_eq!(service.configuration_text(), *text);
    }

    #[test]
    fn configuration_text_parses_back_to_the_same_table() {
        let cfg = config("protodune-sp");
        let service = GeometryService::new(cfg.clone()).unwrap();
        let parsed: GeometryConfig = toml::from_str(&service.configuration_text()).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn same_configuration_gives_same_digest() {
        let a = GeometryService::new(config("dune10kt")).unwrap();
        let b = GeometryService::new(config("dune10kt")).unwrap();
        assert_eq!(
            a.configuration_record().configuration_digest(),
            b.configuration_record().configuration_digest()
        );
    }

    #[test]
    fn missing_name_or_gdml_is_rejected() {
        let err = GeometryService::new(GeometryConfig::default()).unwrap_err();
        assert!(matches!(err, GeoError::Config(_)));

        let mut cfg = config("lbne");
        cfg.gdml.clear();
        let err = GeometryService::new(cfg).unwrap_err();
        assert!(err.to_string().contains("'lbne' has no GDML file"));
    }

    #[test]
    fn geant4_path_follows_wire_flag() {
        let mut cfg = config("dune10kt");
        let service = GeometryService::new(cfg.clone()).unwrap();
        assert_eq!(service.gdml_path(), "dune/dune10kt.gdml");
        assert_eq!(service.geant4_path(), "dune/dune10kt.gdml");

        cfg.disable_wires_in_g4 = true;
        let service = GeometryService::new(cfg).unwrap();
        assert_eq!(service.geant4_path(), "dune/dune10kt_nowires.gdml");
    }
}
