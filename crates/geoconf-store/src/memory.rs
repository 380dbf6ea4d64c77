// crates/geoconf-store/src/memory.rs
//
// In-memory run record store implementing the `RunRecordStore` trait.
//
// Products are kept per run in insertion order, so `legacy_markers` returns
// markers in the order they were put. Used by tests and by hosts that keep
// run products in memory until they write their own output.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use geoconf_core::error::GeoError;
use geoconf_core::legacy::LegacyMarker;
use geoconf_core::record::ConfigurationRecord;
use geoconf_core::tag::{ProductKind, ProductTag, RunId};
use geoconf_core::traits::RunRecordStore;

/// Products persisted into a single run.
#[derive(Debug, Default, Clone)]
struct RunProducts {
    configurations: Vec<(String, ConfigurationRecord)>,
    legacy_markers: Vec<(String, LegacyMarker)>,
}

/// Run-scoped product store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryRunStore {
    runs: RwLock<HashMap<RunId, RunProducts>>,
}

impl InMemoryRunStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of configuration records persisted into `unit`.
    pub fn configuration_count(&self, unit: RunId) -> Result<usize, GeoError> {
        Ok(self
            .read()?
            .get(&unit)
            .map_or(0, |products| products.configurations.len()))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<RunId, RunProducts>>, GeoError> {
        self.runs
            .read()
            .map_err(|_| GeoError::Storage("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<RunId, RunProducts>>, GeoError> {
        self.runs
            .write()
            .map_err(|_| GeoError::Storage("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl RunRecordStore for InMemoryRunStore {
    async fn get_configuration(
        &self,
        unit: RunId,
        label: &str,
    ) -> Result<Option<ConfigurationRecord>, GeoError> {
        let runs = self.read()?;
        Ok(runs.get(&unit).and_then(|products| {
            products
                .configurations
                .iter()
                .find(|(l, _)| l == label)
                .map(|(_, record)| record.clone())
        }))
    }

    async fn put_configuration(
        &self,
        unit: RunId,
        label: &str,
        record: &ConfigurationRecord,
    ) -> Result<(), GeoError> {
        let mut runs = self.write()?;
        let products = runs.entry(unit).or_default();
        if products.configurations.iter().any(|(l, _)| l == label) {
            return Err(GeoError::AlreadyPersisted {
                unit,
                tag: ProductTag::new(ProductKind::GeometryConfiguration, label),
            });
        }
        products
            .configurations
            .push((label.to_string(), record.clone()));
        Ok(())
    }

    async fn legacy_markers(&self, unit: RunId) -> Result<Vec<(String, LegacyMarker)>, GeoError> {
        let runs = self.read()?;
        Ok(runs
            .get(&unit)
            .map(|products| products.legacy_markers.clone())
            .unwrap_or_default())
    }

    async fn put_legacy_marker(
        &self,
        unit: RunId,
        label: &str,
        marker: &LegacyMarker,
    ) -> Result<(), GeoError> {
        let mut runs = self.write()?;
        let products = runs.entry(unit).or_default();
        if products.legacy_markers.iter().any(|(l, _)| l == label) {
            return Err(GeoError::AlreadyPersisted {
                unit,
                tag: ProductTag::run_data(label),
            });
        }
        products
            .legacy_markers
            .push((label.to_string(), marker.clone()));
        Ok(())
    }
}
