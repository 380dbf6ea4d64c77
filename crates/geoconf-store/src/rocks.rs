// crates/geoconf-store/src/rocks.rs
//
// RocksDB-backed persistent storage for run-level products.
//
// Key format:
//   `run:{number:010}:{kind}:{label}` -> JSON-serialized product
//
// The run number is zero-padded so that all products of a run share one
// prefix and `legacy_markers` can list a run's markers with a prefix scan.
// Markers therefore come back ordered by producer label.

use std::path::Path;

use async_trait::async_trait;
use rocksdb::{DBWithThreadMode, MultiThreaded, Options};
use serde::de::DeserializeOwned;
use serde::Serialize;

use geoconf_core::error::GeoError;
use geoconf_core::legacy::LegacyMarker;
use geoconf_core::record::ConfigurationRecord;
use geoconf_core::tag::{ProductKind, ProductTag, RunId};
use geoconf_core::traits::RunRecordStore;

/// RocksDB wrapper implementing the `RunRecordStore` trait.
#[derive(Debug)]
pub struct RocksRunStore {
    db: DBWithThreadMode<MultiThreaded>,
}

impl RocksRunStore {
    /// Open a RocksDB database at the given filesystem path.
    ///
    /// Creates the database directory if it does not exist.
    pub fn open(path: &str) -> Result<Self, GeoError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DBWithThreadMode::<MultiThreaded>::open(&opts, path)
            .map_err(|e| GeoError::Storage(format!("Failed to open RocksDB at {}: {}", path, e)))?;

        Ok(Self { db })
    }

    /// Open an existing RocksDB database at the given filesystem path.
    ///
    /// Fails with `GeoError::Storage` if there is no database there. Used for
    /// stores that must have been written by an earlier job.
    pub fn open_existing(path: &str) -> Result<Self, GeoError> {
        // RocksDB creates the directory before noticing the database is missing.
        if !Path::new(path).is_dir() {
            return Err(GeoError::Storage(format!("No run store at {}", path)));
        }

        let mut opts = Options::default();
        opts.create_if_missing(false);

        let db = DBWithThreadMode::<MultiThreaded>::open(&opts, path).map_err(|e| {
            GeoError::Storage(format!("No run store at {}: {}", path, e))
        })?;

        Ok(Self { db })
    }

    /// Prefix shared by all products of `kind` in `unit`.
    fn kind_prefix(unit: RunId, kind: ProductKind) -> String {
        format!("run:{:010}:{}:", unit.number(), kind.as_str())
    }

    /// Full key of the product identified by `tag` in `unit`.
    fn product_key(unit: RunId, tag: &ProductTag) -> Vec<u8> {
        format!("{}{}", Self::kind_prefix(unit, tag.kind), tag.label).into_bytes()
    }

    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, GeoError> {
        self.db
            .get(key)
            .map_err(|e| GeoError::Storage(format!("RocksDB get failed: {}", e)))
    }

    fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<(), GeoError> {
        self.db
            .put(key, value)
            .map_err(|e| GeoError::Storage(format!("RocksDB put failed: {}", e)))
    }

    /// Read and deserialize the product identified by `tag`.
    fn get_product<T: DeserializeOwned>(
        &self,
        unit: RunId,
        tag: &ProductTag,
    ) -> Result<Option<T>, GeoError> {
        match self.get_raw(&Self::product_key(unit, tag))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Serialize and write a product, refusing to overwrite an existing one.
    fn put_product_once<T: Serialize>(
        &self,
        unit: RunId,
        tag: ProductTag,
        product: &T,
    ) -> Result<(), GeoError> {
        let key = Self::product_key(unit, &tag);
        if self.get_raw(&key)?.is_some() {
            return Err(GeoError::AlreadyPersisted { unit, tag });
        }
        let json = serde_json::to_vec(product)?;
        self.put_raw(&key, &json)
    }

    /// All products of `kind` in `unit`, with their producer labels.
    fn list_products<T: DeserializeOwned>(
        &self,
        unit: RunId,
        kind: ProductKind,
    ) -> Result<Vec<(String, T)>, GeoError> {
        let prefix_str = Self::kind_prefix(unit, kind);
        let prefix = prefix_str.as_bytes();
        let mut products = Vec::new();

        for item in self.db.prefix_iterator(prefix) {
            let (key, value) = item
                .map_err(|e| GeoError::Storage(format!("RocksDB iteration error: {}", e)))?;

            // Stop when the prefix no longer matches.
            if !key.starts_with(prefix) {
                break;
            }

            let label = String::from_utf8_lossy(&key[prefix.len()..]).into_owned();
            let product: T = serde_json::from_slice(&value)?;
            products.push((label, product));
        }

        Ok(products)
    }
}

#[async_trait]
impl RunRecordStore for RocksRunStore {
    async fn get_configuration(
        &self,
        unit: RunId,
        label: &str,
    ) -> Result<Option<ConfigurationRecord>, GeoError> {
        self.get_product(unit, &ProductTag::new(ProductKind::GeometryConfiguration, label))
    }

    async fn put_configuration(
        &self,
        unit: RunId,
        label: &str,
        record: &ConfigurationRecord,
    ) -> Result<(), GeoError> {
        self.put_product_once(
            unit,
            ProductTag::new(ProductKind::GeometryConfiguration, label),
            record,
        )
    }

    async fn legacy_markers(&self, unit: RunId) -> Result<Vec<(String, LegacyMarker)>, GeoError> {
        self.list_products(unit, ProductKind::RunData)
    }

    async fn put_legacy_marker(
        &self,
        unit: RunId,
        label: &str,
        marker: &LegacyMarker,
    ) -> Result<(), GeoError> {
        self.put_product_once(unit, ProductTag::run_data(label), marker)
    }
}
