// crates/geoconf-store/tests/rocks_store.rs
//
// Integration tests for the RocksDB-backed run record store.
//
// Each test opens its own database under the system temp directory.

use uuid::Uuid;

use geoconf_core::error::GeoError;
use geoconf_core::legacy::LegacyMarker;
use geoconf_core::record::ConfigurationRecord;
use geoconf_core::tag::{RunId, GEOMETRY_CONFIGURATION_WRITER_LABEL};
use geoconf_core::traits::RunRecordStore;
use geoconf_store::RocksRunStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a temporary directory path using UUID to avoid conflicts.
fn temp_db_path(label: &str) -> String {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("geoconf_test_{}_{}", label, Uuid::now_v7()));
    path.to_string_lossy().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn configuration_survives_reopen() {
    let path = temp_db_path("reopen");
    let record = ConfigurationRecord::current("protodune-sp", "Name = \"protodune-sp\"\n");

    {
        let store = RocksRunStore::open(&path).unwrap();
        store
            .put_configuration(RunId(1), GEOMETRY_CONFIGURATION_WRITER_LABEL, &record)
            .await
            .unwrap();
    }

    let store = RocksRunStore::open(&path).unwrap();
    let found = store
        .get_configuration(RunId(1), GEOMETRY_CONFIGURATION_WRITER_LABEL)
        .await
        .unwrap();
    assert_eq!(found, Some(record.clone()));

    // Write-once holds across reopen too.
    let err = store
        .put_configuration(RunId(1), GEOMETRY_CONFIGURATION_WRITER_LABEL, &record)
        .await
        .unwrap_err();
    assert!(matches!(err, GeoError::AlreadyPersisted { .. }));

    let _ = std::fs::remove_dir_all(&path);
}

#[tokio::test]
async fn missing_configuration_is_none() {
    let path = temp_db_path("missing");
    let store = RocksRunStore::open(&path).unwrap();

    let found = store
        .get_configuration(RunId(9), GEOMETRY_CONFIGURATION_WRITER_LABEL)
        .await
        .unwrap();
    assert!(found.is_none());
    assert!(store.legacy_markers(RunId(9)).await.unwrap().is_empty());

    let _ = std::fs::remove_dir_all(&path);
}

#[tokio::test]
async fn legacy_markers_are_listed_per_run_by_label() {
    let path = temp_db_path("legacy");
    let store = RocksRunStore::open(&path).unwrap();

    store
        .put_legacy_marker(RunId(2), "sim", &LegacyMarker::new("lbne"))
        .await
        .unwrap();
    store
        .put_legacy_marker(RunId(2), "gen", &LegacyMarker::new("lbne35t"))
        .await
        .unwrap();
    store
        .put_legacy_marker(RunId(20), "gen", &LegacyMarker::new("other"))
        .await
        .unwrap();

    let markers = store.legacy_markers(RunId(2)).await.unwrap();
    assert_eq!(
        markers,
        vec![
            ("gen".to_string(), LegacyMarker::new("lbne35t")),
            ("sim".to_string(), LegacyMarker::new("lbne")),
        ]
    );

    let err = store
        .put_legacy_marker(RunId(2), "gen", &LegacyMarker::new("again"))
        .await
        .unwrap_err();
    assert!(matches!(err, GeoError::AlreadyPersisted { unit: RunId(2), .. }));

    let _ = std::fs::remove_dir_all(&path);
}

#[test]
fn open_existing_refuses_missing_database() {
    let path = temp_db_path("missing");

    let err = RocksRunStore::open_existing(&path).unwrap_err();
    assert!(matches!(err, GeoError::Storage(_)));
    assert!(!std::path::Path::new(&path).exists());
}

#[tokio::test]
async fn open_existing_reads_database_written_earlier() {
    let path = temp_db_path("existing");
    {
        let store = RocksRunStore::open(&path).unwrap();
        store
            .put_legacy_marker(RunId(3), "gen", &LegacyMarker::new("lbne"))
            .await
            .unwrap();
    }

    let store = RocksRunStore::open_existing(&path).unwrap();
    let markers = store.legacy_markers(RunId(3)).await.unwrap();
    assert_eq!(markers, vec![("gen".to_string(), LegacyMarker::new("lbne"))]);

    let _ = std::fs::remove_dir_all(&path);
}
