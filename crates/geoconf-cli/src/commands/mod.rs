// crates/geoconf-cli/src/commands/mod.rs
//
// Command module declarations for the geoconf CLI, and helpers shared by
// the commands.

pub mod check;
pub mod legacy;
pub mod show;
pub mod write;

use geoconf_core::error::GeoError;
use geoconf_core::tag::RunId;
use geoconf_store::RocksRunStore;

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}

/// Open the RocksDB run store at `path` (tilde-expanded).
pub fn open_store(path: &str) -> Result<RocksRunStore, GeoError> {
    let path = expand_tilde(path);
    let store = RocksRunStore::open(&path)?;
    tracing::debug!("Opened run store at {}", path);
    Ok(store)
}

/// Open the RocksDB run store at `path` (tilde-expanded), which must exist.
///
/// Used for stores that are only read: a mistyped path must fail rather than
/// look like an empty run.
pub fn open_existing_store(path: &str) -> Result<RocksRunStore, GeoError> {
    let path = expand_tilde(path);
    let store = RocksRunStore::open_existing(&path)?;
    tracing::debug!("Opened existing run store at {}", path);
    Ok(store)
}

/// Run numbers given on the command line, in order.
pub fn run_ids(numbers: &[u32]) -> Vec<RunId> {
    numbers.iter().copied().map(RunId).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_leaves_absolute_paths_alone() {
        assert_eq!(expand_tilde("/data/runs"), "/data/runs");
        assert_eq!(expand_tilde("relative/runs"), "relative/runs");
    }

    #[test]
    fn expand_tilde_uses_home_dir() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_tilde("~/.geoconf/runs"),
                format!("{}/.geoconf/runs", home.display())
            );
        }
    }

    #[test]
    fn existing_store_is_required() {
        let path = test_support::temp_db_path("absent");
        let err = open_existing_store(&path).unwrap_err();
        assert!(matches!(err, GeoError::Storage(_)));
    }

    #[test]
    fn run_ids_keep_order() {
        assert_eq!(run_ids(&[3, 1]), vec![RunId(3), RunId(1)]);
    }
}
