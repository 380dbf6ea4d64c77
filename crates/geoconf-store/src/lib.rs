// crates/geoconf-store/src/lib.rs
//
// geoconf-store: Run record stores for the geometry configuration protocol.
//
// Provides an in-memory store for tests and embedding hosts, and a
// RocksDB-backed store used by the command-line host to persist run
// products between jobs. Both enforce write-once products per run.

pub mod memory;
pub mod rocks;

// Re-export key types for ergonomic access from downstream crates.
pub use memory::InMemoryRunStore;
pub use rocks::RocksRunStore;
