//! Common test utilities for integration tests
//!
//! Shared fixtures for building records, batches and JSON-lines workspaces.

use std::path::{Path, PathBuf};

use record_enricher::Record;
use serde_json::json;
use tempfile::TempDir;

/// A record carrying only a shipping address.
#[allow(dead_code)]
pub fn address_record(address: &str) -> Record {
    Record::try_from(json!({ "shipping_address": address })).expect("object literal")
}

/// A record shaped like a change event row.
#[allow(dead_code)]
pub fn order_record(id: u64, address: &str) -> Record {
    Record::try_from(json!({
        "id": id,
        "customer_email": format!("customer{id}@example.com"),
        "shipping_address": address,
    }))
    .expect("object literal")
}

/// Write `records` as `<dir>/<stream>.jsonl`.
#[allow(dead_code)]
pub fn write_stream(dir: &Path, stream: &str, records: &[Record]) -> PathBuf {
    std::fs::create_dir_all(dir).expect("Failed to create stream directory");
    let path = dir.join(format!("{stream}.jsonl"));
    let body: String = records
        .iter()
        .map(|r| serde_json::to_string(r).expect("record serializes") + "\n")
        .collect();
    std::fs::write(&path, body).expect("Failed to write stream file");
    path
}

/// Read back a JSON-lines collection.
#[allow(dead_code)]
pub fn read_collection(path: &Path) -> Vec<Record> {
    std::fs::read_to_string(path)
        .expect("Failed to read collection")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("valid record line"))
        .collect()
}

/// Create a temporary directory for test isolation
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
