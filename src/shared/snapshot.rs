/**
 * Canvas Snapshot Helpers
 *
 * A snapshot is the canvas library's serialized document. This crate stores it
 * as opaque JSON text and never validates its shape. The only structure read
 * from it is the record map, counted for the "N items" dashboard metric.
 */

use crate::shared::error::SharedError;
use serde_json::Value;

/// Parse stored snapshot text
///
/// Returns `None` when the text is not valid JSON. A broken snapshot is
/// treated exactly like a missing one.
pub fn parse_snapshot(raw: &str) -> Option<Value> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Discarding unparseable snapshot: {}", e);
            None
        }
    }
}

/// Serialize a snapshot for storage
pub fn serialize_snapshot(snapshot: &Value) -> Result<String, SharedError> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Number of records held by a snapshot
///
/// Editor snapshots keep records under `document.store`, store-only snapshots
/// under `store`. Anything else counts as empty.
pub fn count_records(snapshot: &Value) -> usize {
    snapshot
        .pointer("/document/store")
        .or_else(|| snapshot.get("store"))
        .and_then(Value::as_object)
        .map(|records| records.len())
        .unwrap_or(0)
}
