//! Content hash used to skip saving a document that has not changed.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 of a document's canonical JSON encoding, hex-encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotHash(String);

impl SnapshotHash {
    pub fn of(document: &Value) -> Self {
        let mut canonical = String::new();
        write_canonical(document, &mut canonical);
        Self(hex::encode(Sha256::digest(canonical.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compact JSON with object keys sorted at every level
///
/// `serde_json::to_vec` only sorts keys while the `preserve_order` feature is
/// off, and any crate in the build can switch it on through feature
/// unification. Sorting here keeps the hash independent of that.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
