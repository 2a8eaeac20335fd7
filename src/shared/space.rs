/**
 * Space Data Model
 *
 * This module defines the space record as it is stored in the remote document
 * collection, the fixed color palette, and the metadata patch used to edit a
 * space's title and color.
 *
 * # Remote Schema
 *
 * One document per `(userId, spaceId)`:
 *
 * ```json
 * {
 *   "$id": "store-assigned id",
 *   "spaceId": "client-generated id",
 *   "userId": "owner",
 *   "title": "Plans",
 *   "color": "#3b82f6",
 *   "snapshot": "{\"document\":{...}}",
 *   "$createdAt": "2025-01-01T00:00:00.000+00:00",
 *   "$updatedAt": "2025-01-01T00:00:00.000+00:00"
 * }
 * ```
 */

use crate::shared::error::SharedError;
use crate::shared::snapshot::{count_records, parse_snapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Color preset for a space
///
/// Serialized as its hex string. The first entry, `Blue`, is the default used
/// whenever a stored color is missing or outside the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpaceColor {
    #[default]
    Blue,
    Green,
    Purple,
    Amber,
    Pink,
    Cyan,
    Red,
    Emerald,
}

impl SpaceColor {
    /// Palette in display order
    pub const ALL: [SpaceColor; 8] = [
        SpaceColor::Blue,
        SpaceColor::Green,
        SpaceColor::Purple,
        SpaceColor::Amber,
        SpaceColor::Pink,
        SpaceColor::Cyan,
        SpaceColor::Red,
        SpaceColor::Emerald,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            SpaceColor::Blue => "#3b82f6",
            SpaceColor::Green => "#22c55e",
            SpaceColor::Purple => "#a855f7",
            SpaceColor::Amber => "#f59e0b",
            SpaceColor::Pink => "#ec4899",
            SpaceColor::Cyan => "#06b6d4",
            SpaceColor::Red => "#ef4444",
            SpaceColor::Emerald => "#10b981",
        }
    }

    /// Look up a palette entry by hex value
    pub fn from_hex(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|color| color.hex().eq_ignore_ascii_case(value))
    }

    /// Palette entry for a stored value, falling back to the default
    pub fn normalize(value: Option<&str>) -> Self {
        value.and_then(Self::from_hex).unwrap_or_default()
    }
}

impl fmt::Display for SpaceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

impl TryFrom<String> for SpaceColor {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
            .ok_or_else(|| SharedError::validation("color", format!("'{}' is not a palette color", value)))
    }
}

impl From<SpaceColor> for String {
    fn from(color: SpaceColor) -> Self {
        color.hex().to_string()
    }
}

/// A space as stored in the remote collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceRecord {
    /// Store-assigned document identifier
    #[serde(rename = "$id")]
    pub document_id: String,
    #[serde(rename = "spaceId")]
    pub space_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Serialized canvas snapshot, opaque JSON text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
    #[serde(rename = "$createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "$updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SpaceRecord {
    /// Decode a record from a document's JSON object
    pub fn from_json(value: Value) -> Result<Self, SharedError> {
        serde_json::from_value(value)
            .map_err(|e| SharedError::record(format!("not a space record: {}", e)))
    }

    /// Title shown to the user, `spaceId` when the title is missing or blank
    pub fn display_title(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => &self.space_id,
        }
    }

    /// Normalized palette color
    pub fn color(&self) -> SpaceColor {
        SpaceColor::normalize(self.color.as_deref())
    }

    /// Parsed snapshot, `None` when absent or not valid JSON
    pub fn parsed_snapshot(&self) -> Option<Value> {
        self.snapshot.as_deref().and_then(parse_snapshot)
    }

    /// Number of canvas records in the stored snapshot
    pub fn item_count(&self) -> usize {
        self.parsed_snapshot()
            .map(|snapshot| count_records(&snapshot))
            .unwrap_or(0)
    }
}

/// A listed space together with its parsed snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceEntry {
    pub record: SpaceRecord,
    /// `None` when the record has no snapshot or it failed to parse
    pub snapshot: Option<Value>,
}

impl SpaceEntry {
    pub fn from_record(record: SpaceRecord) -> Self {
        let snapshot = record.parsed_snapshot();
        Self { record, snapshot }
    }
}

/// Trim a title and reject blank ones
pub fn normalize_title(title: &str) -> Result<String, SharedError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation("title", "Title cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Partial update of a space's metadata
///
/// Only present fields are written. The snapshot is never part of a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SpaceColor>,
}

impl MetadataPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            color: None,
        }
    }

    pub fn color(color: SpaceColor) -> Self {
        Self {
            title: None,
            color: Some(color),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.color.is_none()
    }

    /// Document fields to write, with the title trimmed and validated
    pub fn to_fields(&self) -> Result<Map<String, Value>, SharedError> {
        let mut fields = Map::new();
        if let Some(title) = &self.title {
            fields.insert("title".to_string(), Value::String(normalize_title(title)?));
        }
        if let Some(color) = self.color {
            fields.insert("color".to_string(), Value::String(color.hex().to_string()));
        }
        Ok(fields)
    }
}
