//! Dashboard view helpers: title search and per-space card summaries.

use crate::shared::{SpaceColor, SpaceEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the dashboard grid shows for one space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceCard {
    pub space_id: String,
    pub title: String,
    pub color: SpaceColor,
    /// Records in the stored snapshot, 0 without one
    pub item_count: usize,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SpaceCard {
    pub fn from_entry(entry: &SpaceEntry) -> Self {
        let record = &entry.record;
        Self {
            space_id: record.space_id.clone(),
            title: record.display_title().to_string(),
            color: record.color(),
            item_count: entry
                .snapshot
                .as_ref()
                .map(crate::shared::snapshot::count_records)
                .unwrap_or(0),
            updated_at: record.updated_at,
        }
    }
}

/// Entries whose display title contains `query`, ignoring case
///
/// A blank query keeps everything. Order is preserved.
pub fn filter_by_title<'a>(entries: &'a [SpaceEntry], query: &str) -> Vec<&'a SpaceEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.iter().collect();
    }
    entries
        .iter()
        .filter(|entry| entry.record.display_title().to_lowercase().contains(&needle))
        .collect()
}
