/**
 * In-Memory Document Store
 *
 * A `DocumentStore` that keeps collections in process memory. It supports the
 * queries the application issues (`equal`, `orderDesc`, `limit`,
 * `cursorAfter`) and records write counts, which makes it the substitute store
 * for tests and for running the server without a BaaS.
 *
 * Like the hosted service, a list without a `limit` query returns at most
 * [`DEFAULT_PAGE_SIZE`] documents.
 *
 * Permissions are stored but not enforced. Owner scoping is the repository's
 * job and is exercised against this store.
 */

use crate::baas::error::BaasError;
use crate::baas::query::{Permission, Query};
use crate::baas::store::DocumentStore;
use crate::baas::types::{Document, DocumentList};
use crate::shared::config::CollectionRef;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Page size applied when a list carries no `limit` query
pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone)]
struct StoredDocument {
    document: Document,
    /// Write sequence number, breaks timestamp ties when ordering
    touched: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: HashMap<CollectionRef, Vec<StoredDocument>>,
    sequence: u64,
    writes: usize,
    fail_writes: bool,
}

/// Shared in-memory store, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3f+00:00").to_string()
}

fn matches(document: &Document, query: &Query) -> bool {
    match query {
        Query::Equal { attribute, value } => document.attribute(attribute).as_ref() == Some(value),
        _ => true,
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent create/update/delete fail with a 503
    pub async fn set_fail_writes(&self, fail: bool) {
        self.state.write().await.fail_writes = fail;
    }

    /// Number of successful create/update/delete calls so far
    pub async fn write_count(&self) -> usize {
        self.state.read().await.writes
    }

    /// Every document in a collection, in insertion order
    pub async fn documents(&self, collection: &CollectionRef) -> Vec<Document> {
        self.state
            .read()
            .await
            .collections
            .get(collection)
            .map(|docs| docs.iter().map(|stored| stored.document.clone()).collect())
            .unwrap_or_default()
    }

    /// Insert a document as-is, bypassing validation and write counting
    pub async fn insert_raw(&self, collection: &CollectionRef, document: Document) {
        let mut state = self.state.write().await;
        state.sequence += 1;
        let touched = state.sequence;
        state
            .collections
            .entry(collection.clone())
            .or_default()
            .push(StoredDocument { document, touched });
    }

    fn check_writable(state: &MemoryState) -> Result<(), BaasError> {
        if state.fail_writes {
            return Err(BaasError::api(503, "general_unavailable", "Store is unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> Result<DocumentList, BaasError> {
        let state = self.state.read().await;
        let mut found: Vec<&StoredDocument> = state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|stored| queries.iter().all(|q| matches(&stored.document, q)))
                    .collect()
            })
            .unwrap_or_default();

        for query in queries {
            let Query::OrderDesc(attribute) = query else {
                continue;
            };
            found.sort_by(|a, b| {
                let left = a.document.attribute(attribute).map(|v| v.to_string());
                let right = b.document.attribute(attribute).map(|v| v.to_string());
                left.cmp(&right).then(a.touched.cmp(&b.touched)).reverse()
            });
        }

        let total = found.len() as u64;
        let cursor = queries.iter().find_map(|q| match q {
            Query::CursorAfter(document_id) => Some(document_id),
            _ => None,
        });
        let start = match cursor {
            Some(document_id) => {
                let position = found
                    .iter()
                    .position(|stored| &stored.document.id == document_id)
                    .ok_or_else(|| {
                        BaasError::api(
                            400,
                            "general_cursor_not_found",
                            format!("Document '{}' for the 'cursor' value not found.", document_id),
                        )
                    })?;
                position + 1
            }
            None => 0,
        };
        let limit = queries
            .iter()
            .find_map(|q| match q {
                Query::Limit(limit) => Some(*limit as usize),
                _ => None,
            })
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let documents = found
            .into_iter()
            .skip(start)
            .take(limit)
            .map(|stored| stored.document.clone())
            .collect();

        Ok(DocumentList { total, documents })
    }

    async fn create_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Map<String, Value>,
        permissions: &[Permission],
    ) -> Result<Document, BaasError> {
        let mut state = self.state.write().await;
        Self::check_writable(&state)?;

        let exists = state
            .collections
            .get(collection)
            .is_some_and(|docs| docs.iter().any(|stored| stored.document.id == document_id));
        if exists {
            return Err(BaasError::api(
                409,
                "document_already_exists",
                "Document with the requested ID already exists.",
            ));
        }

        let now = timestamp();
        let document = Document {
            id: document_id.to_string(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
            permissions: permissions.iter().map(ToString::to_string).collect(),
            data,
        };

        state.sequence += 1;
        state.writes += 1;
        let touched = state.sequence;
        state
            .collections
            .entry(collection.clone())
            .or_default()
            .push(StoredDocument {
                document: document.clone(),
                touched,
            });
        Ok(document)
    }

    async fn update_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, BaasError> {
        let mut state = self.state.write().await;
        Self::check_writable(&state)?;

        state.sequence += 1;
        let touched = state.sequence;
        let stored = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|stored| stored.document.id == document_id))
            .ok_or_else(|| {
                BaasError::not_found("Document with the requested ID could not be found.")
            })?;

        for (key, value) in data {
            stored.document.data.insert(key, value);
        }
        stored.document.updated_at = Some(timestamp());
        stored.touched = touched;
        let document = stored.document.clone();

        state.writes += 1;
        Ok(document)
    }

    async fn delete_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
    ) -> Result<(), BaasError> {
        let mut state = self.state.write().await;
        Self::check_writable(&state)?;

        let docs = state.collections.get_mut(collection).ok_or_else(|| {
            BaasError::not_found("Document with the requested ID could not be found.")
        })?;
        let before = docs.len();
        docs.retain(|stored| stored.document.id != document_id);
        if docs.len() == before {
            return Err(BaasError::not_found(
                "Document with the requested ID could not be found.",
            ));
        }

        state.writes += 1;
        Ok(())
    }
}
