/**
 * Space Repository
 *
 * CRUD over the remote collection of space records. Every operation is scoped
 * to the acting user: the user id is resolved first, and every lookup filters
 * on `(spaceId, userId)`. Callers only know the logical `spaceId`, so updates
 * and deletes always re-derive the store's document id through that owner
 * scoped lookup instead of addressing documents directly.
 *
 * # Order of Checks
 *
 * 1. Collection configuration (`ConfigError` on first use when missing)
 * 2. Acting user (`SpaceError::Unauthenticated` when nobody is signed in)
 * 3. Remote store calls
 *
 * # Concurrency
 *
 * Lookup-then-write is not transactional. Two writers racing on the same space
 * both succeed and the last write wins.
 */

use crate::baas::{unique_id, DocumentStore, Permission, Query};
use crate::shared::config::{AppConfig, CollectionRef, ConfigError};
use crate::shared::snapshot::{parse_snapshot, serialize_snapshot};
use crate::shared::space::normalize_title;
use crate::shared::{MetadataPatch, SpaceColor, SpaceEntry, SpaceRecord};
use crate::spaces::error::SpaceError;
use crate::spaces::identity::IdentityProvider;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

const UPDATED_AT: &str = "$updatedAt";

/// Documents requested per page when listing
const LIST_PAGE_SIZE: u32 = 100;

/// Owner-scoped access to space records
#[derive(Clone)]
pub struct SpaceRepository {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    collection: Result<CollectionRef, ConfigError>,
}

impl std::fmt::Debug for SpaceRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaceRepository")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl SpaceRepository {
    /// Create a repository over a known collection
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        collection: CollectionRef,
    ) -> Self {
        Self {
            store,
            identity,
            collection: Ok(collection),
        }
    }

    /// Create a repository from application configuration
    ///
    /// A missing database or collection id does not fail here. It is reported
    /// by the first operation instead.
    pub fn from_config(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            identity,
            collection: config.collection(),
        }
    }

    fn collection(&self) -> Result<&CollectionRef, SpaceError> {
        self.collection
            .as_ref()
            .map_err(|e| SpaceError::Config(e.clone()))
    }

    async fn owner(&self) -> Result<String, SpaceError> {
        self.identity
            .current_user_id()
            .await
            .ok_or(SpaceError::Unauthenticated)
    }

    /// Collection and acting user, in that order
    async fn scope(&self) -> Result<(&CollectionRef, String), SpaceError> {
        let collection = self.collection()?;
        let user_id = self.owner().await?;
        Ok((collection, user_id))
    }

    async fn find(
        &self,
        collection: &CollectionRef,
        user_id: &str,
        space_id: &str,
    ) -> Result<Option<SpaceRecord>, SpaceError> {
        let queries = [
            Query::equal("spaceId", space_id),
            Query::equal("userId", user_id),
            Query::limit(1),
        ];
        let list = self.store.list_documents(collection, &queries).await?;
        match list.documents.into_iter().next() {
            Some(document) => Ok(Some(SpaceRecord::from_json(document.to_json())?)),
            None => Ok(None),
        }
    }

    async fn find_existing(
        &self,
        collection: &CollectionRef,
        user_id: &str,
        space_id: &str,
    ) -> Result<SpaceRecord, SpaceError> {
        self.find(collection, user_id, space_id)
            .await?
            .ok_or_else(|| SpaceError::not_found(space_id))
    }

    /// Create a new space owned by the acting user
    ///
    /// # Arguments
    ///
    /// * `title` - Display title, trimmed, must not be blank
    /// * `color` - Palette color
    /// * `initial_snapshot` - Optional canvas document to start from
    ///
    /// # Returns
    ///
    /// The freshly generated `spaceId`.
    pub async fn create(
        &self,
        title: &str,
        color: SpaceColor,
        initial_snapshot: Option<&Value>,
    ) -> Result<String, SpaceError> {
        let (collection, user_id) = self.scope().await?;
        let title = normalize_title(title)?;
        let space_id = unique_id();

        let mut data = Map::new();
        data.insert("spaceId".to_string(), Value::String(space_id.clone()));
        data.insert("userId".to_string(), Value::String(user_id.clone()));
        data.insert("title".to_string(), Value::String(title));
        data.insert("color".to_string(), Value::String(color.hex().to_string()));
        if let Some(snapshot) = initial_snapshot {
            data.insert("snapshot".to_string(), Value::String(encode(snapshot)?));
        }

        self.store
            .create_document(
                collection,
                &unique_id(),
                data,
                &Permission::owner_only(&user_id),
            )
            .await?;

        info!(space_id = %space_id, user_id = %user_id, "Created space");
        Ok(space_id)
    }

    /// Latest stored snapshot of a space
    ///
    /// `None` when the acting user has no such space, the space has no
    /// snapshot yet, or the stored snapshot is not valid JSON.
    pub async fn get_latest_snapshot(&self, space_id: &str) -> Result<Option<Value>, SpaceError> {
        let (collection, user_id) = self.scope().await?;
        let record = self.find(collection, &user_id, space_id).await?;
        Ok(record
            .and_then(|record| record.snapshot)
            .and_then(|raw| parse_snapshot(&raw)))
    }

    /// Store a new snapshot for a space
    ///
    /// Updates only the `snapshot` field of an existing record. When the acting
    /// user has no record for `space_id`, one is created holding just the
    /// snapshot, with owner-only permissions.
    pub async fn upsert_snapshot(&self, space_id: &str, snapshot: &Value) -> Result<(), SpaceError> {
        let (collection, user_id) = self.scope().await?;
        let encoded = encode(snapshot)?;

        match self.find(collection, &user_id, space_id).await? {
            Some(existing) => {
                let mut data = Map::new();
                data.insert("snapshot".to_string(), Value::String(encoded));
                self.store
                    .update_document(collection, &existing.document_id, data)
                    .await?;
                debug!(space_id = %space_id, "Updated snapshot");
            }
            None => {
                let mut data = Map::new();
                data.insert("spaceId".to_string(), Value::String(space_id.to_string()));
                data.insert("userId".to_string(), Value::String(user_id.clone()));
                data.insert("snapshot".to_string(), Value::String(encoded));
                self.store
                    .create_document(
                        collection,
                        &unique_id(),
                        data,
                        &Permission::owner_only(&user_id),
                    )
                    .await?;
                debug!(space_id = %space_id, "Created snapshot record");
            }
        }
        Ok(())
    }

    /// All spaces of the acting user, most recently edited first
    ///
    /// Pages through the collection until every owned record is read. A record
    /// whose snapshot fails to parse is still listed, with `snapshot: None`. A
    /// document that is not a space record at all is skipped.
    pub async fn list_for_user(&self) -> Result<Vec<SpaceEntry>, SpaceError> {
        let (collection, user_id) = self.scope().await?;
        let mut entries = Vec::new();
        let mut seen: u64 = 0;
        let mut cursor: Option<String> = None;

        loop {
            let mut queries = vec![
                Query::equal("userId", user_id.as_str()),
                Query::order_desc(UPDATED_AT),
                Query::limit(LIST_PAGE_SIZE),
            ];
            if let Some(last_id) = cursor.take() {
                queries.push(Query::cursor_after(last_id));
            }

            let page = self.store.list_documents(collection, &queries).await?;
            let Some(last) = page.documents.last() else {
                break;
            };
            let last_id = last.id.clone();
            let full_page = page.documents.len() == LIST_PAGE_SIZE as usize;
            seen += page.documents.len() as u64;

            for document in page.documents {
                let document_id = document.id.clone();
                match SpaceRecord::from_json(document.to_json()) {
                    Ok(record) => entries.push(SpaceEntry::from_record(record)),
                    Err(e) => {
                        warn!(document_id = %document_id, "Skipping stored document: {}", e)
                    }
                }
            }

            if !full_page && seen >= page.total {
                break;
            }
            cursor = Some(last_id);
        }

        debug!(user_id = %user_id, count = entries.len(), "Listed spaces");
        Ok(entries)
    }

    /// Apply a title and/or color change
    ///
    /// Fails with `NotFound` when the acting user owns no such space, even
    /// for an empty patch. An empty patch then writes nothing.
    pub async fn update_metadata(
        &self,
        space_id: &str,
        patch: &MetadataPatch,
    ) -> Result<(), SpaceError> {
        let (collection, user_id) = self.scope().await?;
        let fields = patch.to_fields()?;
        let existing = self.find_existing(collection, &user_id, space_id).await?;

        if fields.is_empty() {
            debug!(space_id = %space_id, "Empty metadata patch, nothing to write");
            return Ok(());
        }

        self.store
            .update_document(collection, &existing.document_id, fields)
            .await?;
        info!(space_id = %space_id, "Updated space metadata");
        Ok(())
    }

    /// Delete a space of the acting user
    pub async fn delete(&self, space_id: &str) -> Result<(), SpaceError> {
        let (collection, user_id) = self.scope().await?;
        let existing = self.find_existing(collection, &user_id, space_id).await?;

        self.store
            .delete_document(collection, &existing.document_id)
            .await?;
        info!(space_id = %space_id, user_id = %user_id, "Deleted space");
        Ok(())
    }
}

fn encode(snapshot: &Value) -> Result<String, SpaceError> {
    serialize_snapshot(snapshot).map_err(|e| SpaceError::Serialization(e.to_string()))
}
