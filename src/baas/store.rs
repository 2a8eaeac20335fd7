/**
 * Document Store and Gateway Traits
 *
 * These traits are the seams between the application and the BaaS. The space
 * repository only ever talks to a `DocumentStore`, and the RPC server only
 * ever talks to a `BaasGateway`, so tests can substitute in-memory fakes for
 * the remote service.
 */

use crate::baas::error::BaasError;
use crate::baas::query::{Permission, Query};
use crate::baas::types::{AuthUser, Credential, Document, DocumentList};
use crate::shared::config::CollectionRef;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Remote document collection operations
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List documents matching all queries
    async fn list_documents(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> Result<DocumentList, BaasError>;

    /// Create a document with the given id, fields and permissions
    async fn create_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Map<String, Value>,
        permissions: &[Permission],
    ) -> Result<Document, BaasError>;

    /// Overwrite the given fields of an existing document
    async fn update_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, BaasError>;

    async fn delete_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
    ) -> Result<(), BaasError>;
}

/// Server-side access to the BaaS on behalf of a caller
#[async_trait]
pub trait BaasGateway: Send + Sync {
    /// Exchange a caller credential for the caller's identity
    async fn resolve_user(&self, credential: &Credential) -> Result<AuthUser, BaasError>;

    /// Document store acting with the caller's credential
    fn documents(&self, credential: &Credential) -> Arc<dyn DocumentStore>;

    /// Name of the browser session cookie, `a_session_<projectId>`
    fn session_cookie_name(&self) -> String;
}
