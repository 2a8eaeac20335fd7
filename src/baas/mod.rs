//! BaaS Module
//!
//! Everything that talks to the backend-as-a-service: the REST client for the
//! account and document APIs, the traits the rest of the crate depends on
//! instead of the client, and an in-memory store that stands in for the remote
//! collection.
//!
//! # Architecture
//!
//! - **`client`** - `BaasClient`, HTTP access to `/account` and the document API
//! - **`store`** - `DocumentStore` and `BaasGateway` traits
//! - **`gateway`** - `AppwriteGateway`, the production `BaasGateway`
//! - **`memory`** - `MemoryStore`, an in-process `DocumentStore`
//! - **`query`** - query, permission and id builders
//! - **`types`** - wire types (`Document`, `AuthUser`, `Credential`...)
//! - **`error`** - `BaasError`
//!
//! # Module Structure
//!
//! ```text
//! baas/
//! ├── mod.rs      - Module exports and documentation
//! ├── client.rs   - REST client
//! ├── store.rs    - Dependency-injection traits
//! ├── gateway.rs  - Production gateway
//! ├── memory.rs   - In-memory store
//! ├── query.rs    - Queries, permissions, ids
//! ├── types.rs    - Wire types
//! └── error.rs    - Error type
//! ```
//!
//! # Credentials
//!
//! A client is bound to one [`Credential`]. Server code never shares a client
//! between callers: `BaasGateway::documents` hands out a store scoped to the
//! caller's JWT or session so the BaaS enforces per-record permissions.
//!
//! # Example
//!
//! ```rust,no_run
//! use reflecto::baas::{BaasClient, Credential};
//! use reflecto::shared::BaasSettings;
//!
//! # async fn example() -> Result<(), reflecto::baas::BaasError> {
//! let settings = BaasSettings {
//!     endpoint: "https://cloud.appwrite.io/v1".to_string(),
//!     project_id: "reflecto".to_string(),
//! };
//! let client = BaasClient::new(settings, Credential::Jwt("eyJ...".to_string()));
//! let me = client.get_account().await?;
//! println!("signed in as {}", me.id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod query;
pub mod store;
pub mod types;

pub use client::BaasClient;
pub use error::BaasError;
pub use gateway::AppwriteGateway;
pub use memory::MemoryStore;
pub use query::{unique_id, Permission, Query, Role};
pub use store::{BaasGateway, DocumentStore};
pub use types::{AuthUser, Credential, Document, DocumentList, SessionToken};
