//! Spaces Module
//!
//! Owner-scoped persistence of spaces and the helpers the dashboard needs to
//! present them.
//!
//! # Architecture
//!
//! - **`repository`** - `SpaceRepository`, CRUD over the remote collection
//! - **`identity`** - `IdentityProvider`, who the repository acts for
//! - **`dashboard`** - title search and `SpaceCard` summaries
//! - **`error`** - `SpaceError`
//!
//! # Dependency Injection
//!
//! A repository is built from an explicitly passed `DocumentStore` and
//! `IdentityProvider`. The RPC server builds one per request from the caller's
//! credential, the client builds one on top of its `SessionProvider`, and
//! tests build one on top of a `MemoryStore`.
//!
//! # Example
//!
//! ```rust
//! use reflecto::baas::MemoryStore;
//! use reflecto::shared::{CollectionRef, SpaceColor};
//! use reflecto::spaces::{FixedIdentity, SpaceRepository};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), reflecto::spaces::SpaceError> {
//! let repo = SpaceRepository::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(FixedIdentity::user("user-1")),
//!     CollectionRef::new("main", "spaces"),
//! );
//! let space_id = repo.create("Plans", SpaceColor::Blue, None).await?;
//! assert_eq!(repo.list_for_user().await?.len(), 1);
//! repo.delete(&space_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod dashboard;
pub mod error;
pub mod identity;
pub mod repository;

pub use dashboard::{filter_by_title, SpaceCard};
pub use error::SpaceError;
pub use identity::{FixedIdentity, IdentityProvider};
pub use repository::SpaceRepository;
