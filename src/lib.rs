//! Reflecto - Main Library
//!
//! Reflecto gives every user their own whiteboard "spaces": named, colored
//! canvases whose documents are stored in a backend-as-a-service (BaaS) and
//! saved automatically while the user edits.
//!
//! # Overview
//!
//! This library provides:
//! - Owner-scoped CRUD over space records in a remote document collection
//! - A debounced snapshot sync loop that keeps an open canvas saved
//! - An RPC server with per-request caller resolution (bearer JWT or session cookie)
//! - Client plumbing: typed RPC client and a cached session provider
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and server
//!   - Space record, color palette, metadata patches
//!   - Snapshot helpers, RPC wire types
//!   - Configuration and error types
//!
//! - **`baas`** - Backend-as-a-service access
//!   - REST client for the account and document APIs
//!   - `DocumentStore` / `BaasGateway` traits and an in-memory store
//!
//! - **`spaces`** - Space repository and dashboard helpers
//!
//! - **`sync`** - Snapshot sync controller
//!
//! - **`client`** - RPC client, client config, session provider
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server, RPC routes, auth context middleware
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - the Axum server and its dependencies
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use reflecto::backend::server::create_app;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app().await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Client-Side
//!
//! ```rust,no_run
//! use reflecto::client::SessionProvider;
//! use reflecto::shared::{AppConfig, SpaceColor};
//! use reflecto::spaces::SpaceRepository;
//! use std::sync::Arc;
//!
//! # async fn example(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let settings = config.baas().ok_or("BaaS not configured")?;
//! let session = Arc::new(SessionProvider::new(settings));
//! session.sign_in("ada@example.com", "hunter22").await?;
//!
//! let repository = SpaceRepository::from_config(session.documents().await, session.clone(), &config);
//! let space_id = repository.create("Plans", SpaceColor::Blue, None).await?;
//! # let _ = space_id;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `Result<T, E>` for every fallible operation
//! - One `thiserror` enum per layer: `SharedError`, `ConfigError`, `BaasError`,
//!   `SpaceError`, `ClientError`, `RpcError`
//! - Failures the product deliberately tolerates (autosave errors, identity
//!   lookups) are logged through `tracing` and turned into "nothing"

/// Shared types and data structures
pub mod shared;

/// Backend-as-a-service access
pub mod baas;

/// Space repository and dashboard helpers
pub mod spaces;

/// Debounced snapshot sync
pub mod sync;

/// Client-side plumbing
pub mod client;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
