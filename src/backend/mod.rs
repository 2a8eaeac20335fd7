//! Backend Module
//!
//! This module contains all server-side code for Reflecto: an Axum HTTP server
//! exposing the RPC API that the web client calls.
//!
//! # Overview
//!
//! The backend module includes:
//! - Axum HTTP server setup and configuration
//! - tRPC-shaped RPC endpoints (`/trpc/{procedure}`)
//! - Caller resolution from a bearer JWT or the BaaS session cookie
//! - CORS and request tracing layers
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`rpc`** - Procedure table and dispatch
//! - **`middleware`** - Auth context resolution and CORS
//! - **`error`** - `RpcError` and its HTTP response
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary entry point
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── rpc/            - Procedures
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the loaded configuration and, when the BaaS is configured,
//! a gateway. No space data is kept in the server: every procedure reads and
//! writes the BaaS with the caller's own credential.
//!
//! # Authentication
//!
//! Every RPC request passes through `auth_context_middleware`, which attaches
//! an `RpcContext`. Public procedures ignore it; protected procedures answer
//! `UNAUTHORIZED` ("Authentication required") when it is anonymous.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// RPC procedures
pub mod rpc;

/// Middleware for request processing
pub mod middleware;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::RpcError;
pub use middleware::RpcContext;
pub use server::{create_app, create_app_with_config, AppState};
