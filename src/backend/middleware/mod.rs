//! Middleware Module
//!
//! Request processing layers applied by the router.
//!
//! - **`auth`** - resolves the caller into an `RpcContext` on every RPC request
//! - **`cors`** - CORS policy from the configured origin allow-list

pub mod auth;
pub mod cors;

pub use auth::{auth_context_middleware, resolve_context, RpcContext};
pub use cors::cors_layer;
