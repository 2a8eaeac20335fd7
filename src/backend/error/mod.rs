//! Backend Error Module
//!
//! Error type returned by RPC procedures and its conversion to HTTP responses.
//!
//! # Architecture
//!
//! - **`types`** - `RpcError` and the mapping from repository errors
//! - **`conversion`** - `IntoResponse` producing the RPC error envelope
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Example
//!
//! ```rust
//! use reflecto::backend::error::RpcError;
//! use reflecto::shared::rpc::RpcErrorCode;
//!
//! let err = RpcError::unauthorized().with_path("privateData");
//! assert_eq!(err.code, RpcErrorCode::Unauthorized);
//! assert_eq!(err.status_code().as_u16(), 401);
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{RpcError, AUTH_REQUIRED};
