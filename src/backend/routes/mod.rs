//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation, layers and the `/` route
//! - **`rpc_routes`** - `/trpc/{procedure}` query and mutation handlers
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── rpc_routes.rs   - RPC endpoint handlers
//! ```
//!
//! # Example
//!
//! ```rust
//! use reflecto::backend::routes::create_router;
//! use reflecto::backend::server::AppState;
//! use reflecto::shared::AppConfig;
//!
//! let router = create_router(AppState::new(AppConfig::default(), None));
//! # let _ = router;
//! ```

/// Main router creation
pub mod router;

/// RPC endpoint handlers
pub mod rpc_routes;

pub use router::create_router;
