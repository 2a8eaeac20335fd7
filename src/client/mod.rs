//! Client Module
//!
//! Client-side plumbing for applications built on Reflecto: configuration,
//! the typed RPC client and the session provider.
//!
//! # Architecture
//!
//! - **`config`** - `ClientConfig`, server URL and bearer token
//! - **`rpc`** - `RpcClient` and `HealthStatus`
//! - **`session`** - `SessionProvider`, cached identity and sign in/up/out
//! - **`error`** - `ClientError`
//!
//! # Example
//!
//! ```rust,no_run
//! use reflecto::client::{ClientConfig, RpcClient, SessionProvider};
//! use reflecto::shared::BaasSettings;
//!
//! # async fn example() {
//! let session = SessionProvider::new(BaasSettings {
//!     endpoint: "https://cloud.appwrite.io/v1".to_string(),
//!     project_id: "reflecto".to_string(),
//! });
//! let mut rpc = RpcClient::new(ClientConfig::new());
//! rpc.set_token(session.jwt().await);
//! println!("server is {}", rpc.health_check().await);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod rpc;
pub mod session;

pub use config::ClientConfig;
pub use error::ClientError;
pub use rpc::{HealthStatus, RpcClient};
pub use session::{SessionProvider, SESSION_STALE_TIME};
