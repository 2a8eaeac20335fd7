//! Sync Module
//!
//! Debounced autosave of an open space's canvas.
//!
//! # Architecture
//!
//! - **`controller`** - `SyncController` / `SyncSession`, the load + debounce + save loop
//! - **`canvas`** - `CanvasStore`, what the controller needs from a canvas, and `MemoryCanvas`
//! - **`hash`** - `SnapshotHash`, the content hash that skips no-op saves
//!
//! # Example
//!
//! ```rust,no_run
//! use reflecto::sync::{MemoryCanvas, SyncConfig, SyncController, SyncPhase};
//! # use reflecto::spaces::SpaceRepository;
//! use std::sync::Arc;
//!
//! # async fn example(repository: SpaceRepository) {
//! let controller = SyncController::new(repository, SyncConfig::default());
//! let canvas = Arc::new(MemoryCanvas::default());
//! let session = controller.open("space-1", canvas.clone());
//!
//! session.wait_for(SyncPhase::Synced).await;
//! canvas.set(serde_json::json!({"store": {}}));
//! // saved 1.2s after the last edit
//! # }
//! ```

pub mod canvas;
pub mod controller;
pub mod hash;

pub use canvas::{CanvasError, CanvasStore, MemoryCanvas};
pub use controller::{SyncConfig, SyncController, SyncPhase, SyncSession, DEFAULT_DEBOUNCE};
pub use hash::SnapshotHash;
