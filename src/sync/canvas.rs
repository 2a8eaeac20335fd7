/**
 * Canvas Store Abstraction
 *
 * The sync controller never looks inside a canvas document. It needs three
 * things from the local canvas: the current document as JSON, a way to replace
 * it with a remote snapshot, and a stream of "something changed" signals.
 */

use serde_json::Value;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Errors raised by a canvas while loading a snapshot
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("Snapshot rejected by canvas: {0}")]
    InvalidSnapshot(String),
}

/// Local canvas document the sync controller keeps in step with the store
pub trait CanvasStore: Send + Sync {
    /// Current document, serialized the way it is persisted
    fn snapshot(&self) -> Value;

    /// Replace the document with a stored snapshot
    ///
    /// Loading is not a user mutation and does not notify subscribers.
    fn load_snapshot(&self, snapshot: Value) -> Result<(), CanvasError>;

    /// One message per local document mutation
    fn subscribe(&self) -> broadcast::Receiver<()>;
}

/// In-process canvas holding its document as a JSON value
#[derive(Debug)]
pub struct MemoryCanvas {
    document: RwLock<Value>,
    changes: broadcast::Sender<()>,
}

impl Default for MemoryCanvas {
    fn default() -> Self {
        Self::new(Value::Object(Default::default()))
    }
}

impl MemoryCanvas {
    pub fn new(document: Value) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            document: RwLock::new(document),
            changes,
        }
    }

    /// Replace the document as a user edit would
    pub fn set(&self, document: Value) {
        *self.document.write().unwrap_or_else(PoisonError::into_inner) = document;
        self.notify();
    }

    /// Mutate the document in place as a user edit would
    pub fn update<F>(&self, edit: F)
    where
        F: FnOnce(&mut Value),
    {
        {
            let mut document = self.document.write().unwrap_or_else(PoisonError::into_inner);
            edit(&mut *document);
        }
        self.notify();
    }

    fn notify(&self) {
        // No subscriber yet is fine, nobody is syncing
        let _ = self.changes.send(());
    }
}

impl CanvasStore for MemoryCanvas {
    fn snapshot(&self) -> Value {
        self.document
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn load_snapshot(&self, snapshot: Value) -> Result<(), CanvasError> {
        if !snapshot.is_object() {
            return Err(CanvasError::InvalidSnapshot(
                "expected a JSON object".to_string(),
            ));
        }
        *self.document.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }
}
