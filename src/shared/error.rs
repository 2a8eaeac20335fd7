//! Shared Error Types
//!
//! Errors raised by the shared space types, whichever side of the RPC
//! boundary they run on.
//!
//! # Error Categories
//!
//! - `Serialization` - a snapshot or record could not be encoded or decoded
//! - `Validation` - user input was rejected (blank title, off-palette color)
//! - `Record` - a stored document is not shaped like a space record
//!
//! # Usage
//!
//! ```rust
//! use reflecto::shared::error::SharedError;
//!
//! let error = SharedError::validation("title", "Title cannot be empty");
//! assert!(error.is_validation());
//! assert_eq!(error.to_string(), "Invalid title: Title cannot be empty");
//! ```
use thiserror::Error;

/// Error raised by the shared space types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Input rejected before reaching the store
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending input field
        field: String,
        message: String,
    },

    /// Stored document is missing fields required for a space record
    #[error("Malformed space record: {0}")]
    Record(String),
}

impl SharedError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn record(message: impl Into<String>) -> Self {
        Self::Record(message.into())
    }

    /// Whether this error was caused by caller input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
