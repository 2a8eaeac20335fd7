/**
 * Space Repository Errors
 *
 * The repository never swallows failures. Whoever calls it decides whether a
 * failure is shown, logged or ignored (the sync controller ignores load and
 * save failures after logging them).
 */

use crate::baas::BaasError;
use crate::shared::{ConfigError, SharedError};
use thiserror::Error;

/// Errors returned by `SpaceRepository`
#[derive(Debug, Error)]
pub enum SpaceError {
    /// No signed-in user could be resolved
    #[error("Authentication required")]
    Unauthenticated,

    /// The acting user owns no space with this id
    #[error("Space not found: {space_id}")]
    NotFound { space_id: String },

    /// Caller input was rejected, or a stored document is not a space record
    #[error(transparent)]
    Invalid(#[from] SharedError),

    /// Database or collection id missing
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The remote store failed
    #[error(transparent)]
    Store(#[from] BaasError),

    /// The snapshot could not be serialized for storage
    #[error("Failed to serialize snapshot: {0}")]
    Serialization(String),
}

impl SpaceError {
    pub fn not_found(space_id: impl Into<String>) -> Self {
        Self::NotFound {
            space_id: space_id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}
