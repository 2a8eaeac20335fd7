/**
 * BaaS Error Types
 *
 * Errors raised while talking to the backend-as-a-service, either over HTTP
 * (`BaasClient`) or through the in-memory store used in tests and local runs.
 */

use thiserror::Error;

/// Errors returned by the account and document APIs
#[derive(Debug, Error)]
pub enum BaasError {
    /// The request never produced a response (DNS, TLS, connection reset...)
    #[error("BaaS request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("BaaS returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Machine-readable error type, e.g. `document_not_found`
        kind: Option<String>,
        /// Human-readable error message
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Failed to decode BaaS response: {0}")]
    Decode(String),
}

impl BaasError {
    pub fn api(status: u16, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            kind: Some(kind.into()),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::api(404, "document_not_found", message)
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
