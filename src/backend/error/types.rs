/**
 * RPC Error Types
 *
 * The single error type returned by RPC procedures. Every error carries one of
 * the RPC error codes, which fixes both the JSON-RPC number and the HTTP status
 * of the response.
 *
 * # Mapping From Repository Errors
 *
 * | `SpaceError`        | Code                    |
 * |---------------------|-------------------------|
 * | `Unauthenticated`   | `UNAUTHORIZED`          |
 * | `NotFound`          | `NOT_FOUND`             |
 * | `Invalid` (input)   | `BAD_REQUEST`           |
 * | `Invalid` (stored)  | `INTERNAL_SERVER_ERROR` |
 * | `Config`            | `INTERNAL_SERVER_ERROR` |
 * | `Store` (401 / 404) | `UNAUTHORIZED` / `NOT_FOUND` |
 * | `Store` (other)     | `INTERNAL_SERVER_ERROR` |
 * | `Serialization`     | `INTERNAL_SERVER_ERROR` |
 *
 * Internal failures are logged in full and reported to the caller with a
 * generic message.
 */

use crate::shared::rpc::RpcErrorCode;
use crate::spaces::SpaceError;
use axum::http::StatusCode;
use thiserror::Error;

/// Message of the protected-procedure guard
pub const AUTH_REQUIRED: &str = "Authentication required";

/// Error returned by an RPC procedure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct RpcError {
    pub code: RpcErrorCode,
    pub message: String,
    /// Procedure that failed, echoed in the error envelope
    pub path: Option<String>,
}

impl RpcError {
    pub fn new(code: RpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Attach the procedure name
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn unauthorized() -> Self {
        Self::new(RpcErrorCode::Unauthorized, AUTH_REQUIRED)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::BadRequest, message)
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::ParseError, message)
    }

    pub fn method_not_supported(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::MethodNotSupported, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::InternalServerError, message)
    }

    /// HTTP status of the response carrying this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<SpaceError> for RpcError {
    fn from(err: SpaceError) -> Self {
        match err {
            SpaceError::Unauthenticated => Self::unauthorized(),
            SpaceError::NotFound { space_id } => {
                Self::not_found(format!("Space not found: {}", space_id))
            }
            SpaceError::Invalid(e) if e.is_validation() => Self::bad_request(e.to_string()),
            SpaceError::Store(e) if e.is_unauthorized() => Self::unauthorized(),
            SpaceError::Store(e) if e.is_not_found() => Self::not_found("Space not found"),
            SpaceError::Config(e) => {
                tracing::error!("Space storage is not configured: {}", e);
                Self::internal("Missing Appwrite DB config")
            }
            other => {
                tracing::error!("Space operation failed: {}", other);
                Self::internal("Internal server error")
            }
        }
    }
}
