//! Errors seen by RPC callers.

use crate::shared::rpc::RpcErrorCode;
use thiserror::Error;

/// Errors returned by `RpcClient`
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error envelope
    #[error("{code}: {message}")]
    Rpc {
        code: RpcErrorCode,
        message: String,
        status: u16,
    },

    /// The response was not a valid envelope
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn code(&self) -> Option<RpcErrorCode> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code() == Some(RpcErrorCode::Unauthorized)
    }
}
