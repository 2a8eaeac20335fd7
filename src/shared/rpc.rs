//! RPC Wire Types
//!
//! Request/response shapes shared by the RPC server and `RpcClient`. The HTTP
//! shape follows tRPC's conventions so existing tRPC clients can call the
//! server:
//!
//! - Query: `GET /trpc/<procedure>?input=<url-encoded json>`
//! - Mutation: `POST /trpc/<procedure>` with a JSON body
//! - Success: `{"result":{"data":<output>}}`
//! - Failure: `{"error":{"message","code","data":{"code","httpStatus"}}}`

use crate::baas::AuthUser;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Procedure names
pub mod procedures {
    pub const HEALTH_CHECK: &str = "healthCheck";
    pub const PRIVATE_DATA: &str = "privateData";
    pub const SPACES_LIST: &str = "spaces.list";
    pub const SPACES_SNAPSHOT: &str = "spaces.snapshot";
    pub const SPACES_CREATE: &str = "spaces.create";
    pub const SPACES_UPDATE: &str = "spaces.update";
    pub const SPACES_DELETE: &str = "spaces.delete";
    pub const SPACES_SAVE_SNAPSHOT: &str = "spaces.saveSnapshot";
}

/// Error codes, with their JSON-RPC number and HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcErrorCode {
    ParseError,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotSupported,
    InternalServerError,
}

impl RpcErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "PARSE_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotSupported => "METHOD_NOT_SUPPORTED",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn json_rpc_code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::BadRequest => -32600,
            Self::Unauthorized => -32001,
            Self::Forbidden => -32003,
            Self::NotFound => -32004,
            Self::MethodNotSupported => -32005,
            Self::InternalServerError => -32603,
        }
    }

    pub fn http_status(self) -> u16 {
        match self {
            Self::ParseError | Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::MethodNotSupported => 405,
            Self::InternalServerError => 500,
        }
    }
}

impl fmt::Display for RpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{"result":{"data":...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcSuccess<T> {
    pub result: RpcResultData<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResultData<T> {
    pub data: T,
}

impl<T> RpcSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            result: RpcResultData { data },
        }
    }
}

/// `{"error":{...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcFailure {
    pub error: RpcErrorBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorBody {
    pub message: String,
    /// JSON-RPC error number
    pub code: i32,
    pub data: RpcErrorData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcErrorData {
    pub code: RpcErrorCode,
    pub http_status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl RpcFailure {
    pub fn new(code: RpcErrorCode, message: impl Into<String>, path: Option<String>) -> Self {
        Self {
            error: RpcErrorBody {
                message: message.into(),
                code: code.json_rpc_code(),
                data: RpcErrorData {
                    code,
                    http_status: code.http_status(),
                    path,
                },
            },
        }
    }
}

/// Output of `privateData`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateData {
    pub message: String,
    pub user: AuthUser,
}

/// Input naming a single space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceIdInput {
    pub space_id: String,
}

/// Input of `spaces.create`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSpaceInput {
    pub title: String,
    /// Palette hex, normalized (unknown values become the first palette color)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Value>,
}

/// Output of `spaces.create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceOutput {
    pub space_id: String,
}

/// Input of `spaces.update`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpaceInput {
    pub space_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Input of `spaces.saveSnapshot`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSnapshotInput {
    pub space_id: String,
    pub snapshot: Value,
}
