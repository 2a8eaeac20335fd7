/**
 * Error Conversion
 *
 * `RpcError` implements `IntoResponse`, so procedures and handlers can return
 * it directly. The body is the RPC error envelope:
 *
 * ```json
 * {
 *   "error": {
 *     "message": "Authentication required",
 *     "code": -32001,
 *     "data": { "code": "UNAUTHORIZED", "httpStatus": 401, "path": "privateData" }
 *   }
 * }
 * ```
 */

use crate::backend::error::types::RpcError;
use crate::shared::rpc::RpcFailure;
use axum::{
    response::{IntoResponse, Response},
    Json,
};

impl From<&RpcError> for RpcFailure {
    fn from(err: &RpcError) -> Self {
        RpcFailure::new(err.code, err.message.clone(), err.path.clone())
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(RpcFailure::from(&self))).into_response()
    }
}
