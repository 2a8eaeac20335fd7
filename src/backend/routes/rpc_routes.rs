/**
 * RPC Route Handlers
 *
 * HTTP side of the RPC API.
 *
 * # Routes
 *
 * - `GET /trpc/{procedure}?input=<json>` - queries
 * - `POST /trpc/{procedure}` with a JSON body - mutations
 *
 * Every route runs behind the auth context middleware, so handlers always see
 * an `RpcContext` (anonymous when the caller could not be resolved).
 *
 * # Errors
 *
 * - Unknown procedure: `NOT_FOUND`
 * - Query called with POST or mutation with GET: `METHOD_NOT_SUPPORTED`
 * - Input that is not JSON: `PARSE_ERROR`
 */

use crate::backend::error::RpcError;
use crate::backend::middleware::{auth_context_middleware, RpcContext};
use crate::backend::rpc::{dispatch, Procedure, ProcedureKind};
use crate::backend::server::state::AppState;
use crate::shared::rpc::RpcSuccess;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    middleware,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Query string of a query call
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    /// URL-encoded JSON input
    pub input: Option<String>,
}

/// Configure RPC routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
/// * `app_state` - State handed to the auth context middleware
///
/// # Returns
///
/// Router with `/trpc/{procedure}` configured
pub fn configure_rpc_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let rpc = Router::new()
        .route("/trpc/{procedure}", get(handle_query).post(handle_mutation))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_context_middleware,
        ));
    router.merge(rpc)
}

fn resolve(name: &str, called_as: ProcedureKind) -> Result<Procedure, RpcError> {
    let kind_name = match called_as {
        ProcedureKind::Query => "query",
        ProcedureKind::Mutation => "mutation",
    };
    let procedure = Procedure::from_name(name).ok_or_else(|| {
        RpcError::not_found(format!("No \"{}\"-procedure on path \"{}\"", kind_name, name))
    })?;
    if procedure.kind() != called_as {
        return Err(RpcError::method_not_supported(format!(
            "Unsupported {} call to \"{}\"",
            kind_name, name
        )));
    }
    Ok(procedure)
}

async fn run(
    app_state: &AppState,
    context: &RpcContext,
    name: &str,
    called_as: ProcedureKind,
    input: Option<&[u8]>,
) -> Result<Json<RpcSuccess<Value>>, RpcError> {
    let procedure = resolve(name, called_as)?;
    let input = match input {
        Some(raw) if !raw.is_empty() => Some(
            serde_json::from_slice::<Value>(raw)
                .map_err(|e| RpcError::parse_error(format!("Input is not valid JSON: {}", e)))?,
        ),
        _ => None,
    };

    debug!(
        procedure = name,
        user_id = context.user.as_ref().map(|u| u.id.as_str()).unwrap_or("-"),
        "RPC call"
    );
    let data = dispatch(app_state, context, procedure, input).await?;
    Ok(Json(RpcSuccess::new(data)))
}

/// `GET /trpc/{procedure}`
pub async fn handle_query(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<QueryParams>,
    context: RpcContext,
) -> Result<Json<RpcSuccess<Value>>, RpcError> {
    let input = params.input.as_deref().map(str::as_bytes);
    run(&app_state, &context, &name, ProcedureKind::Query, input)
        .await
        .map_err(|e| e.with_path(name.clone()))
}

/// `POST /trpc/{procedure}`
pub async fn handle_mutation(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
    context: RpcContext,
    body: Bytes,
) -> Result<Json<RpcSuccess<Value>>, RpcError> {
    run(&app_state, &context, &name, ProcedureKind::Mutation, Some(&body[..]))
        .await
        .map_err(|e| e.with_path(name.clone()))
}
