/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * Outermost first:
 * 1. `TraceLayer` - request/response logging
 * 2. CORS - configured origin allow-list, credentials allowed
 * 3. Auth context - RPC routes only
 */

use crate::backend::middleware::cors_layer;
use crate::backend::routes::rpc_routes::configure_rpc_routes;
use crate::backend::server::state::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state (configuration, BaaS gateway)
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
///
/// # Route Details
///
/// - `GET /` - liveness text `OK`
/// - `GET /trpc/{procedure}` - RPC queries
/// - `POST /trpc/{procedure}` - RPC mutations
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/", get(root));
    let router = configure_rpc_routes(router, &app_state);

    router
        .layer(cors_layer(&app_state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> &'static str {
    "OK"
}
