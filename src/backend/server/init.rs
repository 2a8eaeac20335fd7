/**
 * Server Initialization
 *
 * Builds the Axum application from configuration.
 *
 * # Initialization Flow
 *
 * 1. **Configuration Loading**: file + environment (`load_config`)
 * 2. **Gateway Creation**: BaaS gateway, or degraded anonymous mode
 * 3. **Router Creation**: routes, auth context, CORS and tracing layers
 */

use crate::backend::routes::create_router;
use crate::backend::server::config::{build_gateway, load_config, log_config};
use crate::backend::server::state::AppState;
use crate::shared::{AppConfig, ConfigError};
use axum::Router;

/// Create the application from the process configuration
pub async fn create_app() -> Result<Router, ConfigError> {
    let config = load_config()?;
    log_config(&config);
    Ok(create_app_with_config(config))
}

/// Create the application from an explicit configuration
pub fn create_app_with_config(config: AppConfig) -> Router {
    let gateway = build_gateway(&config);
    create_router(AppState::new(config, gateway))
}
