/**
 * Server Configuration
 *
 * Loads `AppConfig`, picks the default log filter from it and turns its BaaS
 * section into a gateway.
 *
 * # Sources
 *
 * 1. `REFLECTO_CONFIG` (or `reflecto.toml` when present)
 * 2. Environment variables, which win over the file
 *
 * Missing BaaS settings are not an error: the server starts with every request
 * treated as anonymous and logs a warning.
 */

use crate::baas::{AppwriteGateway, BaasGateway};
use crate::shared::{AppConfig, ConfigError};
use std::sync::Arc;
use tracing::{info, warn};

/// Load and validate the server configuration
///
/// Runs before the subscriber is installed, so nothing is logged here.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::load()
}

/// Filter used when `RUST_LOG` is unset: verbose in development only
pub fn default_log_filter(config: &AppConfig) -> &'static str {
    if config.is_development() {
        "debug"
    } else {
        "info"
    }
}

/// Log the settings the server starts with
pub fn log_config(config: &AppConfig) {
    info!(
        port = config.server_port,
        environment = ?config.environment,
        cors_origins = ?config.cors_origins,
        "Configuration loaded"
    );
}

/// Gateway for the configured BaaS project
///
/// # Returns
///
/// `None` when `APPWRITE_ENDPOINT` or `APPWRITE_PROJECT_ID` is missing.
pub fn build_gateway(config: &AppConfig) -> Option<Arc<dyn BaasGateway>> {
    match config.baas() {
        Some(settings) => {
            info!(endpoint = %settings.endpoint, project = %settings.project_id, "BaaS configured");
            Some(Arc::new(AppwriteGateway::new(settings)))
        }
        None => {
            warn!("BaaS endpoint/project not configured - all requests will be anonymous");
            None
        }
    }
}
