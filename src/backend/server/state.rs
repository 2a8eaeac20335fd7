/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct is the central state container and holds:
 * - The loaded `AppConfig`
 * - The BaaS gateway, used to resolve callers and reach their documents
 *
 * # Degraded Mode
 *
 * `gateway` is `None` when the BaaS endpoint or project is not configured.
 * The server still runs: every request is anonymous, so public procedures work
 * and protected ones answer `UNAUTHORIZED`.
 */

use crate::baas::{BaasGateway, Credential};
use crate::shared::AppConfig;
use crate::spaces::{FixedIdentity, SpaceRepository};
use axum::extract::FromRef;
use std::sync::Arc;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// BaaS access, `None` when not configured
    pub gateway: Option<Arc<dyn BaasGateway>>,
}

impl AppState {
    pub fn new(config: AppConfig, gateway: Option<Arc<dyn BaasGateway>>) -> Self {
        Self {
            config: Arc::new(config),
            gateway,
        }
    }

    /// Space repository acting as `user_id` with the caller's credential
    ///
    /// Returns `None` without a gateway.
    pub fn repository_for(&self, user_id: &str, credential: &Credential) -> Option<SpaceRepository> {
        let gateway = self.gateway.as_ref()?;
        Some(SpaceRepository::from_config(
            gateway.documents(credential),
            Arc::new(FixedIdentity::user(user_id)),
            &self.config,
        ))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("gateway", &self.gateway.is_some())
            .finish()
    }
}

/// Lets handlers extract `State<Arc<AppConfig>>` directly
impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
