//! Production [`BaasGateway`] backed by the HTTP client.

use crate::baas::client::BaasClient;
use crate::baas::error::BaasError;
use crate::baas::store::{BaasGateway, DocumentStore};
use crate::baas::types::{AuthUser, Credential};
use crate::shared::config::BaasSettings;
use async_trait::async_trait;
use std::sync::Arc;

/// Gateway creating one credential-scoped client per caller
///
/// All scoped clients share the same connection pool.
#[derive(Debug, Clone)]
pub struct AppwriteGateway {
    client: BaasClient,
}

impl AppwriteGateway {
    pub fn new(settings: BaasSettings) -> Self {
        Self {
            client: BaasClient::new(settings, Credential::Anonymous),
        }
    }
}

#[async_trait]
impl BaasGateway for AppwriteGateway {
    async fn resolve_user(&self, credential: &Credential) -> Result<AuthUser, BaasError> {
        self.client
            .with_credential(credential.clone())
            .get_account()
            .await
    }

    fn documents(&self, credential: &Credential) -> Arc<dyn DocumentStore> {
        Arc::new(self.client.with_credential(credential.clone()))
    }

    fn session_cookie_name(&self) -> String {
        self.client.settings().session_cookie_name()
    }
}
