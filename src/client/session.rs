/**
 * Session Provider
 *
 * Client-side view of "who is signed in", on top of the BaaS account API.
 *
 * # Caching
 *
 * `current_user()` answers from a cache for 30 seconds before asking the BaaS
 * again. Signing in, signing up and signing out invalidate the cache.
 *
 * # Failure Handling
 *
 * Identity lookups never fail: any error reads as "signed out". Sign-out
 * ignores errors from the BaaS and always ends signed out locally. `jwt()`
 * returns `None` on failure. Sign-in and sign-up report their errors.
 */

use crate::baas::{
    unique_id, AuthUser, BaasClient, BaasError, Credential, DocumentStore, SessionToken,
};
use crate::shared::BaasSettings;
use crate::spaces::IdentityProvider;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// How long a resolved identity is trusted
pub const SESSION_STALE_TIME: Duration = Duration::from_secs(30);

#[derive(Debug, Default)]
struct SessionState {
    credential: Credential,
    cached: Option<(Instant, Option<AuthUser>)>,
}

/// Signed-in user tracking for one client
#[derive(Debug, Clone)]
pub struct SessionProvider {
    client: BaasClient,
    state: Arc<RwLock<SessionState>>,
    stale_time: Duration,
}

impl SessionProvider {
    /// Signed-out provider
    pub fn new(settings: BaasSettings) -> Self {
        Self::with_credential(settings, Credential::Anonymous)
    }

    /// Provider resuming an existing session or JWT
    pub fn with_credential(settings: BaasSettings, credential: Credential) -> Self {
        Self {
            client: BaasClient::new(settings, Credential::Anonymous),
            state: Arc::new(RwLock::new(SessionState {
                credential,
                cached: None,
            })),
            stale_time: SESSION_STALE_TIME,
        }
    }

    /// Override how long `current_user()` answers from cache
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub async fn credential(&self) -> Credential {
        self.state.read().await.credential.clone()
    }

    async fn scoped_client(&self) -> BaasClient {
        self.client.with_credential(self.credential().await)
    }

    /// Document store acting as the signed-in user
    pub async fn documents(&self) -> Arc<dyn DocumentStore> {
        Arc::new(self.scoped_client().await)
    }

    /// The signed-in user, `None` when signed out or unreachable
    pub async fn current_user(&self) -> Option<AuthUser> {
        {
            let state = self.state.read().await;
            if let Some((fetched_at, user)) = &state.cached {
                if fetched_at.elapsed() < self.stale_time {
                    return user.clone();
                }
            }
        }

        let client = self.scoped_client().await;
        let user = match client.get_account().await {
            Ok(user) => Some(user),
            Err(e) => {
                debug!("No current session: {}", e);
                None
            }
        };

        self.state.write().await.cached = Some((Instant::now(), user.clone()));
        user
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionToken, BaasError> {
        let token = self
            .client
            .create_email_password_session(email, password)
            .await?;

        let mut state = self.state.write().await;
        state.credential = Credential::Session(token.secret.clone());
        state.cached = None;
        info!(user_id = %token.user_id, "Signed in");
        Ok(token)
    }

    /// Create an account and sign straight into it
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<SessionToken, BaasError> {
        let user = self
            .client
            .create_account(&unique_id(), email, password, name)
            .await?;
        debug!(user_id = %user.id, "Account created");
        self.sign_in(email, password).await
    }

    /// Sign out everywhere
    ///
    /// Errors from the BaaS are logged and ignored.
    pub async fn sign_out(&self) {
        let client = self.scoped_client().await;
        if let Err(e) = client.delete_sessions().await {
            warn!("Ignoring sign-out failure: {}", e);
        }

        let mut state = self.state.write().await;
        state.credential = Credential::Anonymous;
        state.cached = None;
    }

    /// Short-lived JWT for authenticating RPC calls
    pub async fn jwt(&self) -> Option<String> {
        match self.scoped_client().await.create_jwt().await {
            Ok(jwt) => Some(jwt),
            Err(e) => {
                debug!("Could not mint JWT: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for SessionProvider {
    async fn current_user_id(&self) -> Option<String> {
        self.current_user().await.map(|user| user.id)
    }
}
