//! Acting-user resolution for the space repository.

use async_trait::async_trait;

/// Resolves the identity every repository call is scoped to
///
/// `None` means nobody is signed in. Implementations swallow lookup failures
/// and report them as `None`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user_id(&self) -> Option<String>;
}

/// Identity known up front, e.g. a user already resolved by the RPC context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedIdentity(Option<String>);

impl FixedIdentity {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self(Some(user_id.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current_user_id(&self) -> Option<String> {
        self.0.clone()
    }
}
