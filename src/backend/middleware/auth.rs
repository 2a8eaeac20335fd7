/**
 * Auth Context Middleware
 *
 * Resolves who is calling before any RPC procedure runs and attaches the
 * result to the request as an `RpcContext`.
 *
 * # Resolution Order
 *
 * 1. `Authorization: Bearer <jwt>` (scheme matched case-insensitively)
 * 2. The `a_session_<projectId>` cookie, percent-decoded by the cookie jar
 * 3. Anonymous
 *
 * The credential found is exchanged for the caller's identity through the
 * gateway. Every failure along the way (no gateway, no credential, rejected
 * credential, unreachable BaaS) yields an anonymous context. Resolution never
 * rejects a request: procedures decide whether anonymity is acceptable.
 */

use crate::backend::error::RpcError;
use crate::backend::server::state::AppState;
use crate::baas::{AuthUser, Credential};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::convert::Infallible;
use tracing::debug;

/// Caller identity for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcContext {
    /// Resolved user, `None` for anonymous callers
    pub user: Option<AuthUser>,
    /// Credential the user was resolved with, reused for BaaS calls
    pub credential: Credential,
}

impl RpcContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: AuthUser, credential: Credential) -> Self {
        Self {
            user: Some(user),
            credential,
        }
    }

    /// The signed-in user, or `UNAUTHORIZED`
    ///
    /// Guard used by every protected procedure.
    pub fn require_user(&self) -> Result<&AuthUser, RpcError> {
        self.user.as_ref().ok_or_else(RpcError::unauthorized)
    }
}

/// Middleware attaching an `RpcContext` to every request
pub async fn auth_context_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = resolve_context(&app_state, request.headers()).await;
    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Resolve the caller from request headers
pub async fn resolve_context(app_state: &AppState, headers: &HeaderMap) -> RpcContext {
    let Some(gateway) = app_state.gateway.as_ref() else {
        return RpcContext::anonymous();
    };

    let credential = match extract_bearer(headers) {
        Some(jwt) => Credential::Jwt(jwt),
        None => match extract_cookie(headers, &gateway.session_cookie_name()) {
            Some(secret) => Credential::Session(secret),
            None => Credential::Anonymous,
        },
    };

    if credential.is_anonymous() {
        return RpcContext::anonymous();
    }

    match gateway.resolve_user(&credential).await {
        Ok(user) => {
            debug!(user_id = %user.id, "Resolved caller");
            RpcContext::authenticated(user, credential)
        }
        Err(e) => {
            debug!("Credential rejected, continuing anonymously: {}", e);
            RpcContext::anonymous()
        }
    }
}

/// Token of an `Authorization: Bearer <token>` header
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let scheme = value.get(..6)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let rest = &value[6..];
    let token = rest.trim_start();
    if token.len() == rest.len() || token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Decoded value of cookie `name` across all `Cookie` headers
///
/// Pairs whose escapes do not decode to UTF-8 are dropped by the jar.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Handlers can take `RpcContext` directly
///
/// Requests that skipped the middleware read as anonymous.
impl<S> FromRequestParts<S> for RpcContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RpcContext>()
            .cloned()
            .unwrap_or_default())
    }
}
