/**
 * BaaS HTTP Client
 *
 * This module implements the subset of the BaaS REST API the application
 * uses: the account API (identity, sign-up, sessions, JWTs) and the document
 * API (list/create/update/delete in one collection).
 *
 * # Authentication
 *
 * Every request carries `X-Appwrite-Project`. The configured [`Credential`]
 * adds one of:
 *
 * - `X-Appwrite-JWT: <jwt>`
 * - `X-Appwrite-Session: <secret>`
 *
 * # Errors
 *
 * Non-2xx responses are decoded from the `{"message","code","type"}` error
 * body into [`BaasError::Api`]. Nothing is retried.
 */

use crate::baas::error::BaasError;
use crate::baas::query::{Permission, Query};
use crate::baas::store::DocumentStore;
use crate::baas::types::{ApiErrorBody, AuthUser, Credential, Document, DocumentList, SessionToken};
use crate::shared::config::{BaasSettings, CollectionRef};
use async_trait::async_trait;
use cookie::Cookie;
use reqwest::header::SET_COOKIE;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// HTTP client for one BaaS project
#[derive(Debug, Clone)]
pub struct BaasClient {
    http: Client,
    settings: BaasSettings,
    credential: Credential,
}

#[derive(Deserialize)]
struct SessionBody {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(default)]
    secret: String,
}

#[derive(Deserialize)]
struct JwtBody {
    jwt: String,
}

impl BaasClient {
    pub fn new(settings: BaasSettings, credential: Credential) -> Self {
        Self::with_http(Client::new(), settings, credential)
    }

    /// Build on top of an existing HTTP client (shared connection pool)
    pub fn with_http(http: Client, settings: BaasSettings, credential: Credential) -> Self {
        Self {
            http,
            settings,
            credential,
        }
    }

    /// Same client and connection pool, different credential
    pub fn with_credential(&self, credential: Credential) -> Self {
        Self {
            http: self.http.clone(),
            settings: self.settings.clone(),
            credential,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn settings(&self) -> &BaasSettings {
        &self.settings
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.settings.endpoint, path);
        let builder = self
            .http
            .request(method, url)
            .header("X-Appwrite-Project", &self.settings.project_id);

        match &self.credential {
            Credential::Anonymous => builder,
            Credential::Jwt(jwt) => builder.header("X-Appwrite-JWT", jwt),
            Credential::Session(secret) => builder.header("X-Appwrite-Session", secret),
        }
    }

    async fn check(response: Response) -> Result<Response, BaasError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let err = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => BaasError::Api {
                status: status.as_u16(),
                kind: body.kind,
                message: body.message,
            },
            Err(_) => BaasError::Api {
                status: status.as_u16(),
                kind: None,
                message: if text.is_empty() { status.to_string() } else { text },
            },
        };
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, BaasError> {
        let response = Self::check(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| BaasError::Decode(e.to_string()))
    }

    async fn send_empty(builder: RequestBuilder) -> Result<(), BaasError> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    fn documents_path(collection: &CollectionRef) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            collection.database_id, collection.collection_id
        )
    }

    /// Identity behind the current credential
    pub async fn get_account(&self) -> Result<AuthUser, BaasError> {
        Self::send_json(self.request(Method::GET, "/account")).await
    }

    /// Register a new account
    pub async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthUser, BaasError> {
        let mut body = json!({
            "userId": user_id,
            "email": email,
            "password": password,
        });
        if let Some(name) = name {
            body["name"] = Value::String(name.to_string());
        }
        Self::send_json(self.request(Method::POST, "/account").json(&body)).await
    }

    /// Sign in with email and password
    ///
    /// The secret comes from the response body when the service discloses it,
    /// otherwise from the `a_session_<projectId>` cookie.
    pub async fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionToken, BaasError> {
        let builder = self
            .request(Method::POST, "/account/sessions/email")
            .json(&json!({ "email": email, "password": password }));
        let response = Self::check(builder.send().await?).await?;

        let cookie_name = self.settings.session_cookie_name();
        let cookie_secret = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|cookie| session_from_set_cookie(cookie, &cookie_name));

        let bytes = response.bytes().await?;
        let body: SessionBody =
            serde_json::from_slice(&bytes).map_err(|e| BaasError::Decode(e.to_string()))?;

        let secret = if body.secret.is_empty() {
            cookie_secret.ok_or_else(|| {
                BaasError::Decode("session response carried no secret".to_string())
            })?
        } else {
            body.secret
        };

        Ok(SessionToken {
            session_id: body.id,
            user_id: body.user_id,
            secret,
        })
    }

    /// Sign out of every session of the current user
    pub async fn delete_sessions(&self) -> Result<(), BaasError> {
        Self::send_empty(self.request(Method::DELETE, "/account/sessions")).await
    }

    /// Mint a short-lived JWT for server calls
    pub async fn create_jwt(&self) -> Result<String, BaasError> {
        let body: JwtBody = Self::send_json(self.request(Method::POST, "/account/jwts")).await?;
        Ok(body.jwt)
    }
}

/// Value of `cookie_name` in a `Set-Cookie` header, if it is that cookie
fn session_from_set_cookie(header: &str, cookie_name: &str) -> Option<String> {
    let cookie = Cookie::parse(header).ok()?;
    if cookie.name() != cookie_name || cookie.value().is_empty() {
        return None;
    }
    urlencoding::decode(cookie.value()).ok().map(|value| value.into_owned())
}

#[async_trait]
impl DocumentStore for BaasClient {
    async fn list_documents(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> Result<DocumentList, BaasError> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|query| ("queries[]", query.to_string()))
            .collect();
        let builder = self
            .request(Method::GET, &Self::documents_path(collection))
            .query(&params);
        Self::send_json(builder).await
    }

    async fn create_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Map<String, Value>,
        permissions: &[Permission],
    ) -> Result<Document, BaasError> {
        let permissions: Vec<String> = permissions.iter().map(ToString::to_string).collect();
        let body = json!({
            "documentId": document_id,
            "data": data,
            "permissions": permissions,
        });
        let builder = self
            .request(Method::POST, &Self::documents_path(collection))
            .json(&body);
        Self::send_json(builder).await
    }

    async fn update_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, BaasError> {
        let path = format!("{}/{}", Self::documents_path(collection), document_id);
        let builder = self
            .request(Method::PATCH, &path)
            .json(&json!({ "data": data }));
        Self::send_json(builder).await
    }

    async fn delete_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
    ) -> Result<(), BaasError> {
        let path = format!("{}/{}", Self::documents_path(collection), document_id);
        Self::send_empty(self.request(Method::DELETE, &path)).await
    }
}
