/**
 * Typed RPC Client
 *
 * Calls the server's `/trpc/<procedure>` endpoints and unwraps the result
 * envelope. Queries go out as `GET ?input=<json>`, mutations as `POST` with a
 * JSON body. The configured token, if any, is sent as `Authorization: Bearer`.
 */

use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::shared::rpc::{
    procedures, CreateSpaceInput, CreateSpaceOutput, PrivateData, RpcFailure, RpcSuccess,
    SaveSnapshotInput, SpaceIdInput, UpdateSpaceInput,
};
use crate::shared::SpaceEntry;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Server status shown by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HealthStatus {
    /// No answer yet
    #[default]
    Checking,
    Online,
    Offline,
}

impl HealthStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Checking => "Checking...",
            Self::Online => "Online",
            Self::Offline => "Offline",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// HTTP client for the RPC server
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: Client,
    config: ClientConfig,
}

impl RpcClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replace the bearer token sent with every call
    pub fn set_token(&mut self, token: Option<String>) {
        self.config.set_token(token);
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.config.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Call a query procedure
    pub async fn query<I, O>(&self, procedure: &str, input: Option<&I>) -> Result<O, ClientError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = self.config.api_url(&format!("/trpc/{}", procedure));
        let mut builder = self.http.get(url);
        if let Some(input) = input {
            let encoded =
                serde_json::to_string(input).map_err(|e| ClientError::Decode(e.to_string()))?;
            builder = builder.query(&[("input", encoded)]);
        }
        debug!(procedure, "RPC query");
        Self::unwrap_envelope(self.authorize(builder)).await
    }

    /// Call a mutation procedure
    pub async fn mutation<I, O>(&self, procedure: &str, input: &I) -> Result<O, ClientError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = self.config.api_url(&format!("/trpc/{}", procedure));
        let builder = self.http.post(url).json(input);
        debug!(procedure, "RPC mutation");
        Self::unwrap_envelope(self.authorize(builder)).await
    }

    async fn unwrap_envelope<O: DeserializeOwned>(builder: RequestBuilder) -> Result<O, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            let success: RpcSuccess<O> =
                serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?;
            return Ok(success.result.data);
        }

        match serde_json::from_slice::<RpcFailure>(&bytes) {
            Ok(failure) => Err(ClientError::Rpc {
                code: failure.error.data.code,
                message: failure.error.message,
                status: status.as_u16(),
            }),
            Err(_) => Err(ClientError::Decode(format!(
                "unexpected {} response: {}",
                status,
                String::from_utf8_lossy(&bytes)
            ))),
        }
    }

    /// Liveness of the server, never fails
    pub async fn health_check(&self) -> HealthStatus {
        match self
            .query::<Value, String>(procedures::HEALTH_CHECK, None)
            .await
        {
            Ok(_) => HealthStatus::Online,
            Err(e) => {
                debug!("Health check failed: {}", e);
                HealthStatus::Offline
            }
        }
    }

    pub async fn private_data(&self) -> Result<PrivateData, ClientError> {
        self.query::<Value, _>(procedures::PRIVATE_DATA, None).await
    }

    pub async fn list_spaces(&self) -> Result<Vec<SpaceEntry>, ClientError> {
        self.query::<Value, _>(procedures::SPACES_LIST, None).await
    }

    pub async fn space_snapshot(&self, space_id: &str) -> Result<Option<Value>, ClientError> {
        let input = SpaceIdInput {
            space_id: space_id.to_string(),
        };
        self.query(procedures::SPACES_SNAPSHOT, Some(&input)).await
    }

    /// Create a space, returning its id
    pub async fn create_space(&self, input: &CreateSpaceInput) -> Result<String, ClientError> {
        let output: CreateSpaceOutput = self.mutation(procedures::SPACES_CREATE, input).await?;
        Ok(output.space_id)
    }

    pub async fn update_space(&self, input: &UpdateSpaceInput) -> Result<(), ClientError> {
        self.mutation(procedures::SPACES_UPDATE, input).await
    }

    pub async fn delete_space(&self, space_id: &str) -> Result<(), ClientError> {
        let input = SpaceIdInput {
            space_id: space_id.to_string(),
        };
        self.mutation(procedures::SPACES_DELETE, &input).await
    }

    pub async fn save_snapshot(&self, space_id: &str, snapshot: Value) -> Result<(), ClientError> {
        let input = SaveSnapshotInput {
            space_id: space_id.to_string(),
            snapshot,
        };
        self.mutation(procedures::SPACES_SAVE_SNAPSHOT, &input).await
    }
}
