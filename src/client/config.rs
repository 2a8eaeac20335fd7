//! Client-side configuration: where the RPC server lives and which token to send.

/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Client configuration wrapper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    server_url: String,
    token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }
}

impl ClientConfig {
    /// Configuration from `CLIENT_API_URL`, falling back to the default URL
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration pointing at an explicit server
    pub fn with_server_url(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Same as `new`, with a custom variable lookup
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = lookup("CLIENT_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        Self::with_server_url(server_url)
    }

    /// Set the bearer token (a BaaS JWT)
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Clear the token (sign out)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Full URL for a server path
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }
}
