//! Application configuration module
//!
//! Provides the configuration shared by the server and the space repository:
//! where the BaaS lives, which database/collection holds spaces, and which
//! browser origins may call the RPC API.
//!
//! # Sources
//!
//! Values are layered, later sources win:
//!
//! 1. Built-in defaults (port 3000, production environment)
//! 2. An optional TOML file (`REFLECTO_CONFIG`, or `reflecto.toml` in the
//!    working directory when it exists)
//! 3. Environment variables (`APPWRITE_ENDPOINT`, `APPWRITE_PROJECT_ID`,
//!    `APPWRITE_DB_ID`, `APPWRITE_COLLECTION_ID`, `CORS_ORIGIN`, `SERVER_PORT`,
//!    `APP_ENV`)
//!
//! Missing BaaS settings are not an error here. Callers decide how to degrade:
//! the server resolves every caller as anonymous, the repository fails on
//! first use with [`ConfigError::MissingValue`].

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Default HTTP port for the RPC server
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "reflecto.toml";

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// BaaS endpoint URL, e.g. `https://cloud.appwrite.io/v1`
    pub baas_endpoint: Option<String>,
    /// BaaS project identifier
    pub baas_project_id: Option<String>,
    /// Database holding the spaces collection
    pub database_id: Option<String>,
    /// Collection holding one document per space
    pub collection_id: Option<String>,
    /// Origins allowed to call the RPC API from a browser
    pub cors_origins: Vec<String>,
    /// Port the server listens on
    pub server_port: u16,
    /// Runtime environment
    pub environment: Environment,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            baas_endpoint: None,
            baas_project_id: None,
            database_id: None,
            collection_id: None,
            cors_origins: Vec::new(),
            server_port: DEFAULT_SERVER_PORT,
            environment: Environment::default(),
        }
    }
}

/// Connection settings for the BaaS account and document APIs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaasSettings {
    pub endpoint: String,
    pub project_id: String,
}

impl BaasSettings {
    /// Name of the browser session cookie for this project
    pub fn session_cookie_name(&self) -> String {
        format!("a_session_{}", self.project_id)
    }
}

/// Database + collection pair addressing the spaces collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionRef {
    pub database_id: String,
    pub collection_id: String,
}

impl CollectionRef {
    pub fn new(database_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the optional TOML file and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("REFLECTO_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Overlay environment values on top of the current configuration
    ///
    /// `lookup` returns the value of a variable, or `None` when it is unset.
    /// Blank values count as unset.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = get("APPWRITE_ENDPOINT") {
            self.baas_endpoint = Some(endpoint);
        }
        if let Some(project) = get("APPWRITE_PROJECT_ID") {
            self.baas_project_id = Some(project);
        }
        if let Some(database) = get("APPWRITE_DB_ID") {
            self.database_id = Some(database);
        }
        if let Some(collection) = get("APPWRITE_COLLECTION_ID") {
            self.collection_id = Some(collection);
        }
        if let Some(origins) = get("CORS_ORIGIN") {
            self.cors_origins = split_origins(&origins);
        }
        if let Some(port) = get("SERVER_PORT") {
            self.server_port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "SERVER_PORT",
                    value: port.clone(),
                })?;
        }
        if let Some(env) = get("APP_ENV") {
            self.environment = Environment::parse(&env).ok_or(ConfigError::InvalidValue {
                key: "APP_ENV",
                value: env.clone(),
            })?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(endpoint) = &self.baas_endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(endpoint.clone()));
            }
        }
        if self.server_port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "server_port",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// BaaS settings, or `None` when endpoint or project is not configured
    pub fn baas(&self) -> Option<BaasSettings> {
        match (&self.baas_endpoint, &self.baas_project_id) {
            (Some(endpoint), Some(project_id)) => Some(BaasSettings {
                endpoint: endpoint.trim_end_matches('/').to_string(),
                project_id: project_id.clone(),
            }),
            _ => None,
        }
    }

    /// Collection holding spaces
    ///
    /// Fails when either identifier is missing. This is checked on first use
    /// rather than at startup.
    pub fn collection(&self) -> Result<CollectionRef, ConfigError> {
        let database_id = self
            .database_id
            .clone()
            .ok_or(ConfigError::MissingValue("APPWRITE_DB_ID"))?;
        let collection_id = self
            .collection_id
            .clone()
            .ok_or(ConfigError::MissingValue("APPWRITE_COLLECTION_ID"))?;
        Ok(CollectionRef {
            database_id,
            collection_id,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the BaaS endpoint and project
    pub fn baas(mut self, endpoint: impl Into<String>, project_id: impl Into<String>) -> Self {
        self.config.baas_endpoint = Some(endpoint.into());
        self.config.baas_project_id = Some(project_id.into());
        self
    }

    /// Set the database and collection holding spaces
    pub fn collection(
        mut self,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        self.config.database_id = Some(database_id.into());
        self.config.collection_id = Some(collection_id.into());
        self
    }

    /// Add an allowed CORS origin
    pub fn cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.cors_origins.push(origin.into());
        self
    }

    pub fn server_port(mut self, port: u16) -> Self {
        self.config.server_port = port;
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.environment = environment;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}
