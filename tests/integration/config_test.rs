//! Configuration loading from the process environment
//!
//! These tests mutate process-wide environment variables and run serially.

use reflecto::client::ClientConfig;
use reflecto::shared::{AppConfig, CollectionRef, ConfigError, Environment};
use serial_test::serial;
use std::env;

const KEYS: &[&str] = &[
    "REFLECTO_CONFIG",
    "APPWRITE_ENDPOINT",
    "APPWRITE_PROJECT_ID",
    "APPWRITE_DB_ID",
    "APPWRITE_COLLECTION_ID",
    "CORS_ORIGIN",
    "SERVER_PORT",
    "APP_ENV",
    "CLIENT_API_URL",
];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_load_from_environment() {
    clear_env();
    env::set_var("APPWRITE_ENDPOINT", "https://baas.example.com/v1");
    env::set_var("APPWRITE_PROJECT_ID", "reflecto");
    env::set_var("APPWRITE_DB_ID", "main");
    env::set_var("APPWRITE_COLLECTION_ID", "spaces");
    env::set_var("CORS_ORIGIN", "http://localhost:3001, https://app.example.com/");
    env::set_var("SERVER_PORT", "8080");
    env::set_var("APP_ENV", "dev");

    let config = AppConfig::load().unwrap();
    clear_env();

    let baas = config.baas().unwrap();
    assert_eq!(baas.endpoint, "https://baas.example.com/v1");
    assert_eq!(baas.session_cookie_name(), "a_session_reflecto");
    assert_eq!(config.collection().unwrap(), CollectionRef::new("main", "spaces"));
    assert_eq!(
        config.cors_origins,
        vec!["http://localhost:3001", "https://app.example.com"]
    );
    assert_eq!(config.server_port, 8080);
    assert_eq!(config.environment, Environment::Development);
}

#[test]
#[serial]
fn test_environment_overrides_config_file() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reflecto.toml");
    std::fs::write(
        &path,
        "baas_endpoint = \"https://file.example.com/v1\"\nbaas_project_id = \"from-file\"\nserver_port = 4000\n",
    )
    .unwrap();
    env::set_var("REFLECTO_CONFIG", &path);
    env::set_var("APPWRITE_PROJECT_ID", "from-env");

    let config = AppConfig::load().unwrap();
    clear_env();

    let baas = config.baas().unwrap();
    assert_eq!(baas.endpoint, "https://file.example.com/v1");
    assert_eq!(baas.project_id, "from-env");
    assert_eq!(config.server_port, 4000);
}

#[test]
#[serial]
fn test_invalid_port_is_rejected() {
    clear_env();
    env::set_var("SERVER_PORT", "eighty");

    let result = AppConfig::load();
    clear_env();

    assert_eq!(
        result,
        Err(ConfigError::InvalidValue {
            key: "SERVER_PORT",
            value: "eighty".to_string(),
        })
    );
}

#[test]
#[serial]
fn test_client_config_reads_server_url() {
    clear_env();
    env::set_var("CLIENT_API_URL", "https://api.example.com/");

    let config = ClientConfig::default();
    clear_env();

    assert_eq!(config.server_url(), "https://api.example.com");
    assert_eq!(config.api_url("/trpc/healthCheck"), "https://api.example.com/trpc/healthCheck");
}
