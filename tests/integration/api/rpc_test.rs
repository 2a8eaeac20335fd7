//! RPC API integration tests
//!
//! Drives the full router (auth context middleware, procedures, error
//! envelopes) against a fake BaaS gateway.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use crate::common::{test_config, user, FakeGateway, SESSION_COOKIE};
use pretty_assertions::assert_eq;
use reflecto::backend::routes::create_router;
use reflecto::backend::server::AppState;
use reflecto::shared::AppConfig;
use serde_json::{json, Value};
use std::sync::Arc;

const ADA_JWT: &str = "jwt-ada";
const BOB_JWT: &str = "jwt-bob";

fn gateway() -> FakeGateway {
    FakeGateway::new()
        .with_jwt(ADA_JWT, user("ada", "Ada"))
        .with_jwt(BOB_JWT, user("bob", "Bob"))
        .with_session("secret-ada", user("ada", "Ada"))
}

fn create_test_server_with(config: AppConfig, gateway: FakeGateway) -> TestServer {
    let app = create_router(AppState::new(config, Some(Arc::new(gateway))));
    TestServer::new(app).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(test_config(), gateway())
}

fn bearer(jwt: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", jwt)).unwrap()
}

async fn create_space(server: &TestServer, jwt: &str, input: Value) -> String {
    let response = server
        .post("/trpc/spaces.create")
        .add_header(AUTHORIZATION, bearer(jwt))
        .json(&input)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    body["result"]["data"]["spaceId"].as_str().unwrap().to_string()
}

async fn list_spaces(server: &TestServer, jwt: &str) -> Vec<Value> {
    let response = server
        .get("/trpc/spaces.list")
        .add_header(AUTHORIZATION, bearer(jwt))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    body["result"]["data"].as_array().unwrap().clone()
}

#[tokio::test]
async fn test_root_and_health_check() {
    let server = create_test_server();

    let root = server.get("/").await;
    assert_eq!(root.status_code(), StatusCode::OK);
    assert_eq!(root.text(), "OK");

    let health = server.get("/trpc/healthCheck").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.json::<Value>(), json!({"result": {"data": "OK"}}));
}

#[tokio::test]
async fn test_health_check_works_without_baas() {
    let server = TestServer::new(create_router(AppState::new(AppConfig::default(), None))).unwrap();
    let health = server.get("/trpc/healthCheck").await;
    assert_eq!(health.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_private_data_requires_authentication() {
    let server = create_test_server();

    let response = server.get("/trpc/privateData").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "error": {
                "message": "Authentication required",
                "code": -32001,
                "data": {
                    "code": "UNAUTHORIZED",
                    "httpStatus": 401,
                    "path": "privateData"
                }
            }
        })
    );
}

#[tokio::test]
async fn test_private_data_with_bearer_token() {
    let server = create_test_server();

    let response = server
        .get("/trpc/privateData")
        .add_header(AUTHORIZATION, bearer(ADA_JWT))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["result"]["data"]["message"], "This is private");
    assert_eq!(body["result"]["data"]["user"]["$id"], "ada");
    assert_eq!(body["result"]["data"]["user"]["name"], "Ada");
}

#[tokio::test]
async fn test_private_data_with_session_cookie() {
    let server = create_test_server();
    let cookie = format!("theme=dark; {}=secret%2Dada", SESSION_COOKIE);

    let response = server
        .get("/trpc/privateData")
        .add_header(COOKIE, HeaderValue::from_str(&cookie).unwrap())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["result"]["data"]["user"]["$id"], "ada");
}

#[tokio::test]
async fn test_unknown_credential_is_anonymous() {
    let server = create_test_server();

    let response = server
        .get("/trpc/privateData")
        .add_header(AUTHORIZATION, bearer("forged"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let server = create_test_server();

    let response = server
        .get("/trpc/privateData")
        .add_header(AUTHORIZATION, HeaderValue::from_static("bEaReR   jwt-ada"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_space_lifecycle() {
    let server = create_test_server();

    let space_id = create_space(
        &server,
        ADA_JWT,
        json!({"title": "  Plans  ", "color": "#3b82f6"}),
    )
    .await;

    let spaces = list_spaces(&server, ADA_JWT).await;
    assert_eq!(spaces.len(), 1);
    assert_eq!(spaces[0]["record"]["spaceId"], space_id.as_str());
    assert_eq!(spaces[0]["record"]["title"], "Plans");
    assert_eq!(spaces[0]["record"]["color"], "#3b82f6");
    assert_eq!(spaces[0]["record"]["userId"], "ada");

    let response = server
        .post("/trpc/spaces.update")
        .add_header(AUTHORIZATION, bearer(ADA_JWT))
        .json(&json!({"spaceId": space_id, "title": "Q3 Plans"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"result": {"data": null}}));

    let spaces = list_spaces(&server, ADA_JWT).await;
    assert_eq!(spaces[0]["record"]["title"], "Q3 Plans");
    assert_eq!(spaces[0]["record"]["color"], "#3b82f6");

    let response = server
        .post("/trpc/spaces.delete")
        .add_header(AUTHORIZATION, bearer(ADA_JWT))
        .json(&json!({"spaceId": space_id}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(list_spaces(&server, ADA_JWT).await.is_empty());
}

#[tokio::test]
async fn test_off_palette_color_is_normalized() {
    let server = create_test_server();

    create_space(&server, ADA_JWT, json!({"title": "Ideas", "color": "#123456"})).await;

    let spaces = list_spaces(&server, ADA_JWT).await;
    assert_eq!(spaces[0]["record"]["color"], "#3b82f6");
}

#[tokio::test]
async fn test_snapshot_round_trip() {
    let server = create_test_server();
    let space_id = create_space(&server, ADA_JWT, json!({"title": "Board"})).await;
    let input = json!({"spaceId": space_id}).to_string();

    let response = server
        .get("/trpc/spaces.snapshot")
        .add_query_param("input", &input)
        .add_header(AUTHORIZATION, bearer(ADA_JWT))
        .await;
    assert_eq!(response.json::<Value>(), json!({"result": {"data": null}}));

    let snapshot = json!({"store": {"shape:1": {"type": "geo"}}, "schema": {"v": 2}});
    let response = server
        .post("/trpc/spaces.saveSnapshot")
        .add_header(AUTHORIZATION, bearer(ADA_JWT))
        .json(&json!({"spaceId": space_id, "snapshot": snapshot}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .get("/trpc/spaces.snapshot")
        .add_query_param("input", &input)
        .add_header(AUTHORIZATION, bearer(ADA_JWT))
        .await;
    assert_eq!(response.json::<Value>()["result"]["data"], snapshot);

    // Saving a snapshot never touches the metadata
    let spaces = list_spaces(&server, ADA_JWT).await;
    assert_eq!(spaces.len(), 1);
    assert_eq!(spaces[0]["record"]["title"], "Board");
}

#[tokio::test]
async fn test_spaces_are_owner_scoped() {
    let server = create_test_server();
    let space_id = create_space(&server, ADA_JWT, json!({"title": "Secret"})).await;

    assert!(list_spaces(&server, BOB_JWT).await.is_empty());

    let response = server
        .get("/trpc/spaces.snapshot")
        .add_query_param("input", json!({"spaceId": space_id}).to_string())
        .add_header(AUTHORIZATION, bearer(BOB_JWT))
        .await;
    assert_eq!(response.json::<Value>(), json!({"result": {"data": null}}));

    let response = server
        .post("/trpc/spaces.delete")
        .add_header(AUTHORIZATION, bearer(BOB_JWT))
        .json(&json!({"spaceId": space_id}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["data"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["data"]["path"], "spaces.delete");

    assert_eq!(list_spaces(&server, ADA_JWT).await.len(), 1);
}

#[tokio::test]
async fn test_blank_title_is_bad_request() {
    let server = create_test_server();

    let response = server
        .post("/trpc/spaces.create")
        .add_header(AUTHORIZATION, bearer(ADA_JWT))
        .json(&json!({"title": "   "}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["data"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_missing_input_field_is_bad_request() {
    let server = create_test_server();

    let response = server
        .post("/trpc/spaces.delete")
        .add_header(AUTHORIZATION, bearer(ADA_JWT))
        .json(&json!({}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_procedure_is_not_found() {
    let server = create_test_server();

    let response = server.get("/trpc/spaces.rename").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], -32004);
    assert_eq!(body["error"]["data"]["path"], "spaces.rename");
}

#[tokio::test]
async fn test_mutation_over_get_is_rejected() {
    let server = create_test_server();

    let response = server
        .get("/trpc/spaces.create")
        .add_header(AUTHORIZATION, bearer(ADA_JWT))
        .await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.json::<Value>()["error"]["data"]["code"],
        "METHOD_NOT_SUPPORTED"
    );
}

#[tokio::test]
async fn test_malformed_input_is_parse_error() {
    let server = create_test_server();

    let response = server
        .get("/trpc/spaces.snapshot")
        .add_query_param("input", "{not json")
        .add_header(AUTHORIZATION, bearer(ADA_JWT))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["error"]["data"]["code"], "PARSE_ERROR");
}

#[tokio::test]
async fn test_missing_collection_config_is_internal_error() {
    let config = AppConfig::builder()
        .baas("http://baas.test/v1", "test")
        .build()
        .unwrap();
    let server = create_test_server_with(config, gateway());

    let response = server
        .get("/trpc/spaces.list")
        .add_header(AUTHORIZATION, bearer(ADA_JWT))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Missing Appwrite DB config"
    );
}

#[tokio::test]
async fn test_store_outage_is_internal_error() {
    let gateway = gateway();
    gateway.store.set_fail_writes(true).await;
    let server = create_test_server_with(test_config(), gateway);

    let response = server
        .post("/trpc/spaces.create")
        .add_header(AUTHORIZATION, bearer(ADA_JWT))
        .json(&json!({"title": "Plans"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Internal server error"
    );
}
