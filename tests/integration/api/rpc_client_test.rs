//! RPC client against a live server
//!
//! Serves the real router on an ephemeral port and drives it through
//! `RpcClient`, the way the web client talks to the API.

use crate::common::{test_config, user, FakeGateway};
use reflecto::backend::routes::create_router;
use reflecto::backend::server::AppState;
use reflecto::client::{ClientConfig, HealthStatus, RpcClient};
use reflecto::shared::rpc::{CreateSpaceInput, RpcErrorCode, UpdateSpaceInput};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let gateway = FakeGateway::new().with_jwt("jwt-ada", user("ada", "Ada"));
    let app = create_router(AppState::new(test_config(), Some(Arc::new(gateway))));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(url: &str, token: Option<&str>) -> RpcClient {
    let mut config = ClientConfig::with_server_url(url);
    config.set_token(token.map(str::to_string));
    RpcClient::new(config)
}

#[tokio::test]
async fn test_health_check_online() {
    let url = spawn_server().await;
    assert_eq!(client(&url, None).health_check().await, HealthStatus::Online);
}

#[tokio::test]
async fn test_signed_out_client_is_unauthorized() {
    let url = spawn_server().await;

    let err = client(&url, None).private_data().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.code(), Some(RpcErrorCode::Unauthorized));
}

#[tokio::test]
async fn test_space_calls_round_trip() {
    let url = spawn_server().await;
    let rpc = client(&url, Some("jwt-ada"));

    let private = rpc.private_data().await.unwrap();
    assert_eq!(private.user.id, "ada");

    let space_id = rpc
        .create_space(&CreateSpaceInput {
            title: "Plans".to_string(),
            color: Some("#a855f7".to_string()),
            snapshot: None,
        })
        .await
        .unwrap();

    rpc.update_space(&UpdateSpaceInput {
        space_id: space_id.clone(),
        title: Some("Q3 Plans".to_string()),
        color: None,
    })
    .await
    .unwrap();

    let snapshot = json!({"store": {"shape:a": {"x": 10}}});
    rpc.save_snapshot(&space_id, snapshot.clone()).await.unwrap();
    assert_eq!(rpc.space_snapshot(&space_id).await.unwrap(), Some(snapshot));

    let spaces = rpc.list_spaces().await.unwrap();
    assert_eq!(spaces.len(), 1);
    assert_eq!(spaces[0].record.display_title(), "Q3 Plans");
    assert_eq!(spaces[0].record.color.as_deref(), Some("#a855f7"));
    assert_eq!(spaces[0].record.item_count(), 1);

    rpc.delete_space(&space_id).await.unwrap();
    assert!(rpc.list_spaces().await.unwrap().is_empty());

    let err = rpc.delete_space(&space_id).await.unwrap_err();
    assert_eq!(err.code(), Some(RpcErrorCode::NotFound));
}
