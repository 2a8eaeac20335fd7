//! BaaS HTTP client integration tests
//!
//! Runs `BaasClient`, `SessionProvider` and the space repository against a
//! wiremock server speaking the account and document APIs.

use assert_matches::assert_matches;
use crate::common::collection;
use reflecto::baas::{
    AppwriteGateway, BaasClient, BaasError, BaasGateway, Credential, DocumentStore, Query,
};
use reflecto::client::SessionProvider;
use reflecto::shared::{BaasSettings, SpaceColor};
use reflecto::spaces::{FixedIdentity, SpaceRepository};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const DOCUMENTS_PATH: &str = "/databases/db/collections/spaces/documents";

fn settings(server: &MockServer) -> BaasSettings {
    BaasSettings {
        endpoint: server.uri(),
        project_id: "test".to_string(),
    }
}

fn account(id: &str) -> Value {
    json!({
        "$id": id,
        "name": "Ada",
        "email": "ada@example.com",
        "status": true,
        "labels": []
    })
}

fn space_document(space_id: &str, user_id: &str, snapshot: Option<&str>) -> Value {
    let mut document = json!({
        "$id": format!("doc-{}", space_id),
        "$collectionId": "spaces",
        "$databaseId": "db",
        "$createdAt": "2026-10-01T09:00:00.000+00:00",
        "$updatedAt": "2026-10-02T09:00:00.000+00:00",
        "$permissions": [format!("read(\"user:{}\")", user_id)],
        "spaceId": space_id,
        "userId": user_id,
        "title": "Plans",
        "color": "#3b82f6"
    });
    if let Some(snapshot) = snapshot {
        document["snapshot"] = Value::String(snapshot.to_string());
    }
    document
}

/// Parsed `queries[]` parameters of a request
fn queries(request: &Request) -> Vec<Value> {
    request
        .url
        .query_pairs()
        .filter(|(key, _)| key == "queries[]")
        .filter_map(|(_, value)| serde_json::from_str(&value).ok())
        .collect()
}

fn body(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap_or(Value::Null)
}

#[tokio::test]
async fn test_get_account_sends_project_and_jwt_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("X-Appwrite-Project", "test"))
        .and(header("X-Appwrite-JWT", "jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account("u1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = BaasClient::new(settings(&server), Credential::Jwt("jwt-1".to_string()));
    let user = client.get_account().await.unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(user.name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_session_credential_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("X-Appwrite-Session", "secret-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account("u1")))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = AppwriteGateway::new(settings(&server));
    let user = gateway
        .resolve_user(&Credential::Session("secret-1".to_string()))
        .await
        .unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(gateway.session_cookie_name(), "a_session_test");
}

#[tokio::test]
async fn test_list_documents_encodes_queries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCUMENTS_PATH))
        .and(|request: &Request| {
            queries(request)
                == vec![
                    json!({"method": "equal", "attribute": "userId", "values": ["u1"]}),
                    json!({"method": "orderDesc", "attribute": "$updatedAt"}),
                    json!({"method": "limit", "values": [5]}),
                ]
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "documents": [space_document("s1", "u1", None)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BaasClient::new(settings(&server), Credential::Jwt("jwt-1".to_string()));
    let list = client
        .list_documents(
            &collection(),
            &[
                Query::equal("userId", "u1"),
                Query::order_desc("$updatedAt"),
                Query::limit(5),
            ],
        )
        .await
        .unwrap();

    assert_eq!(list.total, 1);
    assert_eq!(list.documents[0].id, "doc-s1");
    assert_eq!(list.documents[0].data["spaceId"], "s1");
}

#[tokio::test]
async fn test_api_error_body_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/missing", DOCUMENTS_PATH)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Document with the requested ID could not be found.",
            "code": 404,
            "type": "document_not_found",
            "version": "1.6.0"
        })))
        .mount(&server)
        .await;

    let client = BaasClient::new(settings(&server), Credential::Jwt("jwt-1".to_string()));
    let err = client
        .delete_document(&collection(), "missing")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_matches!(
        err,
        BaasError::Api { status: 404, kind: Some(ref kind), .. } if kind == "document_not_found"
    );
}

#[tokio::test]
async fn test_plain_text_error_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let client = BaasClient::new(settings(&server), Credential::Anonymous);
    let err = client.get_account().await.unwrap_err();

    assert_matches!(
        err,
        BaasError::Api { status: 502, kind: None, ref message } if message == "upstream unavailable"
    );
}

#[tokio::test]
async fn test_session_secret_falls_back_to_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .and(|request: &Request| {
            body(request) == json!({"email": "ada@example.com", "password": "hunter22"})
        })
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header(
                    "set-cookie",
                    "a_session_test=cookie-secret; path=/; httponly; samesite=none",
                )
                .set_body_json(json!({"$id": "sess-1", "userId": "u1", "secret": ""})),
        )
        .mount(&server)
        .await;

    let client = BaasClient::new(settings(&server), Credential::Anonymous);
    let token = client
        .create_email_password_session("ada@example.com", "hunter22")
        .await
        .unwrap();

    assert_eq!(token.session_id, "sess-1");
    assert_eq!(token.user_id, "u1");
    assert_eq!(token.secret, "cookie-secret");
}

#[tokio::test]
async fn test_repository_writes_owner_scoped_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account("u1")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(DOCUMENTS_PATH))
        .and(|request: &Request| {
            let body = body(request);
            body["data"]["userId"] == "u1"
                && body["data"]["title"] == "Plans"
                && body["data"]["color"] == "#22c55e"
                && body["permissions"]
                    == json!([
                        "read(\"user:u1\")",
                        "update(\"user:u1\")",
                        "delete(\"user:u1\")"
                    ])
        })
        .respond_with(ResponseTemplate::new(201).set_body_json(space_document("s1", "u1", None)))
        .expect(1)
        .mount(&server)
        .await;

    let session = Arc::new(SessionProvider::with_credential(
        settings(&server),
        Credential::Jwt("jwt-1".to_string()),
    ));
    let repository =
        SpaceRepository::new(session.documents().await, session.clone(), collection());

    let space_id = repository
        .create("Plans", SpaceColor::Green, None)
        .await
        .unwrap();
    assert_eq!(space_id.len(), 32);
}

#[tokio::test]
async fn test_repository_reads_snapshot_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCUMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "documents": [space_document("s1", "u1", Some(r#"{"store":{"a":{},"b":{}}}"#))]
        })))
        .mount(&server)
        .await;

    let store = Arc::new(BaasClient::new(
        settings(&server),
        Credential::Jwt("jwt-1".to_string()),
    ));
    let repository = SpaceRepository::new(store, Arc::new(FixedIdentity::user("u1")), collection());

    let snapshot = repository.get_latest_snapshot("s1").await.unwrap();
    assert_eq!(snapshot, Some(json!({"store": {"a": {}, "b": {}}})));

    let spaces = repository.list_for_user().await.unwrap();
    assert_eq!(spaces.len(), 1);
    assert_eq!(spaces[0].record.item_count(), 2);
}

fn cursor(request: &Request) -> Option<Value> {
    queries(request)
        .into_iter()
        .find(|query| query["method"] == "cursorAfter")
        .map(|query| query["values"][0].clone())
}

#[tokio::test]
async fn test_repository_lists_every_page() {
    let server = MockServer::start().await;
    let documents: Vec<Value> = (0..130)
        .map(|i| space_document(&format!("s{}", i), "u1", None))
        .collect();

    Mock::given(method("GET"))
        .and(path(DOCUMENTS_PATH))
        .and(|request: &Request| {
            cursor(request).is_none()
                && queries(request).contains(&json!({"method": "limit", "values": [100]}))
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 130,
            "documents": documents[..100]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DOCUMENTS_PATH))
        .and(|request: &Request| cursor(request) == Some(json!("doc-s99")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 130,
            "documents": documents[100..]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(BaasClient::new(
        settings(&server),
        Credential::Jwt("jwt-1".to_string()),
    ));
    let repository = SpaceRepository::new(store, Arc::new(FixedIdentity::user("u1")), collection());

    let spaces = repository.list_for_user().await.unwrap();

    assert_eq!(spaces.len(), 130);
    assert_eq!(spaces[0].record.space_id, "s0");
    assert_eq!(spaces[129].record.space_id, "s129");
}

#[tokio::test]
async fn test_current_user_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("X-Appwrite-Session", "secret-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account("u1")))
        .expect(1)
        .mount(&server)
        .await;

    let session =
        SessionProvider::with_credential(settings(&server), Credential::Session("secret-1".into()));

    assert_eq!(session.current_user().await.map(|u| u.id), Some("u1".to_string()));
    assert_eq!(session.current_user().await.map(|u| u.id), Some("u1".to_string()));
}

#[tokio::test]
async fn test_stale_cache_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account("u1")))
        .expect(2)
        .mount(&server)
        .await;

    let session =
        SessionProvider::with_credential(settings(&server), Credential::Session("secret-1".into()))
            .with_stale_time(Duration::ZERO);

    session.current_user().await;
    session.current_user().await;
}

#[tokio::test]
async fn test_signed_out_user_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "User (role: guests) missing scope (account)",
            "code": 401,
            "type": "general_unauthorized_scope"
        })))
        .mount(&server)
        .await;

    let session = SessionProvider::new(settings(&server));
    assert_eq!(session.current_user().await, None);
}

#[tokio::test]
async fn test_sign_up_creates_account_then_signs_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/account"))
        .and(|request: &Request| {
            let body = body(request);
            body["email"] == "ada@example.com"
                && body["name"] == "Ada"
                && body["userId"].as_str().map(str::len) == Some(32)
        })
        .respond_with(ResponseTemplate::new(201).set_body_json(account("u1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"$id": "sess-1", "userId": "u1", "secret": "secret-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionProvider::new(settings(&server));
    let token = session
        .sign_up("ada@example.com", "hunter22", Some("Ada"))
        .await
        .unwrap();

    assert_eq!(token.user_id, "u1");
    assert_eq!(session.credential().await, Credential::Session("secret-1".to_string()));
}

#[tokio::test]
async fn test_failed_sign_in_keeps_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid credentials.",
            "code": 401,
            "type": "user_invalid_credentials"
        })))
        .mount(&server)
        .await;

    let session = SessionProvider::new(settings(&server));
    let err = session.sign_in("ada@example.com", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(session.credential().await, Credential::Anonymous);
}

#[tokio::test]
async fn test_sign_out_ignores_errors() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/account/sessions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let session =
        SessionProvider::with_credential(settings(&server), Credential::Session("secret-1".into()));
    session.sign_out().await;

    assert_eq!(session.credential().await, Credential::Anonymous);
}

#[tokio::test]
async fn test_jwt_minting() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/account/jwts"))
        .and(header("X-Appwrite-Session", "secret-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"jwt": "eyJhbGciOi.jwt"})))
        .mount(&server)
        .await;

    let signed_in =
        SessionProvider::with_credential(settings(&server), Credential::Session("secret-1".into()));
    assert_eq!(signed_in.jwt().await.as_deref(), Some("eyJhbGciOi.jwt"));

    // Anonymous requests carry no session header and match nothing
    let signed_out = SessionProvider::new(settings(&server));
    assert_eq!(signed_out.jwt().await, None);
}
