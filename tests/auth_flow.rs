//! Session lifecycle tests against a mock HTTP server.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use botmetrics::{ApiConfig, ApiError, ApiRequest, Credential, SessionManager, TokenStore};

fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        prefix: "/api/v1".to_string(),
        external_base_url: None,
        timeout_secs: 5,
    }
}

fn fresh_session(server: &MockServer, dir: &tempfile::TempDir) -> SessionManager {
    let store = TokenStore::new(dir.path().join("tokens.json"));
    SessionManager::new(api_config(server), store).unwrap()
}

/// Build a session whose store already holds a token pair (cold start
/// with a persisted session).
fn seeded_session(
    server: &MockServer,
    dir: &tempfile::TempDir,
    access: &str,
    refresh: &str,
) -> SessionManager {
    let path = dir.path().join("tokens.json");
    TokenStore::new(path.clone())
        .save(&Credential {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        })
        .unwrap();
    SessionManager::new(api_config(server), TokenStore::new(path)).unwrap()
}

fn stored_tokens(dir: &tempfile::TempDir) -> Option<Credential> {
    TokenStore::new(dir.path().join("tokens.json"))
        .load()
        .unwrap()
}

#[tokio::test]
async fn login_persists_both_tokens() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A1",
            "refresh_token": "R1",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = fresh_session(&server, &dir);
    assert!(!session.is_authenticated().await);

    session.login("alice", "secret").await.unwrap();
    assert!(session.is_authenticated().await);

    let stored = stored_tokens(&dir).expect("tokens should be persisted");
    assert_eq!(stored.access_token, "A1");
    assert_eq!(stored.refresh_token, "R1");
}

#[tokio::test]
async fn rejected_login_fails_without_retry() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let session = fresh_session(&server, &dir);
    let err = session.login("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, ApiError::Authentication));
    assert!(!session.is_authenticated().await);
    assert!(stored_tokens(&dir).is_none());
}

#[tokio::test]
async fn logout_is_idempotent() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session = seeded_session(&server, &dir, "A1", "R1");

    session.logout().await;
    session.logout().await;

    assert!(!session.is_authenticated().await);
    assert!(stored_tokens(&dir).is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn refresh_without_token_makes_no_network_call() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session = fresh_session(&server, &dir);

    assert!(!session.refresh_access_token().await);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_refresh_leaves_tokens_untouched() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session = seeded_session(&server, &dir, "OLD", "R1");

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert!(!session.refresh_access_token().await);

    let stored = stored_tokens(&dir).expect("pair must survive a failed refresh");
    assert_eq!(stored.access_token, "OLD");
    assert_eq!(stored.refresh_token, "R1");

    // The in-memory token is unchanged too: the next call still sends it.
    session.execute(&ApiRequest::get("/ping")).await.unwrap();
    let requests = server.received_requests().await.unwrap();
    let ping = requests
        .iter()
        .find(|r| r.url.path() == "/api/v1/ping")
        .unwrap();
    assert_eq!(
        ping.headers.get("authorization").unwrap().to_str().unwrap(),
        "Bearer OLD"
    );
}

#[tokio::test]
async fn successful_refresh_replaces_both_tokens() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session = seeded_session(&server, &dir, "OLD", "R1");

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(header("authorization", "Bearer R1"))
        .and(body_json(json!({"refresh_token": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "NEW",
            "refresh_token": "R2",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(session.refresh_access_token().await);

    let stored = stored_tokens(&dir).unwrap();
    assert_eq!(stored.access_token, "NEW");
    assert_eq!(stored.refresh_token, "R2");
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_retried_once() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session = seeded_session(&server, &dir, "OLD", "R1");

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/stats"))
        .and(header("authorization", "Bearer OLD"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/stats"))
        .and(header("authorization", "Bearer NEW"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_users": 7})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "NEW",
            "refresh_token": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = session
        .execute(&ApiRequest::get("/dashboard/stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let requests = server.received_requests().await.unwrap();
    let stats_calls: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/api/v1/dashboard/stats")
        .collect();
    assert_eq!(stats_calls.len(), 2, "exactly one retry");
    assert_eq!(
        stats_calls[1]
            .headers
            .get("authorization")
            .unwrap()
            .to_str()
            .unwrap(),
        "Bearer NEW"
    );
    assert_eq!(
        stats_calls[0]
            .headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn still_unauthorized_after_retry_returns_response_unmodified() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session = seeded_session(&server, &dir, "OLD", "R1");

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/stats"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "NEW",
            "refresh_token": "R2"
        })))
        .mount(&server)
        .await;

    let response = session
        .execute(&ApiRequest::get("/dashboard/stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    // Retry happened, and the refreshed session is kept.
    let requests = server.received_requests().await.unwrap();
    let stats_calls = requests
        .iter()
        .filter(|r| r.url.path() == "/api/v1/dashboard/stats")
        .count();
    assert_eq!(stats_calls, 2);
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn failed_refresh_after_401_forces_logout() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session = seeded_session(&server, &dir, "OLD", "R1");

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/stats"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = session
        .execute(&ApiRequest::get("/dashboard/stats"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));
    assert!(!session.is_authenticated().await);
    assert!(stored_tokens(&dir).is_none());
}

#[tokio::test]
async fn concurrent_refreshes_coalesce_into_one_call() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session = seeded_session(&server, &dir, "OLD", "R1");

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "NEW",
            "refresh_token": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (first, second) = tokio::join!(
        session.refresh_access_token(),
        session.refresh_access_token()
    );
    assert!(first);
    assert!(second);

    let refresh_calls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/v1/auth/refresh")
        .count();
    assert_eq!(refresh_calls, 1);
}

#[tokio::test]
async fn endpoint_paths_are_normalized_to_leading_slash() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session = seeded_session(&server, &dir, "A1", "R1");

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let response = session
        .execute(&ApiRequest::get("dashboard/stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}
