//! Integration tests for the session pipeline using wiremock.
//!
//! These tests run the real `ApiClient` against a mock board server and check
//! what the session guard and startup check do with each response.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use board_client_core::models::PostDraft;
use board_client_core::{ApiClient, ApiError, RecordingSurface, SessionController};

/// Client over a fresh in-memory session, plus the surface it reports to
fn create_test_client(server: &MockServer) -> (ApiClient, Arc<RecordingSurface>) {
    let surface = Arc::new(RecordingSurface::new());
    let session = Arc::new(SessionController::in_memory(surface.clone()));
    let client = ApiClient::new(&server.uri(), session).expect("client");
    (client, surface)
}

fn page_json() -> serde_json::Value {
    json!({
        "content": [{"id": 1, "title": "Hello", "content": "First", "author": "alice"}],
        "number": 0,
        "totalPages": 1,
        "totalElements": 1
    })
}

fn api_error(err: &anyhow::Error) -> &ApiError {
    err.downcast_ref::<ApiError>().expect("ApiError in chain")
}

#[tokio::test]
async fn test_bearer_header_attached_from_store() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/board"))
        .and(query_param("page", "0"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json()))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = create_test_client(&server);
    client.session().store().set("token-1");

    let page = client.list_posts(0).await.expect("list posts");
    assert_eq!(page.content.len(), 1);
}

#[tokio::test]
async fn test_token_change_applies_to_next_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/board/1"))
        .respond_with(|req: &Request| {
            let auth = req
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "title": auth}))
        })
        .mount(&server)
        .await;

    let (client, _) = create_test_client(&server);

    let post = client.get_post(1).await.expect("anonymous get");
    assert_eq!(post.title, "");

    client.session().store().set("late-token");
    let post = client.get_post(1).await.expect("authenticated get");
    assert_eq!(post.title, "Bearer late-token");

    client.session().logout();
    let post = client.get_post(1).await.expect("get after logout");
    assert_eq!(post.title, "");
}

#[tokio::test]
async fn test_authenticated_401_logs_out_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/board"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (client, surface) = create_test_client(&server);
    client.session().store().set("expired");

    let err = client.list_posts(0).await.expect_err("401 must reach the caller");
    assert!(matches!(api_error(&err), ApiError::Unauthorized));
    assert!(!client.session().is_logged_in());
    assert_eq!(surface.redirect_count(), 1);
    assert_eq!(surface.notices().len(), 1);

    // The next rejection finds no session and changes nothing
    let err = client.list_posts(0).await.expect_err("still rejected");
    assert!(matches!(api_error(&err), ApiError::Unauthorized));
    assert_eq!(surface.redirect_count(), 1);
}

#[tokio::test]
async fn test_authenticated_403_logs_out() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/board/5"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let (client, surface) = create_test_client(&server);
    client.session().store().set("token");

    let err = client.delete_post(5).await.expect_err("403 must reach the caller");
    assert!(matches!(api_error(&err), ApiError::AccessDenied(_)));
    assert!(!client.session().is_logged_in());
    assert_eq!(surface.redirect_count(), 1);
}

#[tokio::test]
async fn test_unauthenticated_401_is_not_a_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/board"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (client, surface) = create_test_client(&server);
    let draft = PostDraft {
        title: "t".to_string(),
        content: "c".to_string(),
    };

    client.create_post(&draft).await.expect_err("rejected");
    assert_eq!(surface.redirect_count(), 0);
    assert!(surface.notices().is_empty());
}

#[tokio::test]
async fn test_failed_login_keeps_existing_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let (client, surface) = create_test_client(&server);
    client.session().store().set("current");

    client.login("alice", "wrong").await.expect_err("bad password");
    assert_eq!(client.session().store().get().as_deref(), Some("current"));
    assert_eq!(surface.redirect_count(), 0);
}

#[tokio::test]
async fn test_auth_flow_endpoints_pass_through_any_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (client, surface) = create_test_client(&server);
    client.session().store().set("token");

    client.register("bob", "pw").await.expect_err("register rejected");
    client.me().await.expect_err("probe rejected");
    assert!(client.session().is_logged_in());
    assert_eq!(surface.redirect_count(), 0);
}

#[tokio::test]
async fn test_server_error_keeps_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/board/9/comments"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (client, surface) = create_test_client(&server);
    client.session().store().set("token");

    let err = client.list_comments(9).await.expect_err("server error");
    assert!(matches!(api_error(&err), ApiError::ServerError(..)));
    assert!(client.session().is_logged_in());
    assert_eq!(surface.redirect_count(), 0);
}

#[tokio::test]
async fn test_login_sends_no_token_and_starts_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(|req: &Request| {
            if req.headers.contains_key("authorization") {
                ResponseTemplate::new(400)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"}))
            }
        })
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = create_test_client(&server);
    client.session().store().set("old");

    client.login("alice", "pw").await.expect("login");
    assert_eq!(client.session().store().get().as_deref(), Some("fresh"));
    assert!(client.session().skip_gate().is_set());
}

#[tokio::test]
async fn test_login_with_empty_token_starts_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": ""})))
        .mount(&server)
        .await;

    let (client, _) = create_test_client(&server);
    client.login("alice", "pw").await.expect("login response accepted");
    assert!(!client.session().is_logged_in());
    assert!(!client.session().skip_gate().is_set());
}
