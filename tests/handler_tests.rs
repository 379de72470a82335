//! Smoke tests for all HTTP handler endpoints.
//!
//! Each handler group (health, auth, categories, bookmarks, chat) gets at
//! least one test that verifies:
//! - Valid requests succeed on fresh (empty) state.
//! - The session middleware rejects unauthenticated access to protected
//!   routes.
//!
//! Run with: `cargo test --test handler_tests`

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use webmark::{
    config::ServerConfig,
    handlers::{build_router, BookmarkManager},
};

// ═══════════════════════════════════════════════════════════════════════
// Test infrastructure
// ═══════════════════════════════════════════════════════════════════════

/// Self-contained test harness over a fresh in-memory store.
struct Harness {
    app: Router,
}

impl Harness {
    fn new() -> Self {
        let mut cfg = ServerConfig::default();
        // Port 9 (discard) guarantees the chat backend is unreachable
        cfg.assistant_endpoint = "http://127.0.0.1:9".to_string();
        let mgr = Arc::new(BookmarkManager::new(cfg));
        Self {
            app: build_router(mgr),
        }
    }

    /// Send a request, returning (status, parsed JSON body, Set-Cookie).
    async fn send(&self, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
        let response = self
            .app
            .clone()
            .oneshot(req)
            .await
            .expect("request should not error");

        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).to_string(),
            ))
        };

        (status, body, set_cookie)
    }

    /// Register a user and return the session cookie pair to send back.
    async fn register(&self, username: &str, password: &str) -> String {
        let (status, _, set_cookie) = self
            .send(json_request(
                Method::POST,
                "/api/register",
                json!({"username": username, "password": password}),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {username}");
        cookie_pair(&set_cookie.expect("register sets a session cookie"))
    }
}

/// Extract `name=value` from a Set-Cookie header for the Cookie header.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .expect("cookie has a name=value part")
        .to_string()
}

// ── request helpers ──

fn json_request(method: Method, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn bare_request(method: Method, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════
// Health & metrics
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn health_reports_counts() {
    let h = Harness::new();
    let (status, body, _) = h.send(bare_request(Method::GET, "/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["users"], 0);
    assert_eq!(body["bookmarks"], 0);
}

#[tokio::test]
async fn liveness_and_readiness_probes() {
    let h = Harness::new();

    let (status, body, _) = h
        .send(bare_request(Method::GET, "/health/live", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");

    let (status, body, _) = h
        .send(bare_request(Method::GET, "/health/ready", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn metrics_exposition_is_public() {
    let h = Harness::new();
    let (status, _, _) = h.send(bare_request(Method::GET, "/metrics", None)).await;
    assert_eq!(status, StatusCode::OK);
}

// ═══════════════════════════════════════════════════════════════════════
// Registration & login
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn register_creates_account_and_session() {
    let h = Harness::new();
    let (status, body, set_cookie) = h
        .send(json_request(
            Method::POST,
            "/api/register",
            json!({"username": "alice", "password": "secret1"}),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["username"], "alice");
    assert!(body.get("password").is_none());

    let cookie = set_cookie.expect("session cookie installed");
    assert!(cookie.starts_with("webmark_session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn register_rejects_missing_and_short_credentials() {
    let h = Harness::new();

    let (status, body, _) = h
        .send(json_request(Method::POST, "/api/register", json!({}), None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    let (status, _, _) = h
        .send(json_request(
            Method::POST,
            "/api/register",
            json!({"username": "bob", "password": "short"}),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let h = Harness::new();
    h.register("alice", "secret1").await;

    let (status, body, _) = h
        .send(json_request(
            Method::POST,
            "/api/register",
            json!({"username": "alice", "password": "other-secret"}),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "USERNAME_TAKEN");
}

#[tokio::test]
async fn login_roundtrip() {
    let h = Harness::new();
    h.register("alice", "secret1").await;

    let (status, body, set_cookie) = h
        .send(json_request(
            Method::POST,
            "/api/login",
            json!({"username": "alice", "password": "secret1"}),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    // The fresh session works
    let cookie = cookie_pair(&set_cookie.unwrap());
    let (status, body, _) = h
        .send(bare_request(Method::GET, "/api/user", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let h = Harness::new();
    h.register("alice", "secret1").await;

    // Wrong password and unknown user look identical
    let (status, body, _) = h
        .send(json_request(
            Method::POST,
            "/api/login",
            json!({"username": "alice", "password": "wrong-password"}),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");

    let (status, body, _) = h
        .send(json_request(
            Method::POST,
            "/api/login",
            json!({"username": "nobody", "password": "whatever1"}),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn login_requires_both_fields() {
    let h = Harness::new();
    let (status, _, _) = h
        .send(json_request(
            Method::POST,
            "/api/login",
            json!({"username": "alice"}),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ═══════════════════════════════════════════════════════════════════════
// Session lifecycle
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn protected_routes_require_session() {
    let h = Harness::new();

    for (method, uri) in [
        (Method::GET, "/api/user"),
        (Method::GET, "/api/categories"),
        (Method::GET, "/api/bookmarks"),
        (Method::GET, "/api/bookmarks/1"),
    ] {
        let (status, body, _) = h.send(bare_request(method, uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["code"], "UNAUTHENTICATED", "{uri}");
    }

    let (status, _, _) = h
        .send(json_request(
            Method::POST,
            "/api/chat",
            json!({"messages": [{"role": "user", "content": "hi"}]}),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_session_token_rejected() {
    let h = Harness::new();
    let (status, _, _) = h
        .send(bare_request(
            Method::GET,
            "/api/user",
            Some("webmark_session=deadbeefdeadbeef"),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let h = Harness::new();
    let cookie = h.register("alice", "secret1").await;

    let (status, _, set_cookie) = h
        .send(bare_request(Method::POST, "/api/logout", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::OK);
    // Cookie cleared
    assert!(set_cookie.unwrap().contains("Max-Age=0"));

    // The old token no longer authenticates
    let (status, _, _) = h
        .send(bare_request(Method::GET, "/api/user", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_session_still_succeeds() {
    let h = Harness::new();
    let (status, _, _) = h.send(bare_request(Method::POST, "/api/logout", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_account_frees_username_and_kills_sessions() {
    let h = Harness::new();
    let cookie = h.register("alice", "secret1").await;

    let (status, body, _) = h
        .send(bare_request(Method::DELETE, "/api/user", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // Session is gone, credentials no longer work
    let (status, _, _) = h
        .send(bare_request(Method::GET, "/api/user", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = h
        .send(json_request(
            Method::POST,
            "/api/login",
            json!({"username": "alice", "password": "secret1"}),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Username can be registered again
    h.register("alice", "secret2").await;
}

// ═══════════════════════════════════════════════════════════════════════
// Categories
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn category_create_list_delete_flow() {
    let h = Harness::new();
    let cookie = h.register("alice", "secret1").await;

    let (status, created, _) = h
        .send(json_request(
            Method::POST,
            "/api/categories",
            json!({"name": "Work"}),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["name"], "Work");
    assert_eq!(created["userId"], 1);

    let (status, list, _) = h
        .send(bare_request(Method::GET, "/api/categories", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body, _) = h
        .send(bare_request(
            Method::DELETE,
            "/api/categories/1",
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("deleted"));

    let (status, list, _) = h
        .send(bare_request(Method::GET, "/api/categories", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn category_validation_and_missing_id() {
    let h = Harness::new();
    let cookie = h.register("alice", "secret1").await;

    let (status, _, _) = h
        .send(json_request(
            Method::POST,
            "/api/categories",
            json!({"name": "   "}),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body, _) = h
        .send(bare_request(
            Method::DELETE,
            "/api/categories/99",
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CATEGORY_NOT_FOUND");
}

// ═══════════════════════════════════════════════════════════════════════
// Bookmarks
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn bookmark_crud_flow() {
    let h = Harness::new();
    let cookie = h.register("alice", "secret1").await;

    let (status, created, _) = h
        .send(json_request(
            Method::POST,
            "/api/bookmarks",
            json!({
                "name": "Rust Blog",
                "url": "https://blog.rust-lang.org",
                "username": "reader",
                "password": "hunter2"
            }),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["userId"], 1);
    assert_eq!(created["username"], "reader");
    assert!(created["createdAt"].is_string());

    // Read back
    let (status, fetched, _) = h
        .send(bare_request(Method::GET, "/api/bookmarks/1", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Rust Blog");

    // Partial update: rename only
    let (status, updated, _) = h
        .send(json_request(
            Method::PUT,
            "/api/bookmarks/1",
            json!({"name": "Rust Blog (official)"}),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Rust Blog (official)");
    assert_eq!(updated["url"], "https://blog.rust-lang.org");

    // Delete
    let (status, _, _) = h
        .send(bare_request(
            Method::DELETE,
            "/api/bookmarks/1",
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body, _) = h
        .send(bare_request(Method::GET, "/api/bookmarks/1", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "BOOKMARK_NOT_FOUND");
}

#[tokio::test]
async fn bookmark_validation() {
    let h = Harness::new();
    let cookie = h.register("alice", "secret1").await;

    // Missing url
    let (status, _, _) = h
        .send(json_request(
            Method::POST,
            "/api/bookmarks",
            json!({"name": "no url"}),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Relative url
    let (status, body, _) = h
        .send(json_request(
            Method::POST,
            "/api/bookmarks",
            json!({"name": "bad", "url": "example.com"}),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn bookmark_category_filing_and_filtering() {
    let h = Harness::new();
    let cookie = h.register("alice", "secret1").await;

    let (_, work, _) = h
        .send(json_request(
            Method::POST,
            "/api/categories",
            json!({"name": "Work"}),
            Some(&cookie),
        ))
        .await;
    let work_id = work["id"].as_i64().unwrap();

    for (name, cat) in [("jira", Some(work_id)), ("news", None)] {
        let (status, _, _) = h
            .send(json_request(
                Method::POST,
                "/api/bookmarks",
                json!({"name": name, "url": format!("https://{name}.example.com"), "categoryId": cat}),
                Some(&cookie),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Unfiltered list sees both
    let (_, all, _) = h
        .send(bare_request(Method::GET, "/api/bookmarks", Some(&cookie)))
        .await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    // Category filter narrows to one
    let (status, filtered, _) = h
        .send(bare_request(
            Method::GET,
            &format!("/api/bookmarks?categoryId={work_id}"),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["name"], "jira");

    // Filtering by a nonexistent category is forbidden, not not-found
    let (status, body, _) = h
        .send(bare_request(
            Method::GET,
            "/api/bookmarks?categoryId=99",
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    // Filing into a nonexistent category is forbidden too
    let (status, _, _) = h
        .send(json_request(
            Method::POST,
            "/api/bookmarks",
            json!({"name": "x", "url": "https://x.example.com", "categoryId": 99}),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bookmark_update_moves_and_clears_category() {
    let h = Harness::new();
    let cookie = h.register("alice", "secret1").await;

    let (_, cat, _) = h
        .send(json_request(
            Method::POST,
            "/api/categories",
            json!({"name": "Work"}),
            Some(&cookie),
        ))
        .await;
    let cat_id = cat["id"].as_i64().unwrap();

    let (_, bookmark, _) = h
        .send(json_request(
            Method::POST,
            "/api/bookmarks",
            json!({"name": "jira", "url": "https://jira.example.com"}),
            Some(&cookie),
        ))
        .await;
    let id = bookmark["id"].as_i64().unwrap();

    // File into the category
    let (status, moved, _) = h
        .send(json_request(
            Method::PUT,
            &format!("/api/bookmarks/{id}"),
            json!({"categoryId": cat_id}),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["categoryId"], cat_id);

    // Explicit null clears it
    let (status, cleared, _) = h
        .send(json_request(
            Method::PUT,
            &format!("/api/bookmarks/{id}"),
            json!({"categoryId": null}),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["categoryId"].is_null());
}

// ═══════════════════════════════════════════════════════════════════════
// Chat assistant
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn chat_validates_messages() {
    let h = Harness::new();
    let cookie = h.register("alice", "secret1").await;

    let (status, _, _) = h
        .send(json_request(
            Method::POST,
            "/api/chat",
            json!({"messages": []}),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = h
        .send(json_request(
            Method::POST,
            "/api/chat",
            json!({"messages": [{"role": "wizard", "content": "hi"}]}),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_degrades_gracefully_without_backend() {
    let h = Harness::new();
    let cookie = h.register("alice", "secret1").await;

    // Harness points the assistant at a dead port: the reply is still 200
    let (status, body, _) = h
        .send(json_request(
            Method::POST,
            "/api/chat",
            json!({"messages": [{"role": "user", "content": "How should I organize my bookmarks?"}]}),
            Some(&cookie),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["content"].as_str().unwrap().contains("Ollama"));
}
