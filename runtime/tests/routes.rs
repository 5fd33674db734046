//! Request routing through the full axum router with stub providers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use local_server_core::Config;
use local_server_runtime::acquisition::{ImageProvider, ProviderError};
use local_server_runtime::rest::{router, AppState};
use tower::ServiceExt;

// ── helpers ──

enum Stub {
    Image(&'static str),
    Empty,
    Down,
}

#[async_trait]
impl ImageProvider for Stub {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn random_image(&self, query: Option<&str>) -> Result<String, ProviderError> {
        match self {
            Stub::Image(url) => Ok(format!("{url}?q={}", query.unwrap_or("-"))),
            Stub::Empty => Err(ProviderError::EmptyPool("nothing".to_string())),
            Stub::Down => Err(ProviderError::Transport("upstream down".to_string())),
        }
    }
}

/// Search stub that enforces a query like the real provider.
struct NeedsQuery;

#[async_trait]
impl ImageProvider for NeedsQuery {
    fn name(&self) -> &'static str {
        "needs-query"
    }

    async fn random_image(&self, query: Option<&str>) -> Result<String, ProviderError> {
        match query {
            Some(q) if !q.is_empty() => Ok(format!("https://img.example/{q}.jpg")),
            _ => Err(ProviderError::MissingQuery),
        }
    }
}

fn app(search: impl ImageProvider + 'static, feed: impl ImageProvider + 'static) -> axum::Router {
    let state = AppState::new(&Config::default(), Arc::new(search), Arc::new(feed));
    router(Arc::new(state))
}

async fn get(app: axum::Router, host: &str, uri: &str) -> Response {
    let req = Request::builder()
        .uri(uri)
        .header(header::HOST, host)
        .body(Body::empty())
        .unwrap();
    app.oneshot(req).await.unwrap()
}

async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(resp: &Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// ── catch-all ──

#[tokio::test]
async fn calendar_shortcut_redirects() {
    let resp = get(app(NeedsQuery, Stub::Empty), "c", "/").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "https://www.google.com/calendar/render");
}

#[tokio::test]
async fn shortcut_ignores_path() {
    let resp = get(app(NeedsQuery, Stub::Empty), "d", "/some/where?x=1").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "https://drive.google.com");
}

#[tokio::test]
async fn distraction_gets_diversion_page() {
    for host in ["twitter.com", "www.twitter.com", "mobile.twitter.com"] {
        let resp = get(app(NeedsQuery, Stub::Empty), host, "/home").await;
        assert_eq!(resp.status(), StatusCode::OK, "{host}");
        let ct = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
        assert!(ct.starts_with("text/html"));
        let html = body_text(resp).await;
        assert!(html.contains(&format!("<em>{host}</em>")));
    }
}

#[tokio::test]
async fn unknown_host_is_not_found() {
    let resp = get(app(NeedsQuery, Stub::Empty), "unrelated.com", "/path?a=b").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "Unknown address unrelated.com/path?a=b");
}

#[tokio::test]
async fn unknown_absolute_target_not_prefixed_with_host() {
    let resp = get(
        app(NeedsQuery, Stub::Empty),
        "unrelated.com",
        "http://unrelated.com/x",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "Unknown address http://unrelated.com/x");
}

#[tokio::test]
async fn absolute_target_userinfo_is_not_part_of_host() {
    let resp = get(
        app(NeedsQuery, Stub::Empty),
        "ignored.example",
        "http://user@twitter.com/",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("<em>twitter.com</em>"));
}

// ── image routes ──

#[tokio::test]
async fn search_route_redirects_to_image() {
    let resp = get(app(NeedsQuery, Stub::Empty), "twitter.com", "/__pin/?query=husky").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "https://img.example/husky.jpg");
}

#[tokio::test]
async fn search_route_without_query_is_not_found() {
    for uri in ["/__pin/", "/__pin/?query=", "/__pin"] {
        let resp = get(app(NeedsQuery, Stub::Empty), "twitter.com", uri).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn image_routes_answer_sub_paths() {
    let resp = get(app(NeedsQuery, Stub::Empty), "twitter.com", "/__pin/x?query=husky").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "https://img.example/husky.jpg");

    let resp = get(
        app(NeedsQuery, Stub::Image("https://i.imgur.com/a.jpg")),
        "9gag.com",
        "/__reddit/deep/path",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn feed_route_redirects_to_image() {
    let resp = get(
        app(NeedsQuery, Stub::Image("https://i.imgur.com/a.jpg")),
        "9gag.com",
        "/__reddit/",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "https://i.imgur.com/a.jpg?q=-");
}

#[tokio::test]
async fn feed_route_failures_are_server_errors() {
    let resp = get(app(NeedsQuery, Stub::Empty), "9gag.com", "/__reddit").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(resp).await.contains("No images found"));

    let resp = get(app(NeedsQuery, Stub::Down), "9gag.com", "/__reddit/").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(resp).await.contains("upstream down"));
}
