// Copyright 2026 Local Server Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface for local-server.
//!
//! Every request lands on the catch-all handler, which classifies the
//! requested host and answers with a shortcut redirect, a diversion page, or
//! a not-found message. Two helper routes serve the random images the
//! diversion page embeds.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use local_server_core::{not_found_message, Classification, Classifier, Config};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::acquisition::{ImageProvider, ProviderError};
use crate::render::DiversionRenderer;

/// Route serving a random image from the search provider.
pub const SEARCH_PATH: &str = "/__pin/";

/// Route serving a random image from the feed provider.
pub const FEED_PATH: &str = "/__reddit/";

/// Read-only state shared by all requests.
pub struct AppState {
    pub classifier: Classifier,
    pub renderer: DiversionRenderer,
    pub search: Arc<dyn ImageProvider>,
    pub feed: Arc<dyn ImageProvider>,
}

impl AppState {
    pub fn new(
        config: &Config,
        search: Arc<dyn ImageProvider>,
        feed: Arc<dyn ImageProvider>,
    ) -> Self {
        Self {
            classifier: Classifier::from_config(config),
            renderer: DiversionRenderer::new(config.search.default_query.as_str()),
            search,
            feed,
        }
    }
}

/// Build the axum Router with the image routes and the catch-all.
///
/// Each image route also answers every path below it.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(SEARCH_PATH, any(handle_search))
        .route(SEARCH_PATH.trim_end_matches('/'), any(handle_search))
        .route(&format!("{SEARCH_PATH}*rest"), any(handle_search))
        .route(FEED_PATH, any(handle_feed))
        .route(FEED_PATH.trim_end_matches('/'), any(handle_feed))
        .route(&format!("{FEED_PATH}*rest"), any(handle_feed))
        .fallback(handle_request)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on `addr` until Ctrl-C.
pub async fn start(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting server on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("received shutdown signal");
}

// ── Helpers ─────────────────────────────────────────────────────

/// 302 to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Host the client asked for: the authority of an absolute-form target
/// without any userinfo, otherwise the `Host` header.
fn requested_host<'a>(uri: &'a Uri, headers: &'a HeaderMap) -> &'a str {
    if let Some(authority) = uri.authority() {
        let host_port = authority.as_str();
        return match host_port.rfind('@') {
            Some(at) => &host_port[at + 1..],
            None => host_port,
        };
    }
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// The request target as sent, and whether it was an absolute URL.
fn request_target(uri: &Uri) -> (String, bool) {
    if uri.scheme().is_some() {
        (uri.to_string(), true)
    } else {
        let target = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        (target.to_string(), false)
    }
}

impl IntoResponse for ProviderError {
    fn into_response(self) -> Response {
        match self {
            ProviderError::MissingQuery => {
                (StatusCode::NOT_FOUND, "404 page not found").into_response()
            }
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response(),
        }
    }
}

async fn serve_image(provider: &dyn ImageProvider, query: Option<&str>) -> Response {
    match provider.random_image(query).await {
        Ok(image) => found(&image),
        Err(e) => {
            warn!(provider = provider.name(), "{e}");
            e.into_response()
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────

async fn handle_request(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let host = requested_host(&uri, &headers);
    let (target, is_absolute) = request_target(&uri);
    info!("Request to {host}{target}");

    match state.classifier.classify(host) {
        Classification::Shortcut(url) => {
            info!(host, "redirecting to {url}");
            found(&url)
        }
        Classification::Distraction => {
            info!(host, "serving diversion page");
            Html(state.renderer.render(host)).into_response()
        }
        Classification::Unknown => {
            info!(host, "unknown address");
            (
                StatusCode::NOT_FOUND,
                not_found_message(host, &target, is_absolute),
            )
                .into_response()
        }
    }
}

/// Search route query parameters.
#[derive(Deserialize, Default)]
struct SearchParams {
    query: Option<String>,
}

async fn handle_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    serve_image(state.search.as_ref(), params.query.as_deref()).await
}

async fn handle_feed(State(state): State<Arc<AppState>>) -> Response {
    serve_image(state.feed.as_ref(), None).await
}
