//! Start the local-server listener.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use local_server_core::Config;
use tracing::info;

use crate::acquisition::feed::FeedProvider;
use crate::acquisition::http_client::HttpClient;
use crate::acquisition::search::SearchProvider;
use crate::acquisition::{Fetch, ImageProvider};
use crate::rest::{self, AppState};

/// Wire the providers to a shared HTTP client and build the app state.
pub fn build_state(config: &Config) -> Result<Arc<AppState>> {
    let client: Arc<dyn Fetch> = Arc::new(HttpClient::new(&config.fetch)?);
    let search: Arc<dyn ImageProvider> =
        Arc::new(SearchProvider::new(Arc::clone(&client), &config.search));
    let feed: Arc<dyn ImageProvider> = Arc::new(FeedProvider::new(client, &config.feed));

    Ok(Arc::new(AppState::new(config, search, feed)))
}

/// Serve on the configured listener until shut down.
pub async fn run(config: &Config) -> Result<()> {
    let state = build_state(config)?;
    let addr = SocketAddr::new(config.listen_ip, config.port);

    info!(
        "local-server v{} serving {} shortcuts and {} blocked domains",
        env!("CARGO_PKG_VERSION"),
        config.redirects.len(),
        config.blocklist.len()
    );

    rest::start(addr, state)
        .await
        .with_context(|| format!("failed to serve on {addr}"))
}
