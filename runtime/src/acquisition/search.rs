//! Image-search scraper.
//!
//! Fetches a search results page for a query and pulls out every pin image,
//! recognised as an `<img src="...">` whose own tag later carries the
//! `pinImg` class.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use local_server_core::{choose, SearchConfig};
use regex::Regex;
use tracing::info;

use super::{Fetch, ImageProvider, ProviderError};

fn pin_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"<img src="([^"]*)"[^>]*?class="pinImg"#).expect("pin regex is valid"))
}

/// Extract candidate image URLs from a search results page, in page order.
pub fn extract_images(html: &str) -> Vec<String> {
    pin_regex()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Random image from an image-search site.
pub struct SearchProvider {
    fetcher: Arc<dyn Fetch>,
    base_url: String,
}

impl SearchProvider {
    pub fn new(fetcher: Arc<dyn Fetch>, config: &SearchConfig) -> Self {
        Self {
            fetcher,
            base_url: config.base_url.clone(),
        }
    }

    /// Search page URL for `query`, form-encoded.
    pub fn search_url(&self, query: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{}{encoded}", self.base_url)
    }
}

#[async_trait]
impl ImageProvider for SearchProvider {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn random_image(&self, query: Option<&str>) -> Result<String, ProviderError> {
        let query = query
            .filter(|q| !q.is_empty())
            .ok_or(ProviderError::MissingQuery)?;

        info!("Searching for {query:?}");
        let url = self.search_url(query);
        let body = self.fetcher.fetch(&url).await?;
        let images = extract_images(&String::from_utf8_lossy(&body));

        let image = choose(&mut rand::thread_rng(), &images)
            .cloned()
            .ok_or_else(|| ProviderError::EmptyPool(format!("no pins for query {query:?}")))?;
        info!("Chosen image: {image}");
        Ok(image)
    }
}
