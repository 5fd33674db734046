//! Content-aggregator feed reader.
//!
//! Picks a random category, reads its top listing as JSON and keeps entries
//! that point at an image. Gallery pages on the image host are rewritten to
//! their direct-image form first.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use local_server_core::{choose, FeedConfig};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use super::{Fetch, ImageProvider, ProviderError};

/// Prefixes of URLs already on the direct-image host.
const IMAGE_HOST_PREFIXES: [&str; 2] = ["http://i.imgur.com/", "https://i.imgur.com/"];

/// Extensions accepted as images regardless of host.
const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Child {
    data: ChildData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChildData {
    url: Option<String>,
}

fn gallery_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https?://(m\.)?imgur\.com/(gallery/)?([^/]+)$").expect("gallery regex is valid")
    })
}

/// Rewrite an image-host page or gallery link to its direct image URL.
///
/// Anything else is returned unchanged.
pub fn normalize_image_url(url: &str) -> String {
    gallery_regex()
        .replace(url, "http://i.imgur.com/${3}.jpg")
        .into_owned()
}

/// Whether a normalized URL can be served as an image.
pub fn is_image_url(url: &str) -> bool {
    IMAGE_HOST_PREFIXES.iter().any(|p| url.starts_with(p))
        || IMAGE_EXTENSIONS.iter().any(|ext| url.ends_with(ext))
}

/// Extract, normalize and filter entry URLs from a listing body.
pub fn extract_images(body: &[u8]) -> Result<Vec<String>, ProviderError> {
    let listing: Listing = serde_json::from_slice(body)
        .map_err(|e| ProviderError::Decode(format!("Invalid feed JSON: {e}")))?;

    let images = listing
        .data
        .children
        .into_iter()
        .filter_map(|child| child.data.url)
        .map(|url| normalize_image_url(&url))
        .filter(|url| {
            let keep = is_image_url(url);
            if !keep {
                debug!("Rejecting picture URL {url}");
            }
            keep
        })
        .collect();

    Ok(images)
}

/// Random image from a content aggregator's top listings.
pub struct FeedProvider {
    fetcher: Arc<dyn Fetch>,
    base_url: String,
    categories: Vec<String>,
}

impl FeedProvider {
    pub fn new(fetcher: Arc<dyn Fetch>, config: &FeedConfig) -> Self {
        Self {
            fetcher,
            base_url: config.base_url.clone(),
            categories: config.categories.clone(),
        }
    }

    /// Top-listing URL for `category`.
    pub fn listing_url(&self, category: &str) -> String {
        format!("{}{category}/top.json", self.base_url)
    }
}

#[async_trait]
impl ImageProvider for FeedProvider {
    fn name(&self) -> &'static str {
        "feed"
    }

    async fn random_image(&self, _query: Option<&str>) -> Result<String, ProviderError> {
        let category = choose(&mut rand::thread_rng(), &self.categories)
            .ok_or_else(|| ProviderError::EmptyPool("no feed categories configured".to_string()))?;

        let url = self.listing_url(category);
        info!("Fetching top listing from {url}");
        let body = self.fetcher.fetch(&url).await?;
        let images = extract_images(&body)?;

        let image = choose(&mut rand::thread_rng(), &images)
            .cloned()
            .ok_or_else(|| ProviderError::EmptyPool(format!("nothing usable in {url}")))?;
        info!("Chosen image: {image}");
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct CannedFeed(Vec<u8>);

    #[async_trait]
    impl Fetch for CannedFeed {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, ProviderError> {
            Ok(self.0.clone())
        }
    }

    fn listing(urls: &[&str]) -> Vec<u8> {
        let children: Vec<_> = urls.iter().map(|u| json!({ "data": { "url": u } })).collect();
        serde_json::to_vec(&json!({ "kind": "Listing", "data": { "children": children } })).unwrap()
    }

    fn provider(body: Vec<u8>) -> FeedProvider {
        FeedProvider::new(Arc::new(CannedFeed(body)), &FeedConfig::default())
    }

    #[test]
    fn test_normalize_gallery_links() {
        assert_eq!(normalize_image_url("http://imgur.com/abc"), "http://i.imgur.com/abc.jpg");
        assert_eq!(
            normalize_image_url("https://m.imgur.com/gallery/XyZ12"),
            "http://i.imgur.com/XyZ12.jpg"
        );
        // Albums and nested paths are left alone.
        assert_eq!(normalize_image_url("http://imgur.com/a/b"), "http://imgur.com/a/b");
        assert_eq!(
            normalize_image_url("https://example.com/imgur.com/x"),
            "https://example.com/imgur.com/x"
        );
    }

    #[test]
    fn test_is_image_url() {
        assert!(is_image_url("http://i.imgur.com/abc"));
        assert!(is_image_url("https://example.com/pic.jpeg"));
        assert!(is_image_url("https://example.com/anim.gif"));
        assert!(!is_image_url("https://www.youtube.com/watch?v=1"));
        assert!(!is_image_url("https://example.com/pic.jpg?w=100"));
    }

    #[test]
    fn test_extract_filters_and_normalizes() {
        let body = listing(&[
            "http://imgur.com/gallery/abc",
            "https://www.reddit.com/r/funny/comments/1",
            "https://i.redd.it/xyz.png",
            "",
        ]);
        assert_eq!(
            extract_images(&body).unwrap(),
            vec!["http://i.imgur.com/abc.jpg", "https://i.redd.it/xyz.png"]
        );
    }

    #[test]
    fn test_extract_missing_fields_is_empty() {
        assert!(extract_images(br#"{"data": {}}"#).unwrap().is_empty());
        assert!(extract_images(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_extract_null_url_is_skipped() {
        let body = br#"{"data": {"children": [
            {"data": {"url": "https://i.imgur.com/a.jpg"}},
            {"data": {"url": null}},
            {"data": {}}
        ]}}"#;
        assert_eq!(extract_images(body).unwrap(), vec!["https://i.imgur.com/a.jpg"]);
    }

    #[test]
    fn test_extract_invalid_json_is_decode_error() {
        assert!(matches!(
            extract_images(b"<html>rate limited</html>"),
            Err(ProviderError::Decode(_))
        ));
    }

    #[test]
    fn test_listing_url() {
        let p = provider(Vec::new());
        assert_eq!(p.listing_url("funny"), "http://www.reddit.com/r/funny/top.json");
    }

    #[tokio::test]
    async fn test_no_images_is_empty_pool() {
        let p = provider(listing(&["https://example.com/story", "https://news.site/a"]));
        assert!(matches!(p.random_image(None).await, Err(ProviderError::EmptyPool(_))));
    }

    #[tokio::test]
    async fn test_single_candidate_chosen() {
        let p = provider(listing(&["https://example.com/story", "https://imgur.com/q1"]));
        assert_eq!(p.random_image(None).await.unwrap(), "http://i.imgur.com/q1.jpg");
    }
}
