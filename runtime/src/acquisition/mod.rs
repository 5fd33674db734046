//! Random-image acquisition.
//!
//! Two providers back the diversion page: [`search::SearchProvider`] scrapes an
//! image-search results page, [`feed::FeedProvider`] reads a content
//! aggregator's JSON listing. Both fetch through the [`Fetch`] trait so the
//! network layer can be swapped out.

pub mod feed;
pub mod http_client;
pub mod search;

use async_trait::async_trait;

/// Errors surfaced by image providers.
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    /// The caller did not supply a required query.
    #[error("Missing query")]
    MissingQuery,

    /// The upstream could not be reached or its body could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The upstream answered with data of an unexpected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Nothing usable was left after extraction and filtering.
    #[error("No images found: {0}")]
    EmptyPool(String),
}

/// Retrieve the raw body behind a URL.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Something that can hand out one random image URL per call.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn random_image(&self, query: Option<&str>) -> Result<String, ProviderError>;
}
