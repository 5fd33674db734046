//! Configuration loading and resolution.
//!
//! A [`Config`] is built once at startup, either from the built-in defaults or
//! from a TOML file, and is shared read-only by the reconciler and the router
//! for the lifetime of the process.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::{LocalServerError, LocalServerResult};

/// Default IP the listener binds and every alias must resolve to.
pub const DEFAULT_LISTEN_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 42, 42));

/// Default listener port.
pub const DEFAULT_PORT: u16 = 443;

/// Default hosts file.
pub const DEFAULT_HOSTS_FILE: &str = "/etc/hosts";

/// Environment variable naming a config file when none is passed explicitly.
pub const CONFIG_ENV: &str = "LOCAL_SERVER_CONFIG";

/// Immutable process-wide configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub listen_ip: IpAddr,
    pub port: u16,
    pub hosts_file: PathBuf,
    /// Shortcut alias → absolute redirect target.
    pub redirects: BTreeMap<String, String>,
    /// Bare distraction domains (no `www.` prefix).
    pub blocklist: Vec<String>,
    pub fetch: FetchConfig,
    pub search: SearchConfig,
    pub feed: FeedConfig,
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Upper bound on a single outbound fetch, in milliseconds.
    pub timeout_ms: u64,
    pub user_agent: String,
}

/// Image-search provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Search URL prefix; the encoded query is appended.
    pub base_url: String,
    /// Query used by the diversion page.
    pub default_query: String,
}

/// Content-aggregator feed provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Feed URL prefix; `{category}/top.json` is appended.
    pub base_url: String,
    pub categories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let redirects = [
            ("c", "https://www.google.com/calendar/render"),
            ("d", "https://drive.google.com"),
            ("m", "https://inbox.google.com"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let blocklist = ["facebook.com", "news.ycombinator.com", "9gag.com", "twitter.com"]
            .into_iter()
            .map(String::from)
            .collect();

        Self {
            listen_ip: DEFAULT_LISTEN_IP,
            port: DEFAULT_PORT,
            hosts_file: PathBuf::from(DEFAULT_HOSTS_FILE),
            redirects,
            blocklist,
            fetch: FetchConfig::default(),
            search: SearchConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/131.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.pinterest.com/search/?q=".to_string(),
            default_query: "husky".to_string(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.reddit.com/r/".to_string(),
            categories: [
                "Pictures",
                "funny",
                "EarthPorn",
                "CityPorn",
                "AnimalPorn",
                "itookapicture",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or the built-in defaults when `None`.
    pub fn load(path: Option<&Path>) -> LocalServerResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|source| LocalServerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw)
            .map_err(|e| LocalServerError::Config(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml(raw: &str) -> LocalServerResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| LocalServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> LocalServerResult<()> {
        if self.feed.categories.is_empty() {
            return Err(LocalServerError::Config(
                "feed.categories must not be empty".to_string(),
            ));
        }
        if let Some(entry) = self.blocklist.iter().find(|d| d.is_empty()) {
            return Err(LocalServerError::Config(format!(
                "invalid blocklist entry {entry:?}"
            )));
        }
        Ok(())
    }

    /// Resolve the config file path: explicit flag, then `LOCAL_SERVER_CONFIG`.
    pub fn resolve_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        std::env::var(CONFIG_ENV).ok().map(PathBuf::from)
    }

    /// Every name that must resolve to the listener.
    ///
    /// Shortcut keys first, then each block-list entry preceded by its `www.`
    /// variant (unless it already carries one). Each alias appears once.
    pub fn expected_aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = Vec::new();
        let mut push = |alias: String| {
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        };
        for key in self.redirects.keys() {
            push(key.clone());
        }
        for domain in &self.blocklist {
            if !domain.starts_with("www.") {
                push(format!("www.{domain}"));
            }
            push(domain.clone());
        }
        aliases
    }
}
