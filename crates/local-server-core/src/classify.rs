//! Request host classification.

use std::collections::BTreeMap;

use crate::config::Config;
use crate::types::Classification;

/// Prefix of the not-found message for unclassified hosts.
pub const UNKNOWN_ADDRESS: &str = "Unknown address ";

/// Maps a requested host to a [`Classification`].
///
/// Built once from the [`Config`]; classification is pure and total.
#[derive(Debug, Clone)]
pub struct Classifier {
    redirects: BTreeMap<String, String>,
    blocklist: Vec<String>,
}

impl Classifier {
    pub fn new(redirects: BTreeMap<String, String>, blocklist: Vec<String>) -> Self {
        Self {
            redirects,
            blocklist,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.redirects.clone(), config.blocklist.clone())
    }

    /// Shortcuts match the host exactly; distractions match a block-list
    /// entry or any subdomain of one.
    pub fn classify(&self, host: &str) -> Classification {
        if let Some(target) = self.redirects.get(host) {
            return Classification::Shortcut(target.clone());
        }
        if self.is_distraction(host) {
            return Classification::Distraction;
        }
        Classification::Unknown
    }

    fn is_distraction(&self, host: &str) -> bool {
        self.blocklist.iter().any(|domain| {
            host == domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

/// Not-found message for a request that matched nothing.
///
/// `target` is the request target as received. An origin-form target (a bare
/// path) is prefixed with the host; an absolute URL already names it.
pub fn not_found_message(host: &str, target: &str, is_absolute: bool) -> String {
    if is_absolute {
        format!("{UNKNOWN_ADDRESS}{target}")
    } else {
        format!("{UNKNOWN_ADDRESS}{host}{target}")
    }
}
