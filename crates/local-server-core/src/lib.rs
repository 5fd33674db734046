//! local-server core: hosts-file reconciliation, domain classification and weighted selection.

pub mod classify;
pub mod config;
pub mod hosts;
pub mod types;
pub mod weighted;

pub use classify::{not_found_message, Classifier};
pub use config::{Config, FeedConfig, FetchConfig, SearchConfig};
pub use hosts::{find_aliases, missing_aliases, parse_line, reconcile, render_stanza};
pub use types::*;
pub use weighted::{choose, pick_weighted, Band};
