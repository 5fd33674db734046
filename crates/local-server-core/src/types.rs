//! Core data types for local-server.

use std::path::PathBuf;

/// Outcome of classifying a requested host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Host is a shortcut alias; redirect to the contained absolute URL.
    Shortcut(String),
    /// Host is a block-listed domain or one of its subdomains.
    Distraction,
    /// Host is neither a shortcut nor a distraction.
    Unknown,
}

/// One parsed line of a hosts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFileEntry {
    /// The IP address field, verbatim.
    pub ip: String,
    /// Hostnames bound to `ip`, in line order.
    pub hostnames: Vec<String>,
}

/// Result of scanning a hosts file against the expected alias set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// Aliases already bound to the listener IP, in file-scan order.
    pub found: Vec<String>,
    /// Expected aliases not yet bound, in expected-set order.
    pub missing: Vec<String>,
    /// The stanza appended to the hosts file, if any.
    pub appended: Option<String>,
}

impl ReconciliationResult {
    /// True when the hosts file needed no changes.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Errors that can occur while configuring or reconciling local-server.
#[derive(thiserror::Error, Debug)]
pub enum LocalServerError {
    #[error("Alias {alias} is assigned non-local IP {ip}")]
    ConfigConflict { alias: String, ip: String },

    #[error("Invalid hostfile line {line:?}")]
    Parse { line: String },

    #[error("Insufficient privileges: {0}")]
    Privilege(String),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),
}

/// Convenience result type.
pub type LocalServerResult<T> = Result<T, LocalServerError>;
