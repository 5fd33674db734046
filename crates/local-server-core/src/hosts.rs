//! Hosts-file alias reconciliation.
//!
//! Scans a hosts file for the aliases local-server depends on, refuses to
//! proceed when one of them is bound to a foreign IP, and appends a single
//! stanza binding whatever is missing to the listener IP. Existing content is
//! never rewritten, so running the reconciliation again is a no-op.

use std::fs::OpenOptions;
use std::io::Write;
use std::net::IpAddr;
use std::path::Path;

use tracing::{debug, info};

use crate::types::{HostFileEntry, LocalServerError, LocalServerResult, ReconciliationResult};

/// Header line written above every appended stanza.
pub const STANZA_HEADER: &str = "# Local server config";

/// Parse one hosts-file line.
///
/// Returns `Ok(None)` for blank and comment-only lines. Anything else must
/// carry an IP followed by at least one hostname.
pub fn parse_line(line: &str) -> LocalServerResult<Option<HostFileEntry>> {
    let content = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };

    let mut fields = content.split_whitespace();
    let Some(ip) = fields.next() else {
        return Ok(None);
    };
    let hostnames: Vec<String> = fields.map(String::from).collect();
    if hostnames.is_empty() {
        return Err(LocalServerError::Parse {
            line: line.to_string(),
        });
    }

    Ok(Some(HostFileEntry {
        ip: ip.to_string(),
        hostnames,
    }))
}

/// Collect the members of `aliases` already bound to `listen_ip`.
///
/// The result follows file-scan order and is not deduplicated. The first
/// alias found on a line with a different IP aborts the scan with
/// [`LocalServerError::ConfigConflict`].
pub fn find_aliases(
    content: &str,
    aliases: &[String],
    listen_ip: &IpAddr,
) -> LocalServerResult<Vec<String>> {
    let local = listen_ip.to_string();
    let mut found = Vec::new();

    for line in content.lines() {
        let Some(entry) = parse_line(line)? else {
            continue;
        };
        let is_local = entry.ip == local;

        for host in &entry.hostnames {
            for alias in aliases.iter().filter(|a| *a == host) {
                if !is_local {
                    return Err(LocalServerError::ConfigConflict {
                        alias: alias.clone(),
                        ip: entry.ip.clone(),
                    });
                }
                found.push(alias.clone());
            }
        }
    }

    Ok(found)
}

/// `expected` minus `found`, in `expected` order.
pub fn missing_aliases(expected: &[String], found: &[String]) -> Vec<String> {
    expected
        .iter()
        .filter(|alias| !found.contains(alias))
        .cloned()
        .collect()
}

/// Render the stanza binding `aliases` to `listen_ip`.
pub fn render_stanza(listen_ip: &IpAddr, aliases: &[String]) -> String {
    format!("\n{STANZA_HEADER}\n{listen_ip}\t{}\n", aliases.join(" "))
}

/// Ensure every alias in `expected` resolves to `listen_ip` in the hosts file at `path`.
///
/// Reads and validates the whole file before touching it; on any error the
/// file is left unchanged. At most one append is performed.
pub fn reconcile(
    path: &Path,
    expected: &[String],
    listen_ip: &IpAddr,
) -> LocalServerResult<ReconciliationResult> {
    let io_err = |source| LocalServerError::Io {
        path: path.to_path_buf(),
        source,
    };

    let content = std::fs::read_to_string(path).map_err(io_err)?;
    let found = find_aliases(&content, expected, listen_ip)?;
    let missing = missing_aliases(expected, &found);
    debug!(found = found.len(), missing = missing.len(), "scanned {}", path.display());

    if missing.is_empty() {
        return Ok(ReconciliationResult {
            found,
            missing,
            appended: None,
        });
    }

    let stanza = render_stanza(listen_ip, &missing);
    info!("Adding hostfile content {stanza:?}");

    let mut file = OpenOptions::new().append(true).open(path).map_err(io_err)?;
    file.write_all(stanza.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;

    Ok(ReconciliationResult {
        found,
        missing,
        appended: Some(stanza),
    })
}
