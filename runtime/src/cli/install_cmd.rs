//! `local-server --install`: bind every alias to the listener in the hosts file.

use anyhow::{Context, Result};
use local_server_core::{reconcile, Config, LocalServerError, LocalServerResult};
use tracing::info;

/// Whether the process runs with an effective uid of root.
#[cfg(unix)]
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_root() -> bool {
    false
}

/// Fail with a privilege error unless running as root.
pub fn ensure_root() -> LocalServerResult<()> {
    if is_root() {
        Ok(())
    } else {
        Err(LocalServerError::Privilege(
            "needs to be root for installation".to_string(),
        ))
    }
}

/// Check privileges, then reconcile the hosts file.
pub async fn run(config: &Config) -> Result<()> {
    ensure_root()?;
    reconcile_hosts(config)
}

/// Reconcile the configured hosts file against the expected aliases.
pub fn reconcile_hosts(config: &Config) -> Result<()> {
    let path = &config.hosts_file;
    let aliases = config.expected_aliases();
    info!("Checking {} for {} aliases", path.display(), aliases.len());

    let result = reconcile(path, &aliases, &config.listen_ip)
        .with_context(|| format!("Can't set up {}", path.display()))?;

    if result.is_complete() {
        println!("  All aliases already point to {}.", config.listen_ip);
    } else {
        println!(
            "  Added {} aliases to {}: {}",
            result.missing.len(),
            path.display(),
            result.missing.join(" ")
        );
    }
    Ok(())
}
