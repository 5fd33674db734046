// Copyright 2026 Local Server Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Parser;
use local_server_core::Config;
use local_server_runtime::cli;

#[derive(Parser)]
#[command(
    name = "local-server",
    about = "Local server: redirect shortcuts and keep distraction sites away",
    version
)]
struct Cli {
    /// Install server on the machine (bind all aliases in the hosts file)
    #[arg(long)]
    install: bool,

    /// Path to a TOML config file (falls back to LOCAL_SERVER_CONFIG)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(cli: &Cli) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config_path = Config::resolve_path(cli.config.as_deref());
    let config = Config::load(config_path.as_deref())?;

    if cli.install {
        cli::install_cmd::run(&config).await
    } else {
        cli::start::run(&config).await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = run(&cli).await {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
