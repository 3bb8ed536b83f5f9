//! fwdepot daemon - Main entry point
//!
//! Serves version-gated configuration documents and firmware binaries to
//! polling IoT devices. Artifacts are placed under the instance directory by
//! deployment tooling; this process only ever reads them.

mod api;
mod config;
mod server;
mod state;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "fwdepot")]
#[command(about = "Version-gated config and firmware distribution endpoint")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "fwdepot.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Instance directory holding the served artifacts
    #[arg(short, long)]
    instance: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("fwdepot v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    // CLI overrides
    if let Some(bind) = args.bind {
        config.daemon.bind = bind;
    }
    if let Some(instance) = args.instance {
        config.storage.instance = instance.to_string_lossy().into_owned();
    }

    info!(
        instance = %config.storage.instance,
        bind = %config.daemon.bind,
        "Configuration loaded"
    );

    let state = state::AppState::new(config.clone());
    server::run(state, &config.daemon.bind, config.daemon.tls.as_ref()).await?;

    Ok(())
}
