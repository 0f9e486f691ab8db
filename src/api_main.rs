//! reelbet API Server Binary
//!
//! HTTP front end for placing bets and running spin batches.

use clap::Parser;
use reelbet::api::handlers::AppState;
use reelbet::api::server::{init_tracing, ApiServer, DEFAULT_LOG_FILTER};
use reelbet::config::{validate, ConfigLoader};
use reelbet::BetResolver;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "reelbet-api")]
#[command(about = "Slot machine bet API server", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// API server host
    #[arg(long)]
    host: Option<String>,

    /// API server port
    #[arg(long)]
    port: Option<u16>,

    /// Allowed CORS origins (comma-separated, use * for all)
    #[arg(long)]
    cors_origins: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum spins per batch request
    #[arg(long)]
    max_spins: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(DEFAULT_LOG_FILTER);

    let loader = match &args.config {
        Some(path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(origins) = args.cors_origins {
        config.server.allowed_origins = origins.split(',').map(|s| s.trim().to_string()).collect();
    }
    if let Some(timeout) = args.timeout {
        config.server.request_timeout_secs = timeout;
    }
    if let Some(max_spins) = args.max_spins {
        config.betting.max_spins = max_spins;
    }
    validate(&config)?;

    let resolver = Arc::new(BetResolver::new(Arc::new(config.betting.catalog()?)));
    let state = Arc::new(AppState::new(resolver, config.betting.limits()));

    ApiServer::new(config.server, state).run().await
}
