//! LockBox — sports odds ingestion, analysis, and staking recommendation
//! service.
//!
//! Entry point. Loads configuration, initialises structured logging, opens
//! the ledger database, wires the provider client into the quote cache, and
//! serves the HTTP API with graceful shutdown.

use anyhow::{Context, Result};
use secrecy::Secret;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use lockbox::config::AppConfig;
use lockbox::ledger::BankrollLedger;
use lockbox::odds::cache::QuoteCache;
use lockbox::odds::client::OddsApiClient;
use lockbox::server::{self, AppState};

const BANNER: &str = r#"
 _               _    ____
| |    ___   ___| | _| __ )  _____  __
| |   / _ \ / __| |/ /  _ \ / _ \ \/ /
| |__| (_) | (__|   <| |_) | (_) >  <
|_____\___/ \___|_|\_\____/ \___/_/\_\

  Odds analysis & staking recommendations
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging();
    println!("{BANNER}");
    info!(
        port = cfg.server.port,
        provider = %cfg.provider.base_url,
        cache_ttl_secs = cfg.provider.cache_ttl_secs,
        consistency = ?cfg.bankroll.consistency,
        "LockBox starting up"
    );

    // -- Odds pipeline -----------------------------------------------------

    let api_key = AppConfig::resolve_env(&cfg.provider.api_key_env)?;
    let client = OddsApiClient::new(
        cfg.provider.base_url.clone(),
        Secret::new(api_key),
        Duration::from_secs(cfg.provider.timeout_secs),
    )?;
    let cache = QuoteCache::new(
        Arc::new(client),
        Duration::from_secs(cfg.provider.cache_ttl_secs),
    );

    // -- Ledger ------------------------------------------------------------

    let pool = SqlitePoolOptions::new()
        .connect(&cfg.bankroll.database_url)
        .await
        .with_context(|| format!("Failed to open ledger database: {}", cfg.bankroll.database_url))?;
    let ledger = BankrollLedger::new(pool, cfg.bankroll.consistency, cfg.bankroll.initial_amount);
    ledger.migrate().await?;

    // -- Serve -------------------------------------------------------------

    let state = Arc::new(AppState { cache, ledger });
    let app = server::build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind port {}", cfg.server.port))?;
    info!(addr = %addr, "LockBox listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("LockBox shut down cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received.");
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lockbox=info"));

    let json_logging = std::env::var("LOCKBOX_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
