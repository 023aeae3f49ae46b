//! Gatehouse authentication server.
//!
//! Database-backed credential authentication over HTTP: account
//! registration, login with brute-force lockout, and opaque session tokens
//! with a fixed expiry window.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use gatehouse::{
    auth::AuthManager,
    db::{Database, PgAccountStore, PgSessionStore},
};
use gh_server::{api, config::ServerConfig, logging, metrics};
use pico_args::Arguments;
use tracing::info;

const HELP: &str = "\
Run the gatehouse authentication server

USAGE:
  gh_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string (required)
  AUTH_MIN_LOGIN_LEN       Minimum login length                [default: 4]
  AUTH_MIN_PASSWORD_LEN    Minimum password length             [default: 8]
  AUTH_MAX_FAILED_LOGINS   Failed logins before lockout        [default: 5]
  AUTH_SESSION_TTL_SECS    Session token lifetime in seconds   [default: 3600]
  METRICS_BIND             Prometheus exporter address (optional)
  (See .env file for database pool options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let database_url_override: Option<String> = pargs.opt_value_from_str("--db-url")?;

    logging::init();

    let config = ServerConfig::from_env(bind_override, database_url_override)?;
    config.validate()?;

    info!("Connecting to database");
    let db = Database::new(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {e}"))?;
    db.ensure_schema()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare schema: {e}"))?;
    info!("Database ready");

    let pool = db.pool().clone();
    let accounts = Arc::new(PgAccountStore::new(pool.clone()));
    let sessions = Arc::new(PgSessionStore::new(pool));
    let auth_manager = Arc::new(AuthManager::new(accounts, sessions, config.auth.policy()));

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(Error::msg)?;
        info!("Prometheus metrics exposed at http://{addr}/metrics");
    }

    let state = api::AppState { auth_manager };
    let app = api::create_router(state);

    info!("Starting HTTP server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {e}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    info!("Shutting down server");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
