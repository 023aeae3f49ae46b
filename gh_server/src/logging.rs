//! Structured logging configuration.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging.
///
/// Log levels are configurable via the `RUST_LOG` environment variable;
/// sqlx and hyper are quieted by default.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Log a rejected authentication attempt with structured fields.
pub fn log_auth_rejected(operation: &str, login: &str, outcome: &str) {
    tracing::warn!(
        operation = operation,
        login = login,
        outcome = outcome,
        "Authentication rejected"
    );
}

/// Log a backend fault with context. The cause is logged here and never
/// surfaced to the client.
pub fn log_backend_failure(operation: &str, error: &dyn std::fmt::Display) {
    tracing::error!(operation = operation, error = %error, "Backend failure");
}
