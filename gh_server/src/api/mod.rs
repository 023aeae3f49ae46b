//! HTTP REST API for the authentication service.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: async web framework for the HTTP surface
//! - **Tower**: CORS and request-ID middleware
//! - **Opaque tokens**: random 128-bit session tokens checked on every request
//!
//! # Modules
//!
//! - [`auth`]: account registration and login
//! - [`session`]: token check (`ping`) and the protected session endpoint
//! - [`middleware`]: bearer-token middleware for protected endpoints
//! - [`request_id`]: request-ID generation and propagation
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                 - Liveness check (public)
//! POST /api/v1/auth/register   - Register account (public)
//! POST /api/v1/auth/login      - Login, returns a session token (public)
//! POST /api/v1/ping            - Check a token passed in the body (public)
//! GET  /api/v1/session         - Session status (bearer token required)
//! ```

pub mod auth;
pub mod middleware;
pub mod request_id;
pub mod session;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use gatehouse::AuthManager;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request (cheap, Arc inside); the manager itself is stateless,
/// so a single instance serves every handler concurrently.
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
}

/// Create the complete API router with all endpoints and middleware.
///
/// Routes are versioned under `/api/v1` so the surface can evolve without
/// breaking existing clients; the health check stays unversioned for load
/// balancers.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    let root_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(root_routes)
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create the v1 router: public credential endpoints plus the
/// session-protected routes.
fn create_v1_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/ping", post(session::ping));

    let protected_routes = Router::new()
        .route("/session", get(session::session_status))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_auth_middleware,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Liveness endpoint for monitoring and load balancers.
///
/// Reports the process as up; store reachability is the store adapter's
/// concern and surfaces through the auth endpoints as 500s.
async fn health_check() -> impl IntoResponse {
    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
