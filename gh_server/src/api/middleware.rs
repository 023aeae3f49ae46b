//! Session middleware for protected endpoints.
//!
//! Extracts the opaque token from the `Authorization: Bearer <token>` header,
//! validates it against the session store, and injects it into request
//! extensions for downstream handlers.
//!
//! # Behavior
//!
//! - **Success**: token is fresh → token injected → next handler runs
//! - **Missing header / not a UUID / unknown / expired token**: `401 Unauthorized`

use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use super::AppState;

/// Validate the bearer token and inject it into request extensions.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = match bearer.and_then(|t| Uuid::parse_str(t).ok()) {
        Some(token) => token,
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    match state.auth_manager.check_token(token).await {
        Ok(()) => {
            request.extensions_mut().insert(token);
            Ok(next.run(request).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}
