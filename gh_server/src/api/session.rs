//! Session-token check handlers.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use super::auth::{ErrorResponse, error_response, outcome_label};
use crate::{logging, metrics};

#[derive(Debug, Deserialize)]
pub struct PingPayload {
    pub token: Uuid,
}

#[derive(Debug, Serialize)]
pub struct PongResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub status: &'static str,
    pub token: Uuid,
}

/// Check a session token passed in the request body.
///
/// # Request Body
///
/// ```json
/// {"token": "7f8a6e0e-..."}
/// ```
///
/// # Response
///
/// `200 OK` with a pong while the token is inside its expiry window.
///
/// # Errors
///
/// - `401 Unauthorized`: token was never issued or has expired. Expiry is
///   fixed from creation time; checking a token does not extend it.
/// - `500 Internal Server Error`: storage failure
pub async fn ping(
    State(state): State<AppState>,
    Json(payload): Json<PingPayload>,
) -> Result<Json<PongResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.auth_manager.check_token(payload.token).await {
        Ok(()) => {
            metrics::token_check("valid");
            Ok(Json(PongResponse {
                status: "OK",
                message: "pong",
            }))
        }
        Err(e) => {
            if !e.is_fatal() {
                logging::log_auth_rejected("ping", "-", outcome_label(&e));
            }
            metrics::token_check(outcome_label(&e));
            Err(error_response("ping", e))
        }
    }
}

/// Session status behind the bearer-token middleware.
///
/// Reaching this handler at all means the middleware already validated the
/// token; it echoes which session is active.
pub async fn session_status(Extension(token): Extension<Uuid>) -> Json<SessionStatusResponse> {
    Json(SessionStatusResponse {
        status: "OK",
        token,
    })
}
