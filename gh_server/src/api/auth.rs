//! Authentication API handlers.
//!
//! Registration and login endpoints. Handlers decode the JSON body, call into
//! the engine, and map the typed outcome to an HTTP status:
//!
//! - `AlreadyExists` → 409
//! - `AccountNotFound` / `WrongPassword` / `Blocked` and stale or unknown
//!   tokens → 401
//! - policy violations (short login/password) → 400
//! - backend faults → 500 with a sanitized body
//!
//! Blocked and wrong-password logins share the 401 status but keep distinct
//! bodies; that distinction is part of the protocol, not an oversight.

use axum::{Json, extract::State, http::StatusCode};
use gatehouse::{AuthError, LoginRequest, RegisterRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::{logging, metrics};

#[derive(Debug, Deserialize)]
pub struct CredentialsPayload {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub status: &'static str,
    pub token: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
}

/// HTTP status for an engine outcome.
pub(super) fn error_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::AlreadyExists => StatusCode::CONFLICT,
        AuthError::AccountNotFound
        | AuthError::WrongPassword
        | AuthError::Blocked
        | AuthError::SessionNotFound
        | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
        AuthError::InvalidLogin(_) | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Short outcome label for logs and metrics.
pub(super) fn outcome_label(err: &AuthError) -> &'static str {
    match err {
        AuthError::AlreadyExists => "already_exists",
        AuthError::AccountNotFound => "not_found",
        AuthError::WrongPassword => "wrong_password",
        AuthError::Blocked => "blocked",
        AuthError::SessionNotFound => "token_not_found",
        AuthError::SessionExpired => "token_expired",
        AuthError::InvalidLogin(_) => "invalid_login",
        AuthError::WeakPassword(_) => "weak_password",
        _ => "fatal",
    }
}

/// Map an engine error to a response, logging backend faults with their
/// cause while the body carries only the sanitized message.
pub(super) fn error_response(
    operation: &str,
    err: AuthError,
) -> (StatusCode, Json<ErrorResponse>) {
    if err.is_fatal() {
        logging::log_backend_failure(operation, &err);
    }

    (
        error_status(&err),
        Json(ErrorResponse {
            status: "ERROR",
            error: err.client_message(),
        }),
    )
}

/// Register a new account.
///
/// # Request Body
///
/// ```json
/// {"login": "alice", "password": "correcthorse"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: login or password below the minimum length
/// - `409 Conflict`: login already registered
/// - `500 Internal Server Error`: storage or hashing failure
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<StatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = RegisterRequest {
        login: payload.login.clone(),
        password: payload.password,
    };

    match state.auth_manager.register(request).await {
        Ok(()) => {
            tracing::info!(login = %payload.login, "Account registered");
            metrics::registration("ok");
            Ok(Json(StatusResponse { status: "OK" }))
        }
        Err(e) => {
            if !e.is_fatal() {
                logging::log_auth_rejected("register", &payload.login, outcome_label(&e));
            }
            metrics::registration(outcome_label(&e));
            Err(error_response("register", e))
        }
    }
}

/// Authenticate an account and issue a session token.
///
/// # Request Body
///
/// ```json
/// {"login": "alice", "password": "correcthorse"}
/// ```
///
/// # Response
///
/// On success, `200 OK` with the opaque token:
/// ```json
/// {"status": "OK", "token": "7f8a6e0e-..."}
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown login, wrong password, or blocked account.
///   Wrong passwords count toward the lockout threshold; blocked attempts
///   do not.
/// - `500 Internal Server Error`: storage or hashing failure
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<TokenResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = LoginRequest {
        login: payload.login.clone(),
        password: payload.password,
    };

    match state.auth_manager.login(request).await {
        Ok(session) => {
            tracing::info!(login = %payload.login, "Login succeeded");
            metrics::login_attempt("success");
            Ok(Json(TokenResponse {
                status: "OK",
                token: session.token,
            }))
        }
        Err(e) => {
            if !e.is_fatal() {
                logging::log_auth_rejected("login", &payload.login, outcome_label(&e));
            }
            metrics::login_attempt(outcome_label(&e));
            Err(error_response("login", e))
        }
    }
}
