//! Authentication data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored account record, one per login.
///
/// The secret is an Argon2id PHC string carrying its own parameters and salt;
/// it never changes after registration. The failure counter is the sole
/// lockout signal and is only ever incremented (wrong password) or reset to
/// zero (successful login).
#[derive(Debug, Clone)]
pub struct Account {
    pub login: String,
    pub secret: String,
    pub failed_logins: i32,
}

/// Issued session record. Immutable once created; expiry is computed from
/// `created_at` at check time, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Account registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub login: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}
