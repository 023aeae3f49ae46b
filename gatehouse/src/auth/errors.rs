//! Authentication error types.

use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store call exceeded its timeout
    #[error("Storage operation timed out")]
    StorageTimeout,

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Stored secret could not be parsed
    #[error("Stored secret is malformed")]
    CorruptSecret,

    /// No account for the given login
    #[error("Account not found")]
    AccountNotFound,

    /// Login already registered
    #[error("Login already registered")]
    AlreadyExists,

    /// Password did not match the stored secret
    #[error("Wrong password")]
    WrongPassword,

    /// Account locked after too many failed logins
    #[error("Account is blocked")]
    Blocked,

    /// No session for the given token
    #[error("Session not found")]
    SessionNotFound,

    /// Session token outlived its expiry window
    #[error("Session expired")]
    SessionExpired,

    /// Login rejected by the minimum-length policy
    #[error("Invalid login: {0}")]
    InvalidLogin(String),

    /// Password rejected by the minimum-length policy
    #[error("Weak password: {0}")]
    WeakPassword(String),
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Storage and hashing faults are sanitized so that internal detail never
    /// reaches a response body. Every expected outcome is safe to expose.
    pub fn client_message(&self) -> String {
        if self.is_fatal() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }

    /// Whether this error is a backend fault rather than an expected outcome.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AuthError::Database(_)
                | AuthError::StorageTimeout
                | AuthError::HashingFailed
                | AuthError::CorruptSecret
        )
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_are_sanitized() {
        let err = AuthError::CorruptSecret;
        assert!(err.is_fatal());
        assert_eq!(err.client_message(), "Internal server error");

        let err = AuthError::StorageTimeout;
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn expected_outcomes_pass_through() {
        let err = AuthError::WrongPassword;
        assert!(!err.is_fatal());
        assert_eq!(err.client_message(), "Wrong password");

        let err = AuthError::WeakPassword("password must be at least 8 characters".to_string());
        assert!(err.client_message().contains("at least 8"));
    }
}
