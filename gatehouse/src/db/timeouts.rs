//! Database query timeout helpers
//!
//! Store calls must never block indefinitely; the PostgreSQL adapters wrap
//! every query in one of these helpers so a hung connection surfaces as a
//! fatal storage error instead of a stuck request.

use std::time::Duration;
use tokio::time::timeout;

use crate::auth::AuthError;

/// Default timeout for store queries (5 seconds)
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Error type for timeout operations
#[derive(Debug, thiserror::Error)]
pub enum TimeoutError {
    /// Operation timed out
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<TimeoutError> for AuthError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Timeout(_) => AuthError::StorageTimeout,
            TimeoutError::Database(e) => AuthError::Database(e),
        }
    }
}

/// Result type for timeout operations
pub type TimeoutResult<T> = Result<T, TimeoutError>;

/// Execute a query with the given timeout
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> TimeoutResult<T>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    match timeout(duration, future).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(TimeoutError::Database(e)),
        Err(_) => Err(TimeoutError::Timeout(duration)),
    }
}

/// Execute a query with the default timeout (5 seconds)
pub async fn with_default_timeout<F, T>(future: F) -> TimeoutResult<T>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    with_timeout(DEFAULT_QUERY_TIMEOUT, future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn timeout_error_maps_to_fatal_auth_error() {
        let err: AuthError = TimeoutError::Timeout(DEFAULT_QUERY_TIMEOUT).into();
        assert!(matches!(err, AuthError::StorageTimeout));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn slow_operations_time_out() {
        let result = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, sqlx::Error>(())
        })
        .await;

        assert!(matches!(result, Err(TimeoutError::Timeout(_))));
    }

    #[tokio::test]
    async fn fast_operations_pass_through() {
        let result = with_default_timeout(async { Ok::<_, sqlx::Error>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
