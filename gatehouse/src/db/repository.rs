//! Store contracts and their implementations.
//!
//! The authentication engine talks to storage exclusively through the
//! [`AccountStore`] and [`SessionStore`] traits. Correct lockout counting
//! under concurrent handlers depends on the store providing atomic
//! read-modify-write semantics for the failure counter, which is why the
//! increment is part of the contract rather than something callers compose
//! out of a read and a write.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::timeouts::with_default_timeout;
use crate::auth::{Account, AuthError, AuthResult};

/// Per-login account storage.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch the stored secret and failure counter for a login.
    async fn get_account(&self, login: &str) -> AuthResult<Option<Account>>;

    /// Insert a new account with a zeroed failure counter.
    ///
    /// Fails with [`AuthError::AlreadyExists`] when the login is taken,
    /// mutating nothing.
    async fn insert_account(&self, login: &str, secret: &str) -> AuthResult<()>;

    /// Add one failed login. Must be a single atomic update.
    async fn increment_failed_logins(&self, login: &str) -> AuthResult<()>;

    /// Reset the failure counter to zero.
    async fn reset_failed_logins(&self, login: &str) -> AuthResult<()>;
}

/// Per-token session storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record an issued token with its creation time.
    async fn insert_session(&self, token: Uuid, created_at: DateTime<Utc>) -> AuthResult<()>;

    /// Creation time of a token, if it was ever issued.
    async fn get_session_created_at(&self, token: Uuid) -> AuthResult<Option<DateTime<Utc>>>;
}

/// PostgreSQL implementation of [`AccountStore`]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn get_account(&self, login: &str) -> AuthResult<Option<Account>> {
        let row = with_default_timeout(
            sqlx::query("SELECT login, password_hash, failed_logins FROM users WHERE login = $1")
                .bind(login)
                .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.map(|r| Account {
            login: r.get("login"),
            secret: r.get("password_hash"),
            failed_logins: r.get("failed_logins"),
        }))
    }

    async fn insert_account(&self, login: &str, secret: &str) -> AuthResult<()> {
        // Single statement: a conflicting login inserts nothing and is
        // reported through the affected-row count.
        let result = with_default_timeout(
            sqlx::query(
                "INSERT INTO users (login, password_hash, failed_logins) VALUES ($1, $2, 0)
                 ON CONFLICT (login) DO NOTHING",
            )
            .bind(login)
            .bind(secret)
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::AlreadyExists);
        }

        Ok(())
    }

    async fn increment_failed_logins(&self, login: &str) -> AuthResult<()> {
        with_default_timeout(
            sqlx::query("UPDATE users SET failed_logins = failed_logins + 1 WHERE login = $1")
                .bind(login)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn reset_failed_logins(&self, login: &str) -> AuthResult<()> {
        with_default_timeout(
            sqlx::query("UPDATE users SET failed_logins = 0 WHERE login = $1")
                .bind(login)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}

/// PostgreSQL implementation of [`SessionStore`]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert_session(&self, token: Uuid, created_at: DateTime<Utc>) -> AuthResult<()> {
        with_default_timeout(
            sqlx::query("INSERT INTO sessions (token, created_at) VALUES ($1, $2)")
                .bind(token)
                .bind(created_at)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn get_session_created_at(&self, token: Uuid) -> AuthResult<Option<DateTime<Utc>>> {
        let row = with_default_timeout(
            sqlx::query("SELECT created_at FROM sessions WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.map(|r| r.get("created_at")))
    }
}

/// In-memory [`AccountStore`].
///
/// The mutex makes every operation a serialized read-modify-write, which is
/// the same atomicity guarantee the contract asks of real stores. Backs the
/// engine unit tests, the server integration tests, and database-free runs.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn get_account(&self, login: &str) -> AuthResult<Option<Account>> {
        Ok(self.lock().get(login).cloned())
    }

    async fn insert_account(&self, login: &str, secret: &str) -> AuthResult<()> {
        let mut accounts = self.lock();

        if accounts.contains_key(login) {
            return Err(AuthError::AlreadyExists);
        }

        accounts.insert(
            login.to_string(),
            Account {
                login: login.to_string(),
                secret: secret.to_string(),
                failed_logins: 0,
            },
        );

        Ok(())
    }

    async fn increment_failed_logins(&self, login: &str) -> AuthResult<()> {
        if let Some(account) = self.lock().get_mut(login) {
            account.failed_logins += 1;
        }

        Ok(())
    }

    async fn reset_failed_logins(&self, login: &str) -> AuthResult<()> {
        if let Some(account) = self.lock().get_mut(login) {
            account.failed_logins = 0;
        }

        Ok(())
    }
}

/// In-memory [`SessionStore`], mutex-serialized like [`MemoryAccountStore`].
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<Uuid, DateTime<Utc>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, DateTime<Utc>>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert_session(&self, token: Uuid, created_at: DateTime<Utc>) -> AuthResult<()> {
        self.lock().insert(token, created_at);
        Ok(())
    }

    async fn get_session_created_at(&self, token: Uuid) -> AuthResult<Option<DateTime<Utc>>> {
        Ok(self.lock().get(&token).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_insert_account_rejects_duplicates() {
        let store = MemoryAccountStore::new();

        store.insert_account("alice", "secret-a").await.unwrap();

        let result = store.insert_account("alice", "secret-b").await;
        assert!(matches!(result, Err(AuthError::AlreadyExists)));

        // The original record is untouched.
        let account = store.get_account("alice").await.unwrap().unwrap();
        assert_eq!(account.secret, "secret-a");
        assert_eq!(account.failed_logins, 0);
    }

    #[tokio::test]
    async fn memory_counter_increments_and_resets() {
        let store = MemoryAccountStore::new();
        store.insert_account("alice", "secret").await.unwrap();

        for _ in 0..3 {
            store.increment_failed_logins("alice").await.unwrap();
        }
        let account = store.get_account("alice").await.unwrap().unwrap();
        assert_eq!(account.failed_logins, 3);

        store.reset_failed_logins("alice").await.unwrap();
        let account = store.get_account("alice").await.unwrap().unwrap();
        assert_eq!(account.failed_logins, 0);
    }

    #[tokio::test]
    async fn memory_counter_updates_ignore_unknown_logins() {
        let store = MemoryAccountStore::new();

        store.increment_failed_logins("nobody").await.unwrap();
        store.reset_failed_logins("nobody").await.unwrap();

        assert!(store.get_account("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn memory_sessions_round_trip() {
        let store = MemorySessionStore::new();
        let token = Uuid::new_v4();
        let created_at = Utc::now();

        store.insert_session(token, created_at).await.unwrap();

        let stored = store.get_session_created_at(token).await.unwrap().unwrap();
        assert_eq!(stored, created_at);

        let missing = store.get_session_created_at(Uuid::new_v4()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn memory_concurrent_increments_are_not_lost() {
        use std::sync::Arc;

        let store = Arc::new(MemoryAccountStore::new());
        store.insert_account("alice", "secret").await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.increment_failed_logins("alice").await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let account = store.get_account("alice").await.unwrap().unwrap();
        assert_eq!(account.failed_logins, 10);
    }
}
