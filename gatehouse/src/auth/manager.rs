//! Authentication manager implementation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{
    errors::{AuthError, AuthResult},
    hasher::CredentialHasher,
    lockout::{DEFAULT_MAX_FAILED_LOGINS, LockoutPolicy},
    models::{LoginRequest, RegisterRequest, Session},
};
use crate::db::{AccountStore, SessionStore};

/// Engine policy knobs.
///
/// These are configuration, not constants of the flow: the server loads them
/// from the environment and hands them over at construction.
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    /// Minimum accepted login length
    pub min_login_len: usize,
    /// Minimum accepted password length
    pub min_password_len: usize,
    /// Failed logins at which an account is blocked
    pub max_failed_logins: i32,
    /// Fixed lifetime of an issued session token
    pub session_ttl: Duration,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            min_login_len: 4,
            min_password_len: 8,
            max_failed_logins: DEFAULT_MAX_FAILED_LOGINS,
            session_ttl: Duration::hours(1),
        }
    }
}

/// Authentication manager
///
/// Stateless orchestrator over the account and session stores: every login
/// attempt is purely a sequence of store reads and writes, so the manager is
/// safe to share across request handlers. Counter updates rely on the store's
/// atomic increment, never on a read-then-write here.
#[derive(Clone)]
pub struct AuthManager {
    accounts: Arc<dyn AccountStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: CredentialHasher,
    lockout: LockoutPolicy,
    policy: AuthPolicy,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `accounts` - Account store backing registration and login
    /// * `sessions` - Session store backing token issuance and checks
    /// * `policy` - Validation, lockout, and expiry policy
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        sessions: Arc<dyn SessionStore>,
        policy: AuthPolicy,
    ) -> Self {
        Self::with_hasher(accounts, sessions, policy, CredentialHasher::new())
    }

    /// Create a manager with a custom credential hasher, e.g. one with cheap
    /// cost parameters for tests.
    pub fn with_hasher(
        accounts: Arc<dyn AccountStore>,
        sessions: Arc<dyn SessionStore>,
        policy: AuthPolicy,
        hasher: CredentialHasher,
    ) -> Self {
        let lockout = LockoutPolicy::new(policy.max_failed_logins);
        Self {
            accounts,
            sessions,
            hasher,
            lockout,
            policy,
        }
    }

    /// Register a new account
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidLogin` - Login below the minimum length
    /// * `AuthError::WeakPassword` - Password below the minimum length
    /// * `AuthError::AlreadyExists` - Login is taken; nothing is mutated
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<()> {
        self.validate_login(&request.login)?;
        self.validate_password(&request.password)?;

        let secret = self.hasher.hash(&request.password)?;

        self.accounts
            .insert_account(&request.login, &secret)
            .await
    }

    /// Log an account in, minting a fresh session token on success.
    ///
    /// The lockout check runs before any verification so that a blocked
    /// account costs no hashing work and its counter stops growing. A wrong
    /// password increments the counter through the store's atomic update;
    /// a match resets it to zero before the session is created.
    ///
    /// # Errors
    ///
    /// * `AuthError::AccountNotFound` - No account for the login
    /// * `AuthError::Blocked` - Failure counter reached the threshold
    /// * `AuthError::WrongPassword` - Password mismatch; counter incremented
    pub async fn login(&self, request: LoginRequest) -> AuthResult<Session> {
        let account = self
            .accounts
            .get_account(&request.login)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if self.lockout.is_blocked(account.failed_logins) {
            return Err(AuthError::Blocked);
        }

        if !self.hasher.verify(&request.password, &account.secret)? {
            self.accounts
                .increment_failed_logins(&request.login)
                .await?;
            return Err(AuthError::WrongPassword);
        }

        self.accounts.reset_failed_logins(&request.login).await?;

        let session = Session {
            token: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        self.sessions
            .insert_session(session.token, session.created_at)
            .await?;

        Ok(session)
    }

    /// Check that a session token exists and is still fresh.
    ///
    /// Expiry is computed from the stored creation time; a token is valid
    /// strictly inside its window and expired from the window boundary on.
    /// There is no sliding renewal.
    ///
    /// # Errors
    ///
    /// * `AuthError::SessionNotFound` - Token was never issued
    /// * `AuthError::SessionExpired` - Token outlived the expiry window
    pub async fn check_token(&self, token: Uuid) -> AuthResult<()> {
        let created_at = self
            .sessions
            .get_session_created_at(token)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if Utc::now().signed_duration_since(created_at) >= self.policy.session_ttl {
            return Err(AuthError::SessionExpired);
        }

        Ok(())
    }

    fn validate_login(&self, login: &str) -> AuthResult<()> {
        if login.len() < self.policy.min_login_len {
            return Err(AuthError::InvalidLogin(format!(
                "login must be at least {} characters",
                self.policy.min_login_len
            )));
        }

        Ok(())
    }

    fn validate_password(&self, password: &str) -> AuthResult<()> {
        if password.len() < self.policy.min_password_len {
            return Err(AuthError::WeakPassword(format!(
                "password must be at least {} characters",
                self.policy.min_password_len
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryAccountStore, MemorySessionStore};
    use argon2::{Algorithm, Argon2, Params, Version};

    fn cheap_hasher() -> CredentialHasher {
        let params = Params::new(8, 1, 1, None).expect("valid test params");
        CredentialHasher::with_argon2(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn manager() -> (AuthManager, Arc<MemoryAccountStore>, Arc<MemorySessionStore>) {
        let accounts = Arc::new(MemoryAccountStore::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let manager = AuthManager::with_hasher(
            accounts.clone(),
            sessions.clone(),
            AuthPolicy::default(),
            cheap_hasher(),
        );
        (manager, accounts, sessions)
    }

    fn register_request(login: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            login: login.to_string(),
            password: password.to_string(),
        }
    }

    fn login_request(login: &str, password: &str) -> LoginRequest {
        LoginRequest {
            login: login.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login_succeeds() {
        let (auth, _, _) = manager();

        auth.register(register_request("alice", "correcthorse"))
            .await
            .unwrap();

        let session = auth
            .login(login_request("alice", "correcthorse"))
            .await
            .unwrap();

        auth.check_token(session.token).await.unwrap();
    }

    #[tokio::test]
    async fn each_login_mints_a_fresh_token() {
        let (auth, _, _) = manager();

        auth.register(register_request("alice", "correcthorse"))
            .await
            .unwrap();

        let first = auth
            .login(login_request("alice", "correcthorse"))
            .await
            .unwrap();
        let second = auth
            .login(login_request("alice", "correcthorse"))
            .await
            .unwrap();

        assert_ne!(first.token, second.token);
    }

    #[tokio::test]
    async fn duplicate_register_mutates_nothing() {
        let (auth, accounts, _) = manager();

        auth.register(register_request("alice", "correcthorse"))
            .await
            .unwrap();
        let original = accounts.get_account("alice").await.unwrap().unwrap();

        let result = auth.register(register_request("alice", "otherpassword")).await;
        assert!(matches!(result, Err(AuthError::AlreadyExists)));

        let after = accounts.get_account("alice").await.unwrap().unwrap();
        assert_eq!(after.secret, original.secret);
        assert_eq!(after.failed_logins, 0);

        // The original credentials still work.
        auth.login(login_request("alice", "correcthorse"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn register_enforces_minimum_lengths() {
        let (auth, accounts, _) = manager();

        let result = auth.register(register_request("al", "correcthorse")).await;
        assert!(matches!(result, Err(AuthError::InvalidLogin(_))));

        let result = auth.register(register_request("alice", "short")).await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));

        assert!(accounts.get_account("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn login_unknown_account() {
        let (auth, _, _) = manager();

        let result = auth.login(login_request("nobody", "correcthorse")).await;
        assert!(matches!(result, Err(AuthError::AccountNotFound)));
    }

    #[tokio::test]
    async fn five_wrong_passwords_block_the_account() {
        let (auth, accounts, _) = manager();

        auth.register(register_request("alice", "correcthorse"))
            .await
            .unwrap();

        for attempt in 1..=5 {
            let result = auth.login(login_request("alice", "wrongwrong")).await;
            assert!(
                matches!(result, Err(AuthError::WrongPassword)),
                "attempt {attempt} should be a plain mismatch"
            );
        }

        let account = accounts.get_account("alice").await.unwrap().unwrap();
        assert_eq!(account.failed_logins, 5);

        // Even the correct password is rejected once the threshold is hit,
        // and the counter does not grow further.
        let result = auth.login(login_request("alice", "correcthorse")).await;
        assert!(matches!(result, Err(AuthError::Blocked)));

        let account = accounts.get_account("alice").await.unwrap().unwrap();
        assert_eq!(account.failed_logins, 5);
    }

    #[tokio::test]
    async fn successful_login_resets_the_counter() {
        let (auth, accounts, _) = manager();

        auth.register(register_request("alice", "correcthorse"))
            .await
            .unwrap();

        for _ in 0..4 {
            let _ = auth.login(login_request("alice", "wrongwrong")).await;
        }
        let account = accounts.get_account("alice").await.unwrap().unwrap();
        assert_eq!(account.failed_logins, 4);

        auth.login(login_request("alice", "correcthorse"))
            .await
            .unwrap();
        let account = accounts.get_account("alice").await.unwrap().unwrap();
        assert_eq!(account.failed_logins, 0);

        // One more mismatch is a plain wrong password again, not a block.
        let result = auth.login(login_request("alice", "wrongwrong")).await;
        assert!(matches!(result, Err(AuthError::WrongPassword)));
        auth.login(login_request("alice", "correcthorse"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn check_token_unknown() {
        let (auth, _, _) = manager();

        let result = auth.check_token(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[tokio::test]
    async fn check_token_expiry_window() {
        let (auth, _, sessions) = manager();

        let fresh = Uuid::new_v4();
        sessions
            .insert_session(fresh, Utc::now() - Duration::minutes(59))
            .await
            .unwrap();
        auth.check_token(fresh).await.unwrap();

        let boundary = Uuid::new_v4();
        sessions
            .insert_session(boundary, Utc::now() - Duration::hours(1))
            .await
            .unwrap();
        let result = auth.check_token(boundary).await;
        assert!(matches!(result, Err(AuthError::SessionExpired)));

        let stale = Uuid::new_v4();
        sessions
            .insert_session(stale, Utc::now() - Duration::minutes(61))
            .await
            .unwrap();
        let result = auth.check_token(stale).await;
        assert!(matches!(result, Err(AuthError::SessionExpired)));
    }
}
