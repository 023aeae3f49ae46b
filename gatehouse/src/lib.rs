//! # Gatehouse
//!
//! Credential authentication and session-lifecycle library.
//!
//! The [`auth::AuthManager`] orchestrates three operations against a pair of
//! stores:
//!
//! - **register**: validate the minimum-length policy, hash the password with
//!   Argon2id, insert the account with a zeroed failure counter.
//! - **login**: reject blocked accounts before any hashing work, verify the
//!   password, track the failure counter, and mint an opaque 128-bit session
//!   token on success.
//! - **check_token**: validate that a token exists and is still inside its
//!   fixed expiry window.
//!
//! All mutable state lives behind the [`db::AccountStore`] and
//! [`db::SessionStore`] contracts; the engine itself is stateless and safe
//! for concurrent use. PostgreSQL adapters and mutex-guarded in-memory
//! implementations are provided in [`db`].
//!
//! ## Core Modules
//!
//! - [`auth`]: credential hashing, lockout policy, and the engine
//! - [`db`]: store contracts, PostgreSQL pool plumbing, and adapters

/// Authentication engine, hashing, and lockout policy.
pub mod auth;
pub use auth::{
    AuthError, AuthManager, AuthPolicy, AuthResult, CredentialHasher, LoginRequest,
    RegisterRequest, Session,
};

/// Storage contracts and implementations.
pub mod db;
pub use db::{Database, DatabaseConfig};
