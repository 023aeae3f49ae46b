//! Authentication module providing account registration, login, lockout, and
//! session-token validation.
//!
//! This module implements the credential side of the service:
//! - Argon2id password hashing with a fresh salt per secret
//! - Opaque 128-bit session tokens with a fixed 1-hour expiry window
//! - Counter-based account lockout after repeated failed logins
//!
//! ## Example
//!
//! ```no_run
//! use gatehouse::auth::{AuthManager, AuthPolicy, RegisterRequest};
//! use gatehouse::db::{MemoryAccountStore, MemorySessionStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = AuthManager::new(
//!         Arc::new(MemoryAccountStore::new()),
//!         Arc::new(MemorySessionStore::new()),
//!         AuthPolicy::default(),
//!     );
//!
//!     auth.register(RegisterRequest {
//!         login: "alice".to_string(),
//!         password: "correcthorse".to_string(),
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod hasher;
pub mod lockout;
pub mod manager;
pub mod models;

pub use errors::{AuthError, AuthResult};
pub use hasher::CredentialHasher;
pub use lockout::{DEFAULT_MAX_FAILED_LOGINS, LockoutPolicy, LockoutState};
pub use manager::{AuthManager, AuthPolicy};
pub use models::{Account, LoginRequest, RegisterRequest, Session};
