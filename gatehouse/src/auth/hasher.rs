//! Credential hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use super::errors::{AuthError, AuthResult};

/// Argon2id credential hasher.
///
/// Secrets are PHC strings embedding the algorithm parameters and a per-call
/// random salt, so verification needs nothing beyond the stored secret
/// itself. Hashing the same password twice yields different secrets.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialHasher {
    /// Hasher with the default Argon2id cost parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher over a custom `Argon2` instance, e.g. with cheap cost
    /// parameters for tests.
    pub fn with_argon2(argon2: Argon2<'static>) -> Self {
        Self { argon2 }
    }

    /// Hash a password under a fresh random salt.
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        Ok(self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify a password against a stored secret.
    ///
    /// Recomputes the hash under the secret's embedded parameters and
    /// compares in constant time. A wrong password is the `Ok(false)`
    /// outcome; only a malformed secret is an error.
    pub fn verify(&self, password: &str, secret: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(secret).map_err(|_| AuthError::CorruptSecret)?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(_) => Err(AuthError::CorruptSecret),
        }
    }
}
