//! Admin credential verification
//!
//! A single admin account comes from the environment. The plaintext
//! password is hashed once at startup and dropped; only the Argon2
//! hash stays in memory.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, password_hash::rand_core::OsRng};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// The single admin account
pub struct AdminCredentials {
    username: String,
    password_hash: String,
}

impl AdminCredentials {
    /// Hash the configured password and keep only the hash.
    pub fn new(username: &str, password: &str) -> Result<Self, CredentialsError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialsError::Hash(e.to_string()))?
            .to_string();

        Ok(Self {
            username: username.to_string(),
            password_hash,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a login attempt. Wrong username and wrong password are
    /// indistinguishable to the caller.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if username != self.username {
            return false;
        }
        let Ok(parsed) = PasswordHash::new(&self.password_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
