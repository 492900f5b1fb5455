//! One-way salted password hashing.
//!
//! The engine only ever stores the PHC string produced here; the plaintext
//! lives no longer than the call that hashes or verifies it.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::{WorkflowError, WorkflowResult};

/// Hashes and verifies passwords.
pub trait CredentialHasher: Send + Sync {
    /// Produces a salted hash of `password`.
    fn hash(&self, password: &str) -> WorkflowResult<String>;

    /// Returns true if `password` matches `hash`.
    fn verify(&self, password: &str, hash: &str) -> WorkflowResult<bool>;
}

/// Argon2id with a random per-password salt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> WorkflowResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| WorkflowError::Credential {
                message: e.to_string(),
            })
    }

    fn verify(&self, password: &str, hash: &str) -> WorkflowResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| WorkflowError::Credential {
            message: e.to_string(),
        })?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
