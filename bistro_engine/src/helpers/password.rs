//! Password hashing for user accounts.
//!
//! Passwords and security answers are stored as argon2id PHC strings. The salt is random per hash,
//! so the same password hashes to a different string every time.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2,
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Password hashing error: {0}")]
pub struct PasswordError(String);

/// Hash a password (or security answer) into a PHC string suitable for storage.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password attempt against a stored PHC string. A malformed stored hash counts as a
/// failed verification rather than an error; the caller cannot do anything useful with the
/// distinction.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}
