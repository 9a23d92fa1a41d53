//! Password hashing
//!
//! Stored credentials are Argon2id PHC strings with a per-user random salt.
//! Verification goes through `argon2`'s verifier, which compares digests in
//! constant time.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

/// Hash used to burn the same amount of work when the user name is unknown
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("blogful-dummy-password").ok());

/// Hash a plaintext password into a PHC string (`$argon2id$...`).
///
/// ```ignore
/// use blogful::services::password::hash_password;
///
/// let hash = hash_password("password")?;
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to hash password")?;

    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC string.
///
/// A mismatch is `Ok(false)`. A stored value that is not a valid PHC
/// string is an error, since it means the users table is corrupt.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Stored password hash is malformed")?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("{}", e)).context("Password verification failed"),
    }
}

/// Run a verification whose result is discarded.
///
/// Called when no user matches the supplied name so that the response time
/// does not reveal which user names exist.
pub fn verify_against_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}
