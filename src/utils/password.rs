use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use sha2::{Digest, Sha256};

/// Outcome of checking a password against a stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Password matches. `needs_rehash` is set when the stored hash uses
    /// the legacy unsalted SHA-256 format and should be replaced.
    Valid { needs_rehash: bool },
    Invalid,
}

/// Hashes a password with Argon2id, producing a PHC-format string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {}", e))?;

    Ok(hash.to_string())
}

/// Unsalted SHA-256 hex digest, the format the first deployment stored.
pub fn legacy_sha256_hex(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    format!("{:x}", digest)
}

fn is_legacy_hash(stored: &str) -> bool {
    stored.len() == 64 && stored.chars().all(|c| c.is_ascii_hexdigit())
}

/// Verifies a password against a stored hash, accepting both the current
/// Argon2id PHC format and legacy SHA-256 hex digests.
pub fn verify_password(password: &str, stored: &str) -> Verification {
    if is_legacy_hash(stored) {
        if legacy_sha256_hex(password) == stored.to_lowercase() {
            return Verification::Valid { needs_rehash: true };
        }
        return Verification::Invalid;
    }

    match PasswordHash::new(stored) {
        Ok(parsed) => {
            if Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
            {
                Verification::Valid { needs_rehash: false }
            } else {
                Verification::Invalid
            }
        }
        Err(_) => Verification::Invalid,
    }
}
