//! Password hashing.
//!
//! Credentials are hashed with scrypt and stored as `salt:key` where both
//! halves are lowercase hex. Verification recomputes the key with the stored
//! salt and compares in constant time.

use rand::RngCore;
use scrypt::Params;
use thiserror::Error;

use super::user::{Password, PasswordVerifier};

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 64;

/// Failures while hashing or verifying a password.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    /// The stored verifier is not valid `salt:key` hex.
    #[error("stored password verifier is malformed")]
    MalformedVerifier,
    /// The key-derivation function rejected its inputs.
    #[error("password key derivation failed")]
    Derivation,
}

fn scrypt_params() -> Result<Params, PasswordHashError> {
    // log2(16384) = 14, r = 16, p = 1.
    Params::new(14, 16, 1, KEY_LEN).map_err(|_| PasswordHashError::Derivation)
}

fn derive_key(password: &Password, salt: &[u8]) -> Result<[u8; KEY_LEN], PasswordHashError> {
    let params = scrypt_params()?;
    let mut key = [0u8; KEY_LEN];
    scrypt::scrypt(password.expose().as_bytes(), salt, &params, &mut key)
        .map_err(|_| PasswordHashError::Derivation)?;
    Ok(key)
}

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &Password) -> Result<PasswordVerifier, PasswordHashError> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let key = derive_key(password, &salt)?;
    Ok(PasswordVerifier::new(format!(
        "{}:{}",
        hex::encode(salt),
        hex::encode(key)
    )))
}

/// Check `password` against a stored verifier.
///
/// Returns `Ok(false)` on mismatch; errors only when the stored value is
/// unreadable or derivation itself fails.
pub fn verify_password(
    password: &Password,
    verifier: &PasswordVerifier,
) -> Result<bool, PasswordHashError> {
    let stored = verifier.as_str();
    let (salt_hex, key_hex) = stored
        .split_once(':')
        .ok_or(PasswordHashError::MalformedVerifier)?;
    let salt = hex::decode(salt_hex).map_err(|_| PasswordHashError::MalformedVerifier)?;
    let expected = hex::decode(key_hex).map_err(|_| PasswordHashError::MalformedVerifier)?;
    if expected.len() != KEY_LEN {
        return Err(PasswordHashError::MalformedVerifier);
    }
    let derived = derive_key(password, &salt)?;
    Ok(constant_time_eq(&derived, &expected))
}

/// Compare two byte slices without short-circuiting on the first mismatch.
fn constant_time_eq(lhs: &[u8], rhs: &[u8]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }
    let mut diff = 0u8;
    for (a, b) in lhs.iter().zip(rhs.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}
