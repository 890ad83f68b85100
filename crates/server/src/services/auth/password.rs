//! Password hashing with Argon2id.
//!
//! Records are `base64(digest) "." base64(salt)` using the standard base64
//! alphabet, which has no `.`. The format is private to [`hash_password`] and
//! [`verify_password`].

use argon2::{Algorithm, Argon2, Params, Version};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::RngCore;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Salt length in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Digest length in bytes (256 bits).
pub const DIGEST_LEN: usize = 32;

/// Argon2 memory cost in KiB (64 MiB).
const MEMORY_COST_KIB: u32 = 64 * 1024;

/// Argon2 time cost (iterations).
const TIME_COST: u32 = 1;

/// Argon2 lanes.
const PARALLELISM: u32 = 1;

const SEPARATOR: char = '.';

/// Well-formed record that no password matches.
///
/// Verifying against it costs one full Argon2 derivation, the same as a real
/// mismatch.
pub const DUMMY_RECORD: &str =
    "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=.Ym9va3N0b3JlLWR1bW15IQ==";

/// Errors from password hashing.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The key derivation function rejected its parameters or inputs.
    #[error("password hashing failed: {0}")]
    Kdf(argon2::Error),
}

fn argon2() -> Result<Argon2<'static>, argon2::Error> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(DIGEST_LEN))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn derive(password: &str, salt: &[u8]) -> Result<[u8; DIGEST_LEN], argon2::Error> {
    let mut digest = [0u8; DIGEST_LEN];
    argon2()?.hash_password_into(password.as_bytes(), salt, &mut digest)?;
    Ok(digest)
}

/// Hash a password with a fresh random salt.
///
/// Two calls with the same password produce different records.
///
/// # Panics
///
/// Panics if the operating system's entropy source is unavailable.
///
/// # Errors
///
/// Returns `PasswordError::Kdf` if Argon2 rejects the input.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    let digest = derive(password, &salt).map_err(PasswordError::Kdf)?;

    Ok(format!(
        "{}{SEPARATOR}{}",
        STANDARD.encode(digest),
        STANDARD.encode(salt)
    ))
}

/// Verify a password against a stored record.
///
/// The digest comparison runs in constant time. Malformed records verify as
/// `false`.
#[must_use]
pub fn verify_password(password: &str, record: &str) -> bool {
    let mut parts = record.split(SEPARATOR);
    let (Some(digest), Some(salt), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    let (Ok(stored), Ok(salt)) = (STANDARD.decode(digest), STANDARD.decode(salt)) else {
        return false;
    };

    if salt.len() != SALT_LEN {
        return false;
    }

    let Ok(candidate) = derive(password, &salt) else {
        return false;
    };

    candidate.as_slice().ct_eq(stored.as_slice()).into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let record = hash_password("password1").unwrap();
        assert!(verify_password("password1", &record));
    }

    #[test]
    fn test_wrong_password_fails() {
        let record = hash_password("password1").unwrap();
        assert!(!verify_password("password2", &record));
        assert!(!verify_password("", &record));
    }

    #[test]
    fn test_salt_is_fresh_per_call() {
        let first = hash_password("password").unwrap();
        let second = hash_password("password").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("password", &first));
        assert!(verify_password("password", &second));
    }

    #[test]
    fn test_record_format() {
        let record = hash_password("password").unwrap();
        let (digest, salt) = record.split_once(SEPARATOR).unwrap();

        assert_eq!(STANDARD.decode(digest).unwrap().len(), DIGEST_LEN);
        assert_eq!(STANDARD.decode(salt).unwrap().len(), SALT_LEN);
    }

    #[test]
    fn test_malformed_records_fail() {
        let record = hash_password("password").unwrap();
        let (digest, salt) = record.split_once(SEPARATOR).unwrap();

        assert!(!verify_password("password", ""));
        assert!(!verify_password("password", digest));
        assert!(!verify_password("password", &format!("{record}.extra")));
        assert!(!verify_password("password", &format!("!!!{SEPARATOR}{salt}")));
        assert!(!verify_password("password", &format!("{digest}{SEPARATOR}***")));
        assert!(!verify_password("password", &format!("{digest}{SEPARATOR}")));
        assert!(!verify_password(
            "password",
            "$argon2id$v=19$m=65536,t=1,p=1$c2FsdA$ZGlnZXN0"
        ));
    }

    #[test]
    fn test_truncated_digest_fails() {
        let record = hash_password("password").unwrap();
        let (digest, salt) = record.split_once(SEPARATOR).unwrap();
        let mut short = STANDARD.decode(digest).unwrap();
        short.truncate(16);

        let tampered = format!("{}{SEPARATOR}{salt}", STANDARD.encode(short));
        assert!(!verify_password("password", &tampered));
    }

    #[test]
    fn test_dummy_record_is_well_formed() {
        let (digest, salt) = DUMMY_RECORD.split_once(SEPARATOR).unwrap();
        assert_eq!(STANDARD.decode(digest).unwrap().len(), DIGEST_LEN);
        assert_eq!(STANDARD.decode(salt).unwrap().len(), SALT_LEN);

        assert!(!verify_password("password1", DUMMY_RECORD));
        assert!(!verify_password("", DUMMY_RECORD));
    }
}
