//! Session signing keys.
//!
//! An Ed25519 key pair is derived deterministically from a 32-byte seed that
//! is supplied at startup through an [`AuthKeySource`]. The resulting
//! [`SigningKeys`] value is built once and handed to the token issuer; nothing
//! here is global.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ed25519_dalek::SigningKey;
use jsonwebtoken::{DecodingKey, EncodingKey};
use thiserror::Error;

/// Seed length in bytes.
pub const SEED_LEN: usize = 32;

/// DER header of an RFC 8410 `OneAsymmetricKey` (v1) holding an Ed25519
/// private key. The 32 seed bytes follow it directly.
const PKCS8_ED25519_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04, 0x20,
];

/// Provider of the hex-encoded signing seed.
///
/// Production reads it from the environment (`config::EnvSecrets`); tests
/// supply a fixed key.
pub trait AuthKeySource {
    /// The signing seed as 64 hex characters.
    fn auth_key(&self) -> &str;
}

/// Errors building [`SigningKeys`].
#[derive(Debug, Error)]
pub enum KeyError {
    /// The seed is not valid hex.
    #[error("auth key is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The decoded seed has the wrong length.
    #[error("auth key must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Decoded length.
        actual: usize,
    },

    /// The key could not be loaded by the JWT backend.
    #[error("failed to load signing key: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Ed25519 key pair used to sign and verify session tokens.
#[derive(Clone)]
pub struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    public_key: [u8; 32],
}

impl SigningKeys {
    /// Derive the key pair from a raw seed.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::Jwt` if the JWT backend rejects the public key.
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Result<Self, KeyError> {
        let public_key = SigningKey::from_bytes(seed).verifying_key().to_bytes();

        let mut der = Vec::with_capacity(PKCS8_ED25519_PREFIX.len() + SEED_LEN);
        der.extend_from_slice(&PKCS8_ED25519_PREFIX);
        der.extend_from_slice(seed);

        let encoding = EncodingKey::from_ed_der(&der);
        let decoding = DecodingKey::from_ed_components(&URL_SAFE_NO_PAD.encode(public_key))?;

        Ok(Self {
            encoding,
            decoding,
            public_key,
        })
    }

    /// Derive the key pair from a hex-encoded seed.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidHex` or `KeyError::InvalidLength` if the seed
    /// is not exactly 64 hex characters.
    pub fn from_hex_seed(seed_hex: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(seed_hex.trim())?;
        let actual = bytes.len();
        let seed: [u8; SEED_LEN] = bytes.try_into().map_err(|_| KeyError::InvalidLength {
            expected: SEED_LEN,
            actual,
        })?;
        Self::from_seed(&seed)
    }

    /// Derive the key pair from the seed held by `source`.
    ///
    /// # Errors
    ///
    /// See [`SigningKeys::from_hex_seed`].
    pub fn from_source(source: &(impl AuthKeySource + ?Sized)) -> Result<Self, KeyError> {
        Self::from_hex_seed(source.auth_key())
    }

    /// The raw 32-byte Ed25519 public key.
    #[must_use]
    pub const fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    pub(super) const fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(super) const fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys")
            .field("public_key", &hex::encode(self.public_key))
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
