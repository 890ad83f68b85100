//! Session token issuance and verification.
//!
//! Tokens are JWTs in compact serialization, signed with EdDSA (Ed25519).
//! They are stateless: nothing is stored server-side, and a token stays valid
//! until its `exp`.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use bookstore_core::Email;

use super::keys::SigningKeys;
use crate::services::ServiceError;

/// Value of the `iss` claim.
pub const ISSUER: &str = "gotu";

/// Lifetime of a session token.
pub const TOKEN_TTL: Duration = Duration::hours(24);

/// Claims carried by a session token.
///
/// Timestamps are serialized as seconds since the epoch under the registered
/// claim names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "iss")]
    pub issuer: String,
    /// The authenticated email.
    #[serde(rename = "sub")]
    pub subject: Email,
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "nbf", with = "chrono::serde::ts_seconds")]
    pub not_before: DateTime<Utc>,
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens with a fixed key pair.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: SigningKeys,
    validation: Validation,
}

impl TokenIssuer {
    /// Create an issuer from already-derived keys.
    #[must_use]
    pub fn new(keys: SigningKeys) -> Self {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self { keys, validation }
    }

    /// The key pair this issuer signs with.
    #[must_use]
    pub const fn keys(&self) -> &SigningKeys {
        &self.keys
    }

    /// Build claims for `subject`, valid from now for [`TOKEN_TTL`].
    #[must_use]
    pub fn issue_claims(&self, subject: &Email) -> SessionClaims {
        self.issue_claims_at(subject, Utc::now())
    }

    /// Build claims for `subject` as if issued at `now`.
    ///
    /// `now` is truncated to whole seconds, the resolution of the token.
    #[must_use]
    pub fn issue_claims_at(&self, subject: &Email, now: DateTime<Utc>) -> SessionClaims {
        let now = now.trunc_subsecs(0);
        SessionClaims {
            issuer: ISSUER.to_owned(),
            subject: subject.clone(),
            issued_at: now,
            not_before: now,
            expires_at: now + TOKEN_TTL,
        }
    }

    /// Sign claims into a compact token.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Internal` if signing fails.
    pub fn sign(&self, claims: &SessionClaims) -> Result<String, ServiceError> {
        encode(&Header::new(Algorithm::EdDSA), claims, self.keys.encoding())
            .map_err(ServiceError::internal)
    }

    /// Verify a token and return its claims.
    ///
    /// Checks the signature, algorithm, issuer, `nbf` and `exp` against the
    /// current time.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Unauthorized` for every kind of rejection. The
    /// cause is logged at debug level only.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, ServiceError> {
        decode::<SessionClaims>(token, self.keys.decoding(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = %e, "Rejected session token");
                ServiceError::Unauthorized
            })
    }
}
