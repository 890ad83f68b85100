//! Authentication service.
//!
//! Password registration and login. A successful login yields a signed
//! session token; see [`TokenIssuer`].

mod keys;
mod password;
mod token;

pub use keys::{AuthKeySource, KeyError, SEED_LEN, SigningKeys};
pub use password::{DUMMY_RECORD, PasswordError, hash_password, verify_password};
pub use token::{ISSUER, SessionClaims, TOKEN_TTL, TokenIssuer};

use sqlx::PgPool;
use tracing::{instrument, warn};

use bookstore_core::Email;

use super::ServiceError;
use crate::db::logins::LoginRepository;
use crate::models::Login;

/// Authentication service.
///
/// Handles credential registration and password login.
pub struct AuthService<'a> {
    logins: LoginRepository<'a>,
    tokens: &'a TokenIssuer,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenIssuer) -> Self {
        Self {
            logins: LoginRepository::new(pool),
            tokens,
        }
    }

    /// Register a credential for `email`.
    ///
    /// Input is validated before storage is touched, so a malformed email is
    /// always `Invalid` and never `Conflict`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Invalid` if the email is malformed or the
    /// password is empty.
    /// Returns `ServiceError::Conflict` if the email is already registered.
    /// Returns `ServiceError::Internal` if hashing or storage fails.
    #[instrument(skip(self, email, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<(), ServiceError> {
        let email = Email::parse(email)?;

        if password.is_empty() {
            return Err(ServiceError::invalid("password cannot be empty"));
        }

        let hash = hash_password(password).map_err(ServiceError::internal)?;

        self.logins.insert(&Login { email, hash }).await?;

        Ok(())
    }

    /// Check a password and return a signed session token for `email`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Unauthorized` if the email is malformed or
    /// unknown, or the password does not match. The three cases are
    /// indistinguishable to the caller.
    /// Returns `ServiceError::Internal` if storage or signing fails.
    #[instrument(skip(self, email, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ServiceError> {
        let Ok(email) = Email::parse(email) else {
            warn!("Login rejected: malformed email");
            return Err(ServiceError::Unauthorized);
        };

        let Some(login) = self.logins.get_by_email(&email).await? else {
            // Pay the same Argon2 cost as a password mismatch.
            let _ = verify_password(password, DUMMY_RECORD);
            warn!(email = %email, "Login rejected: unknown email");
            return Err(ServiceError::Unauthorized);
        };

        if !verify_password(password, &login.hash) {
            warn!(email = %email, "Login rejected: password mismatch");
            return Err(ServiceError::Unauthorized);
        }

        let claims = self.tokens.issue_claims(&login.email);
        self.tokens.sign(&claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    // Never connects; any query against it fails, so these tests prove the
    // rejected paths return before storage is reached.
    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap()
    }

    fn tokens() -> TokenIssuer {
        TokenIssuer::new(SigningKeys::from_seed(&[9; SEED_LEN]).unwrap())
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let pool = lazy_pool();
        let tokens = tokens();
        let auth = AuthService::new(&pool, &tokens);

        for email in ["", "no-at-sign", "@domain.example", "user@"] {
            let err = auth.register(email, "password1").await.unwrap_err();
            assert!(matches!(err, ServiceError::Invalid(_)), "{email}: {err:?}");
        }
    }

    #[tokio::test]
    async fn test_register_rejects_empty_password() {
        let pool = lazy_pool();
        let tokens = tokens();
        let auth = AuthService::new(&pool, &tokens);

        let err = auth
            .register("cahyo@domain.example", "")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_register_checks_email_before_password() {
        let pool = lazy_pool();
        let tokens = tokens();
        let auth = AuthService::new(&pool, &tokens);

        let err = auth.register("invalid", "").await.unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(ref m) if m.contains("email")));
    }

    #[tokio::test]
    async fn test_login_malformed_email_is_unauthorized() {
        let pool = lazy_pool();
        let tokens = tokens();
        let auth = AuthService::new(&pool, &tokens);

        let err = auth.login("invalid", "password1").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));
    }
}
