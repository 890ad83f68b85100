//! Stored credential.

use bookstore_core::Email;

/// A persisted (email, password-hash) pair.
///
/// The hash is opaque outside `services::auth::password`, and is never
/// serialized or logged.
#[derive(Clone)]
pub struct Login {
    /// Account email, the unique key.
    pub email: Email,
    /// Encoded password hash record.
    pub hash: String,
}

impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login")
            .field("email", &self.email)
            .field("hash", &"[REDACTED]")
            .finish()
    }
}
