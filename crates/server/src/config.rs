//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BOOKSTORE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `BOOKSTORE_AUTH_KEY` - Session signing seed, 64 hex characters (see [`EnvSecrets`])
//!
//! ## Optional
//! - `BOOKSTORE_HOST` - Bind address (default: 127.0.0.1)
//! - `BOOKSTORE_PORT` - Listen port (default: 8080)
//! - `BOOKSTORE_BASE_PATH` - Extra prefix after `/v1` (default: empty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::services::auth::{AuthKeySource, SEED_LEN};

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of placeholder runs a hex seed can contain (lowercase)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "0000000000",
    "ffffffffff",
    "0123456789abcdef",
    "deadbeef",
    "cafebabe",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Prefix appended after `/v1`, either empty or starting with `/`
    pub base_path: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
    /// Sentry error event sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry performance traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("BOOKSTORE_DATABASE_URL")?;
        let host = parse_env("BOOKSTORE_HOST", "127.0.0.1")?;
        let port = parse_env("BOOKSTORE_PORT", "8080")?;
        let base_path = normalize_base_path(&get_env_or_default("BOOKSTORE_BASE_PATH", ""))
            .map_err(|reason| {
                ConfigError::InvalidEnvVar("BOOKSTORE_BASE_PATH".to_string(), reason)
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            base_path,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the full route prefix, e.g. `/v1` or `/v1/store`.
    #[must_use]
    pub fn route_prefix(&self) -> String {
        format!("/v1{}", self.base_path)
    }
}

/// Secrets read from the environment.
///
/// Implements `Debug` manually to redact the signing seed.
#[derive(Clone)]
pub struct EnvSecrets {
    auth_key: SecretString,
}

impl EnvSecrets {
    /// Load `BOOKSTORE_AUTH_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if the key is not set,
    /// `ConfigError::InvalidEnvVar` if it is not 64 hex characters, and
    /// `ConfigError::InsecureSecret` if it looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let auth_key = get_validated_seed("BOOKSTORE_AUTH_KEY")?;
        Ok(Self { auth_key })
    }
}

impl AuthKeySource for EnvSecrets {
    fn auth_key(&self) -> &str {
        self.auth_key.expose_secret()
    }
}

impl std::fmt::Debug for EnvSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSecrets")
            .field("auth_key", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, using `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Normalize a base path to either `""` or `/segment[/segment...]`.
fn normalize_base_path(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') {
        return Err("must start with '/'".to_string());
    }
    if trimmed.contains("//") || trimmed.chars().any(char::is_whitespace) {
        return Err("must not contain empty segments or whitespace".to_string());
    }
    Ok(trimmed.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a signing seed is hex of the right length and not a placeholder.
fn validate_seed(seed: &str, var_name: &str) -> Result<(), ConfigError> {
    let expected = SEED_LEN * 2;
    if seed.len() != expected || !seed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be exactly {expected} hex characters"),
        ));
    }

    let lower = seed.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Hex tops out at 4 bits/char; random seeds land around 3.7-3.9.
    let entropy = shannon_entropy(&lower);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Generate one with `bookstore keygen`."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a signing seed from environment.
fn get_validated_seed(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    let value = value.trim();
    validate_seed(value, key)?;
    Ok(SecretString::from(value.to_owned()))
}
