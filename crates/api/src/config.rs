//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TUSPORT_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   the generic `DATABASE_URL`)
//! - `TUSPORT_USER_TOKEN_SECRET` - Signing secret for storefront user tokens
//!   (min 32 chars, high entropy)
//! - `TUSPORT_ADMIN_TOKEN_SECRET` - Signing secret for admin tokens; must
//!   differ from the user secret so the two signing domains never
//!   cross-validate
//!
//! ## Optional
//! - `TUSPORT_HOST` - Bind address (default: 127.0.0.1)
//! - `TUSPORT_PORT` - Listen port (default: 8000)
//! - `TUSPORT_PATH_PREFIX` - Mount point for all API routes (default: /tu-sport)
//! - `TUSPORT_MEDIA_DIR` - Directory served under /media (default: media)
//! - `TUSPORT_USER_TOKEN_TTL_SECS` - User token lifetime (default: 86400)
//! - `TUSPORT_ADMIN_TOKEN_TTL_SECS` - Admin token lifetime (default: 3600)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
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

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Mount point for all application routes (e.g. `/tu-sport`)
    pub path_prefix: String,
    /// Directory where uploaded product media lives, served under `/media`
    pub media_dir: PathBuf,
    /// Signing secret for the user token domain
    pub user_token_secret: SecretString,
    /// User token lifetime
    pub user_token_ttl: Duration,
    /// Signing secret for the admin token domain
    pub admin_token_secret: SecretString,
    /// Admin token lifetime
    pub admin_token_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check,
    /// user/admin secrets identical).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("TUSPORT_DATABASE_URL")?;
        let host = get_env_or_default("TUSPORT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TUSPORT_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("TUSPORT_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TUSPORT_PORT".to_string(), e.to_string()))?;

        let path_prefix = get_env_or_default("TUSPORT_PATH_PREFIX", "/tu-sport");
        if !path_prefix.starts_with('/') || path_prefix.len() < 2 {
            return Err(ConfigError::InvalidEnvVar(
                "TUSPORT_PATH_PREFIX".to_string(),
                "must start with '/' and not be the root".to_string(),
            ));
        }

        let media_dir = PathBuf::from(get_env_or_default("TUSPORT_MEDIA_DIR", "media"));

        let user_token_secret = get_validated_secret("TUSPORT_USER_TOKEN_SECRET")?;
        let admin_token_secret = get_validated_secret("TUSPORT_ADMIN_TOKEN_SECRET")?;
        if user_token_secret.expose_secret() == admin_token_secret.expose_secret() {
            return Err(ConfigError::InsecureSecret(
                "TUSPORT_ADMIN_TOKEN_SECRET".to_string(),
                "must differ from TUSPORT_USER_TOKEN_SECRET".to_string(),
            ));
        }

        let user_token_ttl = get_ttl("TUSPORT_USER_TOKEN_TTL_SECS", 86_400)?;
        let admin_token_ttl = get_ttl("TUSPORT_ADMIN_TOKEN_TTL_SECS", 3_600)?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            path_prefix,
            media_dir,
            user_token_secret,
            user_token_ttl,
            admin_token_secret,
            admin_token_ttl,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
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
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a TTL variable as whole seconds.
fn get_ttl(key: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(Duration::from_secs(default_secs)),
        Ok(raw) => {
            let secs = raw
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
            if secs == 0 {
                return Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    "TTL must be positive".to_string(),
                ));
            }
            Ok(Duration::from_secs(secs))
        }
    }
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

/// Validate that a secret is long enough, not a placeholder, and has
/// sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
                secret.len()
            ),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here-your-api-key-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_too_short() {
        let result = validate_secret_strength("aB3$xY9!mK2@n", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6j", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_ttl_default_applies() {
        let ttl = get_ttl("TUSPORT_TEST_TTL_THAT_IS_NEVER_SET", 123).unwrap();
        assert_eq!(ttl, Duration::from_secs(123));
    }
}
