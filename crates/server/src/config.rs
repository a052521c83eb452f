//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GIFTLY_DATABASE_URL` - `PostgreSQL` connection string
//! - `GIFTLY_ADMIN_API_KEY` - Shared key for the admin API (min 32 chars)
//! - `RAZORPAY_KEY_ID` - Payment gateway key id
//! - `RAZORPAY_KEY_SECRET` - Payment gateway key secret
//! - `RAZORPAY_WEBHOOK_SECRET` - Shared secret for webhook signature checks
//!
//! ## Optional
//! - `GIFTLY_HOST` - Bind address (default: 127.0.0.1)
//! - `GIFTLY_PORT` - Listen port (default: 3000)
//! - `SMTP_HOST` / `SMTP_PORT` / `SMTP_USERNAME` / `SMTP_PASSWORD` /
//!   `SMTP_FROM_ADDRESS` - confirmation email delivery (disabled if unset)
//! - `OPS_WEBHOOK_URL` - operator notification endpoint (disabled if unset)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SECRET_LENGTH: usize = 32;

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

/// Giftly server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shared key for admin API requests
    pub admin_api_key: SecretString,
    /// Payment gateway configuration
    pub razorpay: RazorpayConfig,
    /// Confirmation email delivery (None disables email)
    pub email: Option<EmailConfig>,
    /// Operator notification webhook URL (None disables notifications)
    pub ops_webhook_url: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Razorpay gateway configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// API key id (safe to expose to the browser checkout widget)
    pub key_id: String,
    /// API key secret (server-side only)
    pub key_secret: SecretString,
    /// Shared secret used to verify webhook signatures
    pub webhook_secret: SecretString,
    /// API base URL; overridable for tests
    pub api_base: String,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// SMTP configuration for transactional email.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, length check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = SecretString::from(get_required("GIFTLY_DATABASE_URL")?);
        let host = get_env_or_default("GIFTLY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GIFTLY_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("GIFTLY_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GIFTLY_PORT".to_string(), e.to_string()))?;

        let admin_api_key = get_validated_secret("GIFTLY_ADMIN_API_KEY")?;

        let razorpay = RazorpayConfig {
            key_id: get_required("RAZORPAY_KEY_ID")?,
            key_secret: SecretString::from(get_required("RAZORPAY_KEY_SECRET")?),
            webhook_secret: SecretString::from(get_required("RAZORPAY_WEBHOOK_SECRET")?),
            api_base: get_env_or_default("RAZORPAY_API_BASE", "https://api.razorpay.com"),
        };

        let email = match std::env::var("SMTP_HOST") {
            Ok(smtp_host) => Some(EmailConfig {
                smtp_host,
                smtp_port: get_env_or_default("SMTP_PORT", "587").parse::<u16>().map_err(
                    |e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()),
                )?,
                smtp_username: get_required("SMTP_USERNAME")?,
                smtp_password: SecretString::from(get_required("SMTP_PASSWORD")?),
                from_address: get_required("SMTP_FROM_ADDRESS")?,
            }),
            Err(_) => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            admin_api_key,
            razorpay,
            email,
            ops_webhook_url: std::env::var("OPS_WEBHOOK_URL").ok(),
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// Socket address to bind the listener to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn get_required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Load a secret and reject placeholder or too-short values.
fn get_validated_secret(name: &str) -> Result<SecretString, ConfigError> {
    let value = get_required(name)?;

    if value.len() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            name.to_string(),
            format!("must be at least {MIN_SECRET_LENGTH} characters"),
        ));
    }

    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_string(),
                format!("looks like a placeholder (contains \"{pattern}\")"),
            ));
        }
    }

    Ok(SecretString::from(value))
}

impl ServerConfig {
    /// Expose the admin API key for comparison in the auth middleware.
    #[must_use]
    pub fn admin_api_key(&self) -> &str {
        self.admin_api_key.expose_secret()
    }
}

#[cfg(test)]
#[allow(unsafe_code)] // env::set_var is unsafe in edition 2024; fine in single-threaded tests
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_secret_rejected() {
        unsafe {
            std::env::set_var("TEST_PLACEHOLDER_KEY", "changeme-changeme-changeme-change");
        }
        let result = get_validated_secret("TEST_PLACEHOLDER_KEY");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_short_secret_rejected() {
        unsafe {
            std::env::set_var("TEST_SHORT_KEY", "abc123");
        }
        let result = get_validated_secret("TEST_SHORT_KEY");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_strong_secret_accepted() {
        unsafe {
            std::env::set_var("TEST_STRONG_KEY", "kJ8mQ2vN5xR9wA3bE7cH1dF4gL6pT0yU");
        }
        assert!(get_validated_secret("TEST_STRONG_KEY").is_ok());
    }
}
