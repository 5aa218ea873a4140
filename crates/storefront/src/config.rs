//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CANOPY_STORE_API_URL` - Base URL of the managed document store's REST API
//! - `CANOPY_STORE_API_TOKEN` - Bearer token for the document store
//!
//! ## Optional
//! - `CANOPY_HOST` - Bind address (default: 127.0.0.1)
//! - `CANOPY_PORT` - Listen port (default: 3000)
//! - `CANOPY_PLATFORM_DOMAIN` - Platform base domain suffix (default: canopy.store)
//! - `CANOPY_DEMO_TENANT` - Tenant key served for localhost/preview hosts (default: demo)
//! - `CANOPY_REVALIDATE_SECS` - Snapshot cache revalidation window (default: 300)
//! - `CANOPY_NEGATIVE_TTL_SECS` - Confirmed-absent tenant cache TTL (default: 60)
//! - `CANOPY_FETCH_TIMEOUT_SECS` - Bound on any backend fetch (default: 5)
//! - `CANOPY_DEFAULT_THEME` - Theme identifier used when a tenant has none (default: classic)
//! - `CANOPY_DEV_MODE` - Enables the `?tenant=` host override (default: false)
//! - `CANOPY_TELEMETRY_URL` - Fire-and-forget page-view sink
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Platform base domain suffix (hosts of the form `<label>.<suffix>`
    /// are platform subdomains)
    pub platform_domain: String,
    /// Tenant key served for localhost, loopback, and preview hosts
    pub demo_tenant: String,
    /// Snapshot cache revalidation window
    pub revalidate_window: Duration,
    /// TTL for negatively cached (confirmed-absent) tenant lookups
    pub negative_ttl: Duration,
    /// Bounded timeout applied to every backend fetch
    pub fetch_timeout: Duration,
    /// Theme identifier used when a tenant record carries none
    pub default_theme: String,
    /// Whether the `?tenant=` development override is honored
    pub dev_mode: bool,
    /// Document store API configuration
    pub store: StoreApiConfig,
    /// Fire-and-forget page-view sink, if any
    pub telemetry_url: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// Document store API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct StoreApiConfig {
    /// Base URL of the document store REST API
    pub base_url: String,
    /// Bearer token (server-side only)
    pub api_token: SecretString,
}

impl std::fmt::Debug for StoreApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreApiConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
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

        let host = get_env_or_default("CANOPY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CANOPY_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CANOPY_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CANOPY_PORT".to_string(), e.to_string()))?;

        let platform_domain =
            get_env_or_default("CANOPY_PLATFORM_DOMAIN", "canopy.store").to_ascii_lowercase();
        let demo_tenant = get_env_or_default("CANOPY_DEMO_TENANT", "demo");

        let revalidate_window = get_duration_secs("CANOPY_REVALIDATE_SECS", 300)?;
        let negative_ttl = get_duration_secs("CANOPY_NEGATIVE_TTL_SECS", 60)?;
        let fetch_timeout = get_duration_secs("CANOPY_FETCH_TIMEOUT_SECS", 5)?;

        let default_theme = get_env_or_default("CANOPY_DEFAULT_THEME", "classic");
        let dev_mode = get_bool("CANOPY_DEV_MODE")?;

        let store = StoreApiConfig {
            base_url: get_required_env("CANOPY_STORE_API_URL")?,
            api_token: get_required_secret("CANOPY_STORE_API_TOKEN")?,
        };

        Ok(Self {
            host,
            port,
            platform_domain,
            demo_tenant,
            revalidate_window,
            negative_ttl,
            fetch_timeout,
            default_theme,
            dev_mode,
            store,
            telemetry_url: get_optional_env("CANOPY_TELEMETRY_URL"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
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

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a duration in whole seconds with a default.
fn get_duration_secs(key: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(Duration::from_secs(default_secs)),
    }
}

/// Parse a boolean flag ("1", "true", "yes" are truthy; unset is false).
fn get_bool(key: &str) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" | "" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got '{other}'"),
            )),
        },
        Err(_) => Ok(false),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            platform_domain: "canopy.store".to_string(),
            demo_tenant: "demo".to_string(),
            revalidate_window: Duration::from_secs(300),
            negative_ttl: Duration::from_secs(60),
            fetch_timeout: Duration::from_secs(5),
            default_theme: "classic".to_string(),
            dev_mode: false,
            store: StoreApiConfig {
                base_url: "http://localhost:8080".to_string(),
                api_token: SecretString::from("s3cr3t-value"),
            },
            telemetry_url: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_store_config_debug_redacts_token() {
        let config = test_config();
        let debug_output = format!("{:?}", config.store);
        assert!(debug_output.contains("http://localhost:8080"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("s3cr3t-value"));
    }
}
