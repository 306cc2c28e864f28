//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `QKART_BACKEND_URL` - Base URL of the backend API (e.g. `http://localhost:8082/api/v1`)
//!
//! ## Optional
//! - `QKART_AUTH_TOKEN` - Bearer token of the logged-in user (absent = anonymous session)
//! - `QKART_USERNAME` - Username of the logged-in user (gates cart visibility)
//! - `QKART_SEARCH_DEBOUNCE_MS` - Search quiescence window (default: 500)
//! - `QKART_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `QKART_CATALOG_CACHE_TTL_SECS` - Catalog cache TTL, 0 disables (default: 0)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::str::FromStr;
use std::time::Duration;

use qkart_core::AuthToken;
use thiserror::Error;
use url::Url;

const DEFAULT_SEARCH_DEBOUNCE_MS: &str = "500";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "30";
const DEFAULT_CATALOG_CACHE_TTL_SECS: &str = "0";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend connection settings
    pub backend: BackendConfig,
    /// Logged-in user, if any
    pub session: SessionConfig,
    /// Quiescence window for search input
    pub search_debounce: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend API configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Per-request timeout enforced by the HTTP client
    pub timeout: Duration,
    /// Catalog cache TTL (`None` disables caching)
    pub catalog_cache_ttl: Option<Duration>,
}

/// Credentials of the current user.
///
/// `AuthToken` redacts itself, so the derived `Debug` is safe to log.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Bearer token for the cart endpoints
    pub token: Option<AuthToken>,
    /// Username shown in the header; the cart panel is only shown when set
    pub username: Option<String>,
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let backend = BackendConfig {
            base_url: env.parse_required::<Url>("QKART_BACKEND_URL")?,
            timeout: Duration::from_secs(
                env.parse_or_default("QKART_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            ),
            catalog_cache_ttl: match env
                .parse_or_default::<u64>("QKART_CATALOG_CACHE_TTL_SECS", DEFAULT_CATALOG_CACHE_TTL_SECS)?
            {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        };

        let session = SessionConfig {
            token: env.optional("QKART_AUTH_TOKEN").and_then(AuthToken::new),
            username: env.optional("QKART_USERNAME").filter(|u| !u.trim().is_empty()),
        };

        let search_debounce = Duration::from_millis(
            env.parse_or_default("QKART_SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS)?,
        );

        Ok(Self {
            backend,
            session,
            search_debounce,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with typed accessors.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Parse a required variable.
    fn parse_required<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        parse_value(key, &self.required(key)?)
    }

    /// Parse a variable, falling back to a default.
    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self.optional(key).unwrap_or_else(|| default.to_string());
        parse_value(key, &value)
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
