//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BLITZSHOP_API_URL` - Base URL of the REST API (default: `http://localhost:5000`)
//! - `BLITZSHOP_STATE_DIR` - Directory for persisted session state (default: `.blitzshop`)
//! - `BLITZSHOP_CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `BLITZSHOP_USER_AGENT` - Override the HTTP `User-Agent`
//! - `STRIPE_PUBLISHABLE_KEY` - Publishable key for card confirmation
//! - `STRIPE_API_URL` - Stripe API base (default: `https://api.stripe.com`)
//! - `STRIPE_PAYMENT_METHOD` - Tokenized card to confirm with; required once
//!   `STRIPE_PUBLISHABLE_KEY` is set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Local development backend.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Hosted production backend.
pub const PRODUCTION_API_URL: &str = "https://blitzshop-backend.onrender.com";

const DEFAULT_STATE_DIR: &str = ".blitzshop";
const DEFAULT_CATALOG_TTL_SECS: u64 = 300;
const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the BlitzShop REST API
    pub api_url: Url,
    /// Directory holding the persisted key-value store
    pub state_dir: PathBuf,
    /// Lifetime of cached catalog responses
    pub catalog_cache_ttl: Duration,
    /// Custom `User-Agent` header
    pub user_agent: Option<String>,
    /// Card confirmation settings
    pub stripe: Option<StripeConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Hosted card confirmation settings.
///
/// Implements `Debug` manually to redact the key.
#[derive(Clone)]
pub struct StripeConfig {
    /// Publishable key (`pk_...`)
    pub publishable_key: SecretString,
    /// API base URL
    pub api_url: Url,
    /// Payment method token used to confirm intents
    pub payment_method: String,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("publishable_key", &"[REDACTED]")
            .field("api_url", &self.api_url.as_str())
            .field("payment_method", &self.payment_method)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_url(
            "BLITZSHOP_API_URL",
            &get_env_or_default("BLITZSHOP_API_URL", DEFAULT_API_URL),
        )?;
        let state_dir = PathBuf::from(get_env_or_default("BLITZSHOP_STATE_DIR", DEFAULT_STATE_DIR));
        let ttl_secs = get_env_or_default(
            "BLITZSHOP_CATALOG_CACHE_TTL_SECS",
            &DEFAULT_CATALOG_TTL_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("BLITZSHOP_CATALOG_CACHE_TTL_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_url,
            state_dir,
            catalog_cache_ttl: Duration::from_secs(ttl_secs),
            user_agent: get_optional_env("BLITZSHOP_USER_AGENT"),
            stripe: StripeConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration pointing at `api_url` with every other setting at its default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_url` is not a valid URL.
    pub fn for_api_url(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_url("BLITZSHOP_API_URL", api_url)?,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            catalog_cache_ttl: Duration::from_secs(DEFAULT_CATALOG_TTL_SECS),
            user_agent: None,
            stripe: None,
            sentry_dsn: None,
            sentry_environment: None,
        })
    }

    /// Path of the JSON file backing persisted session state.
    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.state_dir.join("storage.json")
    }
}

impl StripeConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_values(
            get_optional_env("STRIPE_PUBLISHABLE_KEY"),
            get_optional_env("STRIPE_API_URL"),
            get_optional_env("STRIPE_PAYMENT_METHOD"),
        )
    }

    /// Build from raw settings. Without a key, card confirmation is off.
    fn from_values(
        key: Option<String>,
        api_url: Option<String>,
        payment_method: Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(key) = key else {
            return Ok(None);
        };
        if !key.starts_with("pk_") {
            return Err(ConfigError::InvalidEnvVar(
                "STRIPE_PUBLISHABLE_KEY".to_string(),
                "must be a publishable key (pk_...)".to_string(),
            ));
        }
        let payment_method = payment_method
            .ok_or_else(|| ConfigError::MissingEnvVar("STRIPE_PAYMENT_METHOD".to_string()))?;

        Ok(Some(Self {
            publishable_key: SecretString::from(key),
            api_url: parse_url(
                "STRIPE_API_URL",
                api_url.as_deref().unwrap_or(DEFAULT_STRIPE_API_URL),
            )?,
            payment_method,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a base URL, normalizing it to end with a slash so joins keep its path.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
