//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! Nothing is strictly required. Missing upstream credentials leave the
//! server running with the affected features reported as unconfigured by
//! `/api/health`.
//!
//! ## Server
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `API_BASE_URL` - Base URL the browser should prefix API calls with (default: same origin)
//! - `STATIC_DIR` - Directory holding the browser script and styles (default: crates/server/static)
//! - `LOG_FORMAT` - `json` for JSON log lines, anything else for text
//!
//! ## Shopify (both required to enable the catalog)
//! - `SHOPIFY_STORE_URL` - Store domain (e.g., your-store.myshopify.com) or full origin
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token
//! - `SHOPIFY_API_VERSION` - Admin API version (default: 2024-01)
//!
//! ## OpenAI
//! - `OPENAI_API_KEY` - API key (enables description generation)
//! - `OPENAI_MODEL` - Chat model ID (default: gpt-4)
//! - `OPENAI_BASE_URL` - API base URL (default: <https://api.openai.com/v1>)
//!
//! ## Optional (Sentry)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Environment name reported to Sentry
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_SHOPIFY_API_VERSION: &str = "2024-01";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_STATIC_DIR: &str = "crates/server/static";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Base URL handed to the browser via `/api/config` (empty = same origin)
    pub api_base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Shopify Admin API configuration (`None` when credentials are missing)
    pub shopify: Option<ShopifyConfig>,
    /// `OpenAI` configuration (`None` when the API key is missing)
    pub openai: Option<OpenAIConfig>,
    /// Emit JSON log lines instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// Problems found while loading that do not stop startup.
    ///
    /// Loading usually happens before logging is set up, so these are kept
    /// until [`ServerConfig::log_warnings`] runs.
    pub warnings: Vec<String>,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Store origin, always with a scheme
    pub store_url: Url,
    /// Admin API version (e.g., 2024-01)
    pub api_version: String,
    /// Admin API access token
    pub access_token: SecretString,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store_url", &self.store_url.as_str())
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl ShopifyConfig {
    /// Base URL of the versioned Admin REST API, without trailing slash.
    #[must_use]
    pub fn admin_api_base(&self) -> String {
        format!(
            "{}/admin/api/{}",
            self.store_url.as_str().trim_end_matches('/'),
            self.api_version
        )
    }

    /// Store host for log lines.
    #[must_use]
    pub fn store_host(&self) -> &str {
        self.store_url.host_str().unwrap_or_default()
    }
}

/// `OpenAI` API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct OpenAIConfig {
    /// `OpenAI` API key
    pub api_key: SecretString,
    /// Chat model ID (e.g., gpt-4)
    pub model: String,
    /// API base URL (e.g., <https://api.openai.com/v1>)
    pub base_url: Url,
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl OpenAIConfig {
    /// Full URL of the chat completions endpoint.
    #[must_use]
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed
    /// (unparseable host or port, invalid URL).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let host = env
            .get_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = env
            .get_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let api_base_url = env.get("API_BASE_URL").unwrap_or_default();
        let static_dir = PathBuf::from(env.get_or_default("STATIC_DIR", DEFAULT_STATIC_DIR));
        let log_json = env
            .get("LOG_FORMAT")
            .is_some_and(|v| v.eq_ignore_ascii_case("json"));

        let mut warnings = Vec::new();
        let shopify = ShopifyConfig::from_env(&env, &mut warnings)?;
        let openai = OpenAIConfig::from_env(&env, &mut warnings)?;

        let sentry_dsn = env.get("SENTRY_DSN");
        let sentry_environment = env.get("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .get("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .get("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            api_base_url,
            static_dir,
            shopify,
            openai,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            warnings,
        })
    }

    /// Emit every loading warning through `tracing`.
    ///
    /// Call once the subscriber is installed.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!("{warning}");
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether both the store URL and the access token are set.
    #[must_use]
    pub const fn shopify_configured(&self) -> bool {
        self.shopify.is_some()
    }

    /// Whether the `OpenAI` API key is set.
    #[must_use]
    pub const fn openai_configured(&self) -> bool {
        self.openai.is_some()
    }
}

impl ShopifyConfig {
    /// Returns `None` unless both `SHOPIFY_STORE_URL` and `SHOPIFY_ACCESS_TOKEN` are set.
    fn from_env<F: Fn(&str) -> Option<String>>(
        env: &Env<'_, F>,
        warnings: &mut Vec<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let store = env.get("SHOPIFY_STORE_URL");
        let token = env.get("SHOPIFY_ACCESS_TOKEN");

        let (store, token) = match (store, token) {
            (Some(store), Some(token)) => (store, token),
            (None, None) => return Ok(None),
            (Some(_), None) | (None, Some(_)) => {
                warnings.push(
                    "Only one of SHOPIFY_STORE_URL and SHOPIFY_ACCESS_TOKEN is set; catalog disabled"
                        .to_string(),
                );
                return Ok(None);
            }
        };

        warnings.extend(weakness_warning(&token, "SHOPIFY_ACCESS_TOKEN"));

        Ok(Some(Self {
            store_url: normalize_store_url(&store)?,
            api_version: env.get_or_default("SHOPIFY_API_VERSION", DEFAULT_SHOPIFY_API_VERSION),
            access_token: SecretString::from(token),
        }))
    }
}

impl OpenAIConfig {
    /// Returns `None` if `OPENAI_API_KEY` is not set (generation disabled).
    fn from_env<F: Fn(&str) -> Option<String>>(
        env: &Env<'_, F>,
        warnings: &mut Vec<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(key) = env.get("OPENAI_API_KEY") else {
            return Ok(None);
        };

        warnings.extend(weakness_warning(&key, "OPENAI_API_KEY"));

        let base_url = env.get_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("OPENAI_BASE_URL".to_string(), e.to_string()))?;

        Ok(Some(Self {
            api_key: SecretString::from(key),
            model: env.get_or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            base_url,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup that treats empty values as unset.
struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// Accept either a bare store domain or a full origin.
fn normalize_store_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim().trim_end_matches('/');
    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| ConfigError::InvalidEnvVar("SHOPIFY_STORE_URL".to_string(), e.to_string()))?;
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "SHOPIFY_STORE_URL".to_string(),
            "must contain a host".to_string(),
        ));
    }
    Ok(url)
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
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Describe why a credential looks like a placeholder, if it does.
fn secret_weakness(secret: &str) -> Option<String> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Some(format!("appears to be a placeholder (contains '{pattern}')"));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Some(format!(
            "entropy too low ({entropy:.2} bits/char, expected >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        ));
    }

    None
}

/// Credentials are never rejected, only flagged.
fn weakness_warning(secret: &str, var_name: &str) -> Option<String> {
    secret_weakness(secret).map(|reason| format!("{var_name} validation warning: {reason}"))
}
