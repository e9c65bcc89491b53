//! Last.fm extension configuration types

use std::fmt;
use std::time::Duration;

use crate::{get_env_opt, get_env_or_default, parse_env, parse_env_fallback, ConfigResult};

/// Default upstream endpoint
pub const DEFAULT_BASE_URL: &str = "http://ws.audioscrobbler.com/2.0/";

/// One day, in milliseconds
const ONE_DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Configuration for the Last.fm client, loader and cache
#[derive(Clone)]
pub struct LastfmConfig {
    /// API key; every upstream call fails when absent
    pub api_key: Option<String>,

    /// Base endpoint URL
    pub base_url: String,

    /// Maximum upstream calls per `rate_period_ms` (0 disables limiting)
    pub rate_limit: u32,

    /// Rate limiting period in milliseconds
    pub rate_period_ms: u64,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Retry attempts for retryable failures
    pub max_retries: u32,

    /// Maximum number of cached loader results
    pub cache_size: usize,

    /// Maximum age of a cached loader result in milliseconds
    pub cache_ttl_ms: u64,

    /// How long the loader waits to collect a batch before dispatching
    pub batch_delay_ms: u64,
}

impl LastfmConfig {
    /// Load Last.fm configuration from environment variables
    ///
    /// Cache size and TTL fall back to the host-wide `GRAPHBRAINZ_CACHE_SIZE`
    /// and `GRAPHBRAINZ_CACHE_TTL` when the extension-specific variables are
    /// not set.
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            api_key: get_env_opt("LASTFM_API_KEY"),
            base_url: get_env_or_default("LASTFM_BASE_URL", DEFAULT_BASE_URL),
            rate_limit: parse_env("LASTFM_RATE_LIMIT", 5)?,
            rate_period_ms: parse_env("LASTFM_RATE_PERIOD_MS", 1000)?,
            timeout_secs: parse_env("LASTFM_TIMEOUT", 10)?,
            max_retries: parse_env("LASTFM_MAX_RETRIES", 3)?,
            cache_size: parse_env_fallback(
                &["LASTFM_CACHE_SIZE", "GRAPHBRAINZ_CACHE_SIZE"],
                8192,
            )?,
            cache_ttl_ms: parse_env_fallback(
                &["LASTFM_CACHE_TTL", "GRAPHBRAINZ_CACHE_TTL"],
                ONE_DAY_MS,
            )?,
            batch_delay_ms: parse_env("LASTFM_BATCH_DELAY_MS", 1)?,
        })
    }

    /// Create a configuration pointing at a custom URL (useful for testing)
    ///
    /// A dummy key is set, rate limiting and retries are disabled.
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            api_key: Some("test_api_key".to_string()),
            base_url: url.into(),
            rate_limit: 0,
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Replace the API key
    pub fn api_key(mut self, key: Option<impl Into<String>>) -> Self {
        self.api_key = key.map(Into::into);
        self
    }

    /// Replace the cache bounds
    pub fn cache(mut self, size: usize, ttl: Duration) -> Self {
        self.cache_size = size;
        self.cache_ttl_ms = ttl.as_millis() as u64;
        self
    }

    /// Check whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn rate_period(&self) -> Duration {
        Duration::from_millis(self.rate_period_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

impl Default for LastfmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limit: 5,
            rate_period_ms: 1000,
            timeout_secs: 10,
            max_retries: 3,
            cache_size: 8192,
            cache_ttl_ms: ONE_DAY_MS,
            batch_delay_ms: 1,
        }
    }
}

impl fmt::Debug for LastfmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastfmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("rate_limit", &self.rate_limit)
            .field("rate_period_ms", &self.rate_period_ms)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("cache_size", &self.cache_size)
            .field("cache_ttl_ms", &self.cache_ttl_ms)
            .field("batch_delay_ms", &self.batch_delay_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 11] = [
        "LASTFM_API_KEY",
        "LASTFM_BASE_URL",
        "LASTFM_RATE_LIMIT",
        "LASTFM_RATE_PERIOD_MS",
        "LASTFM_TIMEOUT",
        "LASTFM_MAX_RETRIES",
        "LASTFM_CACHE_SIZE",
        "GRAPHBRAINZ_CACHE_SIZE",
        "LASTFM_CACHE_TTL",
        "GRAPHBRAINZ_CACHE_TTL",
        "LASTFM_BATCH_DELAY_MS",
    ];

    fn unset_all() -> Vec<(&'static str, Option<&'static str>)> {
        ALL_VARS.iter().map(|name| (*name, None)).collect()
    }

    #[test]
    fn test_default_config() {
        let config = LastfmConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, "http://ws.audioscrobbler.com/2.0/");
        assert_eq!(config.rate_limit, 5);
        assert_eq!(config.cache_size, 8192);
        assert_eq!(config.cache_ttl(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(unset_all(), || {
            let config = LastfmConfig::from_env().unwrap();
            assert!(!config.has_api_key());
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
            assert_eq!(config.max_retries, 3);
            assert_eq!(config.cache_ttl_ms, ONE_DAY_MS);
        });
    }

    #[test]
    fn test_from_env_overrides() {
        let mut vars = unset_all();
        vars.extend([
            ("LASTFM_API_KEY", Some("abc")),
            ("LASTFM_BASE_URL", Some("http://localhost:9999/")),
            ("LASTFM_RATE_LIMIT", Some("10")),
            ("LASTFM_CACHE_SIZE", Some("16")),
            ("LASTFM_CACHE_TTL", Some("5000")),
        ]);
        temp_env::with_vars(vars, || {
            let config = LastfmConfig::from_env().unwrap();
            assert_eq!(config.api_key.as_deref(), Some("abc"));
            assert_eq!(config.base_url, "http://localhost:9999/");
            assert_eq!(config.rate_limit, 10);
            assert_eq!(config.cache_size, 16);
            assert_eq!(config.cache_ttl(), Duration::from_secs(5));
        });
    }

    #[test]
    fn test_cache_settings_fall_back_to_host_variables() {
        let mut vars = unset_all();
        vars.extend([
            ("GRAPHBRAINZ_CACHE_SIZE", Some("100")),
            ("GRAPHBRAINZ_CACHE_TTL", Some("60000")),
        ]);
        temp_env::with_vars(vars, || {
            let config = LastfmConfig::from_env().unwrap();
            assert_eq!(config.cache_size, 100);
            assert_eq!(config.cache_ttl_ms, 60_000);
        });
    }

    #[test]
    fn test_invalid_cache_size_is_an_error() {
        let mut vars = unset_all();
        vars.push(("LASTFM_CACHE_SIZE", Some("lots")));
        temp_env::with_vars(vars, || {
            assert!(LastfmConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_with_base_url() {
        let config = LastfmConfig::with_base_url("http://mock:1234/");
        assert_eq!(config.base_url, "http://mock:1234/");
        assert!(config.has_api_key());
        assert_eq!(config.rate_limit, 0);
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = LastfmConfig::default().api_key(Some("secret_key"));
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("secret_key"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
