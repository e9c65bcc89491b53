//! Last.fm API client implementation

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use brainz_shared_config::LastfmConfig;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{LastfmError, LastfmResult, INVALID_API_KEY_CODE};
use crate::models::{
    from_detail_envelope, ErrorResponse, RawAlbum, RawArtist, RawPage, RawTag, RawTrack,
};

/// Per-call query parameters, ordered by name
pub type Params = BTreeMap<String, String>;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Base delay for exponential backoff (milliseconds)
const RETRY_BASE_DELAY_MS: u64 = 100;

/// Query parameters the client sets itself
const RESERVED_PARAMS: [&str; 3] = ["method", "format", "api_key"];

/// Last.fm API client
///
/// Clones share the HTTP connection pool and the rate limiter.
#[derive(Clone)]
pub struct LastfmClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
    max_retries: u32,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

/// API key validation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyStatus {
    /// API key is valid
    Valid,
    /// API key is invalid or missing
    Invalid,
    /// Could not determine validity (network error, etc.)
    Unknown(String),
}

impl fmt::Debug for LastfmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastfmClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .field("rate_limited", &self.limiter.is_some())
            .finish()
    }
}

impl LastfmClient {
    /// Create a new Last.fm client from configuration
    ///
    /// A missing API key is not an error here: every call made through the
    /// client fails with `LastfmError::MissingApiKey` instead, before any
    /// network attempt.
    ///
    /// # Errors
    /// Returns `LastfmError::Http` if the HTTP client cannot be built
    pub fn new(config: &LastfmConfig) -> LastfmResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("brainz-lastfm/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
            base_url: config.base_url.clone(),
            max_retries: config.max_retries,
            limiter: Self::build_limiter(config),
        })
    }

    /// Spread `rate_limit` calls evenly over `rate_period`, allowing a burst
    /// of the full limit
    fn build_limiter(config: &LastfmConfig) -> Option<Arc<DefaultDirectRateLimiter>> {
        let burst = NonZeroU32::new(config.rate_limit)?;
        let quota = Quota::with_period(config.rate_period() / config.rate_limit)?.allow_burst(burst);
        Some(Arc::new(RateLimiter::direct(quota)))
    }

    /// Check whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Execute an operation with retry logic for transient failures
    async fn with_retry<T, F, Fut>(&self, operation: F) -> LastfmResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = LastfmResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = RETRY_BASE_DELAY_MS * 2u64.pow(attempt);
                    warn!(
                        attempt = attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Last.fm request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Make one HTTP round-trip and decode the payload
    ///
    /// An upstream error payload takes precedence over the HTTP status, since
    /// Last.fm reports most failures in the body.
    async fn make_request(&self, method: &str, api_key: &str, params: &Params) -> LastfmResult<Value> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let mut query: Vec<(&str, &str)> = vec![
            ("method", method),
            ("format", "json"),
            ("api_key", api_key),
        ];
        query.extend(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LastfmError::Timeout
                } else {
                    LastfmError::Http(e)
                }
            })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Last.fm API rate limited");
            return Err(LastfmError::RateLimited);
        }

        let status_error = response.error_for_status_ref().err();
        let text = response.text().await.map_err(LastfmError::Http)?;

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => {
                if let Some(error) = ErrorResponse::detect(&body) {
                    return Err(error);
                }
                match status_error {
                    Some(e) => Err(LastfmError::Http(e)),
                    None => Ok(body),
                }
            }
            Err(parse_error) => Err(match status_error {
                Some(e) => LastfmError::Http(e),
                None => LastfmError::Parse(parse_error),
            }),
        }
    }

    /// Call an API method and return the decoded JSON body
    ///
    /// # Errors
    /// - `LastfmError::MissingApiKey` - If no API key is configured
    /// - `LastfmError::InvalidInput` - If `params` sets a reserved parameter
    /// - `LastfmError::NotFound` - If Last.fm reports error code 6
    /// - `LastfmError::Api` - If Last.fm returns any other error payload
    /// - `LastfmError::Http` / `LastfmError::Timeout` - If the transport fails
    pub async fn call(&self, method: &str, params: &Params) -> LastfmResult<Value> {
        let api_key = self.api_key.as_deref().ok_or(LastfmError::MissingApiKey)?;
        if let Some(reserved) = RESERVED_PARAMS.iter().find(|name| params.contains_key(**name)) {
            return Err(LastfmError::InvalidInput(format!(
                "`{}` cannot be passed as a parameter",
                reserved
            )));
        }

        debug!(method, ?params, "Calling Last.fm");

        self.with_retry(|| self.make_request(method, api_key, params))
            .await
    }

    async fn call_detail<T>(&self, method: &str, envelope: &str, params: &Params) -> LastfmResult<Option<T>>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let body = self.call(method, params).await?;
        from_detail_envelope(&body, envelope)
    }

    async fn call_list<T>(
        &self,
        method: &str,
        envelope: &str,
        field: &str,
        params: &Params,
    ) -> LastfmResult<RawPage<T>>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let body = self.call(method, params).await?;
        let page = RawPage::from_envelope(&body, envelope, field)?;
        debug!(method, result_count = page.items.len(), "Last.fm list received");
        Ok(page)
    }

    /// `artist.getInfo`
    #[instrument(skip(self))]
    pub async fn artist_info(&self, params: &Params) -> LastfmResult<Option<RawArtist>> {
        self.call_detail("artist.getInfo", "artist", params).await
    }

    /// `artist.getSimilar`
    #[instrument(skip(self))]
    pub async fn similar_artists(&self, params: &Params) -> LastfmResult<RawPage<RawArtist>> {
        self.call_list("artist.getSimilar", "similarartists", "artist", params)
            .await
    }

    /// `artist.getTopAlbums`
    #[instrument(skip(self))]
    pub async fn artist_top_albums(&self, params: &Params) -> LastfmResult<RawPage<RawAlbum>> {
        self.call_list("artist.getTopAlbums", "topalbums", "album", params)
            .await
    }

    /// `artist.getTopTags`
    #[instrument(skip(self))]
    pub async fn artist_top_tags(&self, params: &Params) -> LastfmResult<RawPage<RawTag>> {
        self.call_list("artist.getTopTags", "toptags", "tag", params)
            .await
    }

    /// `artist.getTopTracks`
    #[instrument(skip(self))]
    pub async fn artist_top_tracks(&self, params: &Params) -> LastfmResult<RawPage<RawTrack>> {
        self.call_list("artist.getTopTracks", "toptracks", "track", params)
            .await
    }

    /// `album.getInfo`
    #[instrument(skip(self))]
    pub async fn album_info(&self, params: &Params) -> LastfmResult<Option<RawAlbum>> {
        self.call_detail("album.getInfo", "album", params).await
    }

    /// `album.getTopTags`
    #[instrument(skip(self))]
    pub async fn album_top_tags(&self, params: &Params) -> LastfmResult<RawPage<RawTag>> {
        self.call_list("album.getTopTags", "toptags", "tag", params)
            .await
    }

    /// `track.getInfo`
    #[instrument(skip(self))]
    pub async fn track_info(&self, params: &Params) -> LastfmResult<Option<RawTrack>> {
        self.call_detail("track.getInfo", "track", params).await
    }

    /// `track.getTopTags`
    #[instrument(skip(self))]
    pub async fn track_top_tags(&self, params: &Params) -> LastfmResult<RawPage<RawTag>> {
        self.call_list("track.getTopTags", "toptags", "tag", params)
            .await
    }

    /// `track.getSimilar`
    #[instrument(skip(self))]
    pub async fn similar_tracks(&self, params: &Params) -> LastfmResult<RawPage<RawTrack>> {
        self.call_list("track.getSimilar", "similartracks", "track", params)
            .await
    }

    /// `chart.getTopArtists`
    #[instrument(skip(self))]
    pub async fn chart_top_artists(&self, params: &Params) -> LastfmResult<RawPage<RawArtist>> {
        self.call_list("chart.getTopArtists", "artists", "artist", params)
            .await
    }

    /// `chart.getTopTags`
    #[instrument(skip(self))]
    pub async fn chart_top_tags(&self, params: &Params) -> LastfmResult<RawPage<RawTag>> {
        self.call_list("chart.getTopTags", "tags", "tag", params)
            .await
    }

    /// `chart.getTopTracks`
    #[instrument(skip(self))]
    pub async fn chart_top_tracks(&self, params: &Params) -> LastfmResult<RawPage<RawTrack>> {
        self.call_list("chart.getTopTracks", "tracks", "track", params)
            .await
    }

    /// `geo.getTopArtists`
    #[instrument(skip(self))]
    pub async fn geo_top_artists(&self, params: &Params) -> LastfmResult<RawPage<RawArtist>> {
        self.call_list("geo.getTopArtists", "topartists", "artist", params)
            .await
    }

    /// `geo.getTopTracks`
    #[instrument(skip(self))]
    pub async fn geo_top_tracks(&self, params: &Params) -> LastfmResult<RawPage<RawTrack>> {
        self.call_list("geo.getTopTracks", "tracks", "track", params)
            .await
    }

    /// Check if the API key is valid by making a simple request
    ///
    /// Returns `ApiKeyStatus` indicating whether the key is valid, invalid,
    /// or if the check could not be completed due to network issues.
    pub async fn validate_api_key(&self) -> ApiKeyStatus {
        let params = Params::from([
            ("artist".to_string(), "The Beatles".to_string()),
            ("limit".to_string(), "1".to_string()),
        ]);
        match self.similar_artists(&params).await {
            Ok(_) => ApiKeyStatus::Valid,
            Err(LastfmError::MissingApiKey) => ApiKeyStatus::Invalid,
            Err(LastfmError::Api { code, .. }) if code == INVALID_API_KEY_CODE => {
                ApiKeyStatus::Invalid
            }
            Err(e) => ApiKeyStatus::Unknown(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_key() -> LastfmConfig {
        LastfmConfig::default().api_key(None::<String>)
    }

    #[test]
    fn test_client_builds_without_api_key() {
        let client = LastfmClient::new(&config_without_key()).unwrap();
        assert!(!client.has_api_key());
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        let client = LastfmClient::new(&LastfmConfig::default().api_key(Some(""))).unwrap();
        assert!(!client.has_api_key());
    }

    #[test]
    fn test_client_debug_redacts_api_key() {
        let config = LastfmConfig::default().api_key(Some("secret_key"));
        let client = LastfmClient::new(&config).unwrap();
        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("secret_key"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_zero_rate_limit_disables_limiter() {
        let mut config = LastfmConfig::default();
        config.rate_limit = 0;
        assert!(LastfmClient::build_limiter(&config).is_none());

        config.rate_limit = 5;
        assert!(LastfmClient::build_limiter(&config).is_some());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        // Unroutable base URL: reaching the network would surface as an HTTP error.
        let config = config_without_key();
        let client = LastfmClient::new(&LastfmConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            ..config
        })
        .unwrap();

        let result = client.artist_info(&Params::new()).await;
        assert!(matches!(result, Err(LastfmError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_reserved_params_are_rejected() {
        let config = LastfmConfig::default().api_key(Some("key"));
        let client = LastfmClient::new(&config).unwrap();
        let params = Params::from([("api_key".to_string(), "other".to_string())]);

        let result = client.call("artist.getInfo", &params).await;
        assert!(matches!(result, Err(LastfmError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_validate_api_key_without_key_is_invalid() {
        let client = LastfmClient::new(&config_without_key()).unwrap();
        assert_eq!(client.validate_api_key().await, ApiKeyStatus::Invalid);
    }

    #[test]
    fn test_api_key_status_equality() {
        assert_eq!(ApiKeyStatus::Valid, ApiKeyStatus::Valid);
        assert_ne!(ApiKeyStatus::Valid, ApiKeyStatus::Invalid);
    }
}
