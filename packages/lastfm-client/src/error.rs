//! Last.fm API error types

use thiserror::Error;

/// Upstream code meaning the requested entity does not exist
pub const NOT_FOUND_CODE: i32 = 6;

/// Upstream code meaning the API key is invalid
pub const INVALID_API_KEY_CODE: i32 = 10;

/// Upstream codes that are safe to retry
///
/// - 8: operation failed, most likely a backend failure
/// - 11: service offline
/// - 16: service temporarily unavailable
/// - 29: rate limit exceeded
pub const RETRYABLE_CODES: [i32; 4] = [8, 11, 16, 29];

/// Last.fm API client errors
#[derive(Error, Debug)]
pub enum LastfmError {
    /// No API key was configured; raised before any network attempt
    #[error("No API key was configured for the Last.fm client")]
    MissingApiKey,

    /// Invalid input provided to API method
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse Last.fm response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Last.fm API returned an error payload
    #[error("Last.fm API error {code}: {message}")]
    Api { code: i32, message: String },

    /// The requested entity does not exist upstream
    #[error("Not found on Last.fm: {message}")]
    NotFound { message: String },

    /// Rate limited by Last.fm at the HTTP level
    #[error("Rate limited by Last.fm API")]
    RateLimited,

    /// Request timeout
    #[error("Request to Last.fm timed out")]
    Timeout,
}

impl LastfmError {
    /// Build an error from an upstream `{error, message}` payload
    pub fn from_code(code: i32, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == NOT_FOUND_CODE {
            Self::NotFound { message }
        } else {
            Self::Api { code, message }
        }
    }

    /// The upstream numeric code, if the error came from an error payload
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Api { code, .. } => Some(*code),
            Self::NotFound { .. } => Some(NOT_FOUND_CODE),
            _ => None,
        }
    }

    /// Check if this error means "the entity does not exist"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is retryable (transient failure)
    ///
    /// Retries on:
    /// - Timeouts and HTTP-level rate limiting
    /// - Transport errors (connect, timeout) and server errors (5xx)
    /// - Upstream codes in [`RETRYABLE_CODES`]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::RateLimited => true,
            Self::Api { code, .. } => RETRYABLE_CODES.contains(code),
            Self::Http(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                matches!(e.status(), Some(status) if status.is_server_error())
            }
            _ => false,
        }
    }
}

/// Result type for Last.fm operations
pub type LastfmResult<T> = Result<T, LastfmError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(8, true)]
    #[case(11, true)]
    #[case(16, true)]
    #[case(29, true)]
    #[case(10, false)]
    #[case(26, false)]
    fn test_api_code_retryability(#[case] code: i32, #[case] retryable: bool) {
        assert_eq!(LastfmError::from_code(code, "msg").is_retryable(), retryable);
    }

    #[test]
    fn test_not_found_code_maps_to_not_found() {
        let err = LastfmError::from_code(6, "The artist you supplied could not be found");
        assert!(err.is_not_found());
        assert!(!err.is_retryable());
        assert_eq!(err.code(), Some(6));
    }

    #[test]
    fn test_error_is_retryable() {
        assert!(LastfmError::Timeout.is_retryable());
        assert!(LastfmError::RateLimited.is_retryable());
        assert!(!LastfmError::MissingApiKey.is_retryable());
        assert!(!LastfmError::InvalidInput("x".to_string()).is_retryable());
    }

    #[test]
    fn test_api_error_display_includes_code() {
        let err = LastfmError::from_code(29, "Rate Limit Exceeded");
        assert_eq!(err.to_string(), "Last.fm API error 29: Rate Limit Exceeded");
        assert_eq!(err.code(), Some(29));
    }
}
