//! Error handling for the Last.fm extension
//!
//! Every failure that reaches a resolver is an [`ExtensionError`]. At the
//! GraphQL boundary it becomes a field error whose extensions carry a stable
//! `code` (plus `lastfmCode` for upstream error payloads), so sibling fields
//! still resolve.

use async_graphql::ErrorExtensions;
use brainz_lastfm_client::LastfmError;
use brainz_shared_config::ConfigError;
use thiserror::Error;

use crate::loader::LoadError;

/// Extension error type
#[derive(Error, Debug)]
pub enum ExtensionError {
    /// A field argument was rejected
    #[error("{0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The client could not be built or a direct client call failed
    #[error("Last.fm error: {0}")]
    Upstream(#[from] LastfmError),

    /// A loader request failed
    #[error("{0}")]
    Load(#[from] LoadError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Client,
    Upstream,
    Internal,
}

impl ExtensionError {
    /// The upstream error behind this failure, if any
    pub fn lastfm_error(&self) -> Option<&LastfmError> {
        match self {
            Self::Upstream(e) => Some(e),
            Self::Load(e) => e.upstream(),
            _ => None,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        if let Some(e) = self.lastfm_error() {
            return match e {
                LastfmError::MissingApiKey => "LASTFM_NOT_CONFIGURED",
                LastfmError::InvalidInput(_) => "INVALID_ARGUMENT",
                LastfmError::NotFound { .. } => "NOT_FOUND",
                LastfmError::RateLimited => "RATE_LIMITED",
                LastfmError::Timeout => "TIMEOUT",
                LastfmError::Api { .. } => "LASTFM_ERROR",
                LastfmError::Http(_) => "EXTERNAL_SERVICE_ERROR",
                LastfmError::Parse(_) => "INVALID_RESPONSE",
            };
        }
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Load(_) | Self::Upstream(_) => "INTERNAL_ERROR",
        }
    }

    fn severity(&self) -> Severity {
        match self.lastfm_error() {
            Some(LastfmError::InvalidInput(_) | LastfmError::NotFound { .. }) => Severity::Client,
            Some(_) => Severity::Upstream,
            None => match self {
                Self::InvalidArgument(_) => Severity::Client,
                _ => Severity::Internal,
            },
        }
    }

    /// Log the error with appropriate severity
    pub fn log(&self) {
        match self.severity() {
            Severity::Internal => tracing::error!(
                error = %self,
                code = self.error_code(),
                "Internal extension error"
            ),
            Severity::Upstream => tracing::warn!(
                error = %self,
                code = self.error_code(),
                "Last.fm request failed"
            ),
            Severity::Client => tracing::debug!(
                error = %self,
                code = self.error_code(),
                "Client error"
            ),
        }
    }
}

impl ErrorExtensions for ExtensionError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.error_code();
        let upstream_code = self.lastfm_error().and_then(LastfmError::code);
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", code);
            if let Some(upstream_code) = upstream_code {
                e.set("lastfmCode", upstream_code);
            }
        })
    }
}

/// Result type alias for extension operations
pub type ExtensionResult<T> = Result<T, ExtensionError>;

/// Convert resolver failures into logged GraphQL field errors
pub(crate) trait GraphQLResultExt<T> {
    fn gql(self) -> async_graphql::Result<T>;
}

impl<T, E> GraphQLResultExt<T> for Result<T, E>
where
    E: Into<ExtensionError>,
{
    fn gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| {
            let err = e.into();
            err.log();
            err.extend()
        })
    }
}
