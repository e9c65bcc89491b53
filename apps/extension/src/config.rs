//! Standalone host configuration

use brainz_shared_config::{get_env_opt, parse_env, LastfmConfig};

use crate::error::ExtensionResult;

/// Standalone host configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Server port (default: 4000)
    pub port: u16,

    /// CORS allowed origins; permissive when unset
    pub cors_allowed_origins: Option<Vec<String>>,

    /// Last.fm extension configuration
    pub lastfm: LastfmConfig,
}

impl HostConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ExtensionResult<Self> {
        let lastfm = LastfmConfig::from_env()?;
        let port = parse_env("PORT", 4000)?;
        let cors_allowed_origins = get_env_opt("CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect()
        });

        Ok(Self {
            port,
            cors_allowed_origins,
            lastfm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtensionError;
    use assert_matches::assert_matches;
    use brainz_shared_config::ConfigError;

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(["PORT", "CORS_ORIGINS", "LASTFM_API_KEY"], || {
            let config = HostConfig::from_env().unwrap();
            assert_eq!(config.port, 4000);
            assert!(config.cors_allowed_origins.is_none());
            assert!(!config.lastfm.has_api_key());
        });
    }

    #[test]
    fn test_overrides() {
        temp_env::with_vars(
            [
                ("PORT", Some("8081")),
                ("CORS_ORIGINS", Some("http://a.test, http://b.test,")),
            ],
            || {
                let config = HostConfig::from_env().unwrap();
                assert_eq!(config.port, 8081);
                assert_eq!(
                    config.cors_allowed_origins,
                    Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
                );
            },
        );
    }

    #[test]
    fn test_invalid_port() {
        temp_env::with_var("PORT", Some("not-a-port"), || {
            let err = HostConfig::from_env().unwrap_err();
            assert_matches!(
                &err,
                ExtensionError::Configuration(ConfigError::InvalidValue(name, _)) if name == "PORT"
            );
            assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        });
    }

    #[test]
    fn test_invalid_lastfm_setting() {
        temp_env::with_var("LASTFM_MAX_RETRIES", Some("many"), || {
            let err = HostConfig::from_env().unwrap_err();
            assert_matches!(err, ExtensionError::Configuration(_));
        });
    }
}
