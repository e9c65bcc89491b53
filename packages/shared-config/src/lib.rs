//! Shared configuration types for the Last.fm GraphQL extension
//!
//! Configuration is always built explicitly and handed to the client and
//! loader at construction. `from_env` constructors exist for binaries; nothing
//! in the workspace reads the environment implicitly.

mod error;
mod lastfm;

pub use error::{ConfigError, ConfigResult};
pub use lastfm::{LastfmConfig, DEFAULT_BASE_URL};

use std::env;

/// Helper function to get an optional environment variable with a default
pub fn get_env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Helper function to get an optional, non-empty environment variable
pub fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Helper function to parse an environment variable into a specific type
pub fn parse_env<T>(name: &str, default: T) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_env_fallback(&[name], default)
}

/// Parse the first variable in `names` that is set, falling back to `default`
///
/// Later names act as broader overrides, e.g. an extension-specific variable
/// followed by a host-wide one.
pub fn parse_env_fallback<T>(names: &[&str], default: T) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    for name in names {
        if let Some(val) = get_env_opt(name) {
            return val
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e)));
        }
    }
    Ok(default)
}
