//! Last.fm schema extension for a MusicBrainz GraphQL server
//!
//! Resolvers go through a batching, caching [`LastfmLoader`] that coalesces
//! identical upstream requests issued during one execution and keeps results
//! across executions. Entities returned by the upstream are lazily hydrated:
//! a field that needs data the current record lacks fetches the full record
//! through the loader.
//!
//! # Example
//!
//! ```ignore
//! use brainz_lastfm_extension::{build_schema, LastfmExtension};
//! use brainz_shared_config::LastfmConfig;
//!
//! let extension = LastfmExtension::new(&LastfmConfig::from_env()?)?;
//! let schema = build_schema(&extension);
//! ```

pub mod config;
pub mod connection;
pub mod country;
pub mod entity;
pub mod error;
pub mod graphql;
pub mod loader;
pub mod routes;

pub use config::HostConfig;
pub use error::{ExtensionError, ExtensionResult};
pub use graphql::{build_schema, HostSchema, LastfmExtension};
pub use loader::{LastfmLoader, LoadError, LoadResult, Loaded, LoaderKey, Method};
