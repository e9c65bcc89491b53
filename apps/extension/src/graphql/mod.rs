//! GraphQL surface of the Last.fm extension
//!
//! - Object types for Last.fm artists, albums, tracks, tags and connections
//! - The `LastFMQuery` root with chart data
//! - Cross-link resolvers for host MusicBrainz entities
//! - The extension entry point and the standalone host schema

pub mod extension;
pub mod host;
pub mod query;
pub mod schema;
pub mod types;

pub use extension::LastfmExtension;
pub use host::{area_lastfm, artist_lastfm, recording_lastfm, release_lastfm, HostQuery};
pub use query::{LastFmChartQuery, LastFmCountry, LastFmQuery};
pub use schema::{build_schema, HostSchema};
