//! Last.fm API client for the MusicBrainz GraphQL extension
//!
//! This crate wraps the Last.fm web service endpoints the extension needs:
//! - Artist, album and track detail (`*.getInfo`)
//! - Similar artists and tracks
//! - Top albums, tags and tracks per entity
//! - Global and per-country charts
//!
//! Responses are decoded into lenient raw models. Upstream error code 6
//! surfaces as [`LastfmError::NotFound`] so callers can degrade to "absent"
//! without string matching.
//!
//! # Example
//!
//! ```rust,no_run
//! use brainz_lastfm_client::{LastfmClient, Params};
//! use brainz_shared_config::LastfmConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = LastfmClient::new(&LastfmConfig::from_env()?)?;
//!
//! let params = Params::from([("artist".to_string(), "Radiohead".to_string())]);
//! let similar = client.similar_artists(&params).await?;
//! for artist in similar.items {
//!     println!("{:?}: {:?}", artist.name, artist.match_score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `LASTFM_API_KEY`: API key for Last.fm (calls fail without it)
//! - `LASTFM_BASE_URL`: override the endpoint, mainly for tests

mod client;
mod error;
mod models;

pub use client::{ApiKeyStatus, LastfmClient, Params};
pub use error::{
    LastfmError, LastfmResult, INVALID_API_KEY_CODE, NOT_FOUND_CODE, RETRYABLE_CODES,
};
pub use models::{
    RawAlbum, RawArtist, RawArtistRef, RawImage, RawLink, RawLinks, RawPage, RawPageAttr, RawStats,
    RawTag, RawTrack, RawWiki,
};
