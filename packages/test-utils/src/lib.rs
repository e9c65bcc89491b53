//! Shared test utilities for the brainz-lastfm workspace
//!
//! This crate provides a mock Last.fm web service so client, loader and
//! schema tests run without network access or an API key.
//!
//! # Mock Services
//!
//! - [`MockLastfmServer`] - Mock Last.fm endpoint, dispatching on the `method` query parameter
//!
//! # Fixtures
//!
//! - [`ArtistFixture`], [`AlbumFixture`], [`TrackFixture`] - entity payloads
//! - [`fixtures`] - envelope builders for detail and list responses
//!
//! # Example
//!
//! ```rust,ignore
//! use brainz_test_utils::{fixtures, ArtistFixture, MockLastfmServer};
//!
//! #[tokio::test]
//! async fn test_with_mock() {
//!     let server = MockLastfmServer::start().await;
//!     server
//!         .mock_method("artist.getInfo", fixtures::artist_info(&ArtistFixture::new("Queen")))
//!         .await;
//!
//!     // Use server.url() as the client's base URL
//! }
//! ```

mod lastfm;

pub use lastfm::{fixtures, AlbumFixture, ArtistFixture, MockLastfmServer, TagFixture, TrackFixture};
