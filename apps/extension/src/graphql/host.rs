//! Cross-links from host MusicBrainz entities to Last.fm
//!
//! A host schema adds a `lastFM` field to its Artist, Release, Recording and
//! Area types and resolves it with these functions. The MusicBrainz-shaped
//! types below are the standalone host's minimal versions of those types.

use async_graphql::{Context, Object, Result};

use crate::entity::{AlbumData, ArtistData, TrackData};
use crate::error::{ExtensionResult, GraphQLResultExt};
use crate::loader::{LastfmLoader, LoaderKey, Method};

use super::query::{LastFmCountry, LastFmQuery};
use super::types::{loader, LastFmAlbum, LastFmArtist, LastFmTrack};

/// Last.fm data for a MusicBrainz artist
pub async fn artist_lastfm(loader: &LastfmLoader, mbid: &str) -> ExtensionResult<Option<LastFmArtist>> {
    let artist = loader
        .load_entity::<ArtistData>(LoaderKey::with(Method::ArtistInfo, [("mbid", mbid)]))
        .await?;
    Ok(artist.map(LastFmArtist::from))
}

/// Last.fm album data for a MusicBrainz release
pub async fn release_lastfm(loader: &LastfmLoader, mbid: &str) -> ExtensionResult<Option<LastFmAlbum>> {
    let album = loader
        .load_entity::<AlbumData>(LoaderKey::with(Method::AlbumInfo, [("mbid", mbid)]))
        .await?;
    Ok(album.map(LastFmAlbum::from))
}

/// Last.fm track data for a MusicBrainz recording
pub async fn recording_lastfm(loader: &LastfmLoader, mbid: &str) -> ExtensionResult<Option<LastFmTrack>> {
    let track = loader
        .load_entity::<TrackData>(LoaderKey::with(Method::TrackInfo, [("mbid", mbid)]))
        .await?;
    Ok(track.map(LastFmTrack::from))
}

/// Last.fm chart data for a MusicBrainz area, if it is a country
pub fn area_lastfm(area_type: Option<&str>, name: &str, iso_codes: &[String]) -> Option<LastFmCountry> {
    LastFmCountry::from_area(area_type, name, iso_codes)
}

/// Root query of the standalone host
#[derive(Debug, Default, Clone, Copy)]
pub struct HostQuery;

#[Object]
impl HostQuery {
    /// A query for data on Last.fm that is not connected to any particular
    /// MusicBrainz entity
    #[graphql(name = "lastFM")]
    async fn last_fm(&self) -> LastFmQuery {
        LastFmQuery
    }

    /// Look up MusicBrainz entities by MBID
    async fn lookup(&self) -> LookupQuery {
        LookupQuery
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LookupQuery;

#[Object]
impl LookupQuery {
    async fn artist(&self, mbid: String) -> HostArtist {
        HostArtist { mbid }
    }

    async fn release(&self, mbid: String) -> HostRelease {
        HostRelease { mbid }
    }

    async fn recording(&self, mbid: String) -> HostRecording {
        HostRecording { mbid }
    }

    /// An area, described by what MusicBrainz records for it
    async fn area(
        &self,
        name: String,
        #[graphql(name = "type")] area_type: Option<String>,
        #[graphql(default)] iso_codes: Vec<String>,
    ) -> HostArea {
        HostArea {
            name,
            area_type,
            iso_codes,
        }
    }
}

pub struct HostArtist {
    mbid: String,
}

#[Object(name = "Artist")]
impl HostArtist {
    async fn mbid(&self) -> &str {
        &self.mbid
    }

    /// Data about the artist from Last.fm
    #[graphql(name = "lastFM")]
    async fn last_fm(&self, ctx: &Context<'_>) -> Result<Option<LastFmArtist>> {
        artist_lastfm(loader(ctx)?, &self.mbid).await.gql()
    }
}

pub struct HostRelease {
    mbid: String,
}

#[Object(name = "Release")]
impl HostRelease {
    async fn mbid(&self) -> &str {
        &self.mbid
    }

    /// Data about the release from Last.fm
    #[graphql(name = "lastFM")]
    async fn last_fm(&self, ctx: &Context<'_>) -> Result<Option<LastFmAlbum>> {
        release_lastfm(loader(ctx)?, &self.mbid).await.gql()
    }
}

pub struct HostRecording {
    mbid: String,
}

#[Object(name = "Recording")]
impl HostRecording {
    async fn mbid(&self) -> &str {
        &self.mbid
    }

    /// Data about the recording from Last.fm
    #[graphql(name = "lastFM")]
    async fn last_fm(&self, ctx: &Context<'_>) -> Result<Option<LastFmTrack>> {
        recording_lastfm(loader(ctx)?, &self.mbid).await.gql()
    }
}

pub struct HostArea {
    name: String,
    area_type: Option<String>,
    iso_codes: Vec<String>,
}

#[Object(name = "Area")]
impl HostArea {
    async fn name(&self) -> &str {
        &self.name
    }

    #[graphql(name = "type")]
    async fn area_type(&self) -> Option<&str> {
        self.area_type.as_deref()
    }

    /// ISO 3166-1 codes of the area
    async fn iso_codes(&self) -> &[String] {
        &self.iso_codes
    }

    /// Chart data for this area on Last.fm, if it is a country
    #[graphql(name = "lastFM")]
    async fn last_fm(&self) -> Option<LastFmCountry> {
        area_lastfm(self.area_type.as_deref(), &self.name, &self.iso_codes)
    }
}
