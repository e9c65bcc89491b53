//! Relay connections for each Last.fm list shape

use async_graphql::Object;

use crate::connection::{Connection, Edge, PageInfo};
use crate::entity::{Album, Artist, Tag, Track};

use super::{LastFmAlbum, LastFmArtist, LastFmTag, LastFmTrack};

fn total_count<T>(connection: &Connection<T>) -> Option<i64> {
    connection.total_count.map(|n| n as i64)
}

/// A connection to a list of Last.fm artists
pub struct LastFmArtistConnection(Connection<Artist>);

impl From<Connection<Artist>> for LastFmArtistConnection {
    fn from(connection: Connection<Artist>) -> Self {
        Self(connection)
    }
}

#[Object(name = "LastFMArtistConnection")]
impl LastFmArtistConnection {
    /// Information to aid in pagination
    async fn page_info(&self) -> &PageInfo {
        &self.0.page_info
    }

    /// A list of edges
    async fn edges(&self) -> Vec<LastFmArtistEdge> {
        self.0.edges.iter().cloned().map(LastFmArtistEdge).collect()
    }

    /// A list of nodes in the connection, without the edges
    async fn nodes(&self) -> Vec<LastFmArtist> {
        self.0
            .edges
            .iter()
            .map(|edge| LastFmArtist::from(edge.node.clone()))
            .collect()
    }

    /// The total number of items in the full list
    async fn total_count(&self) -> Option<i64> {
        total_count(&self.0)
    }
}

/// An artist in a list, with its similarity score on similar-artist lists
pub struct LastFmArtistEdge(Edge<Artist>);

#[Object(name = "LastFMArtistEdge")]
impl LastFmArtistEdge {
    async fn node(&self) -> LastFmArtist {
        self.0.node.clone().into()
    }

    /// A cursor for use in pagination
    async fn cursor(&self) -> &str {
        &self.0.cursor
    }

    /// The artist similarity score (0-1), if this is a similar-artist list
    async fn match_score(&self) -> Option<f64> {
        self.0.node.match_score
    }
}

/// A connection to a list of Last.fm albums
pub struct LastFmAlbumConnection(Connection<Album>);

impl From<Connection<Album>> for LastFmAlbumConnection {
    fn from(connection: Connection<Album>) -> Self {
        Self(connection)
    }
}

#[Object(name = "LastFMAlbumConnection")]
impl LastFmAlbumConnection {
    async fn page_info(&self) -> &PageInfo {
        &self.0.page_info
    }

    async fn edges(&self) -> Vec<LastFmAlbumEdge> {
        self.0.edges.iter().cloned().map(LastFmAlbumEdge).collect()
    }

    async fn nodes(&self) -> Vec<LastFmAlbum> {
        self.0
            .edges
            .iter()
            .map(|edge| LastFmAlbum::from(edge.node.clone()))
            .collect()
    }

    async fn total_count(&self) -> Option<i64> {
        total_count(&self.0)
    }
}

pub struct LastFmAlbumEdge(Edge<Album>);

#[Object(name = "LastFMAlbumEdge")]
impl LastFmAlbumEdge {
    async fn node(&self) -> LastFmAlbum {
        self.0.node.clone().into()
    }

    async fn cursor(&self) -> &str {
        &self.0.cursor
    }
}

/// A connection to a list of Last.fm tracks
pub struct LastFmTrackConnection(Connection<Track>);

impl From<Connection<Track>> for LastFmTrackConnection {
    fn from(connection: Connection<Track>) -> Self {
        Self(connection)
    }
}

#[Object(name = "LastFMTrackConnection")]
impl LastFmTrackConnection {
    async fn page_info(&self) -> &PageInfo {
        &self.0.page_info
    }

    async fn edges(&self) -> Vec<LastFmTrackEdge> {
        self.0.edges.iter().cloned().map(LastFmTrackEdge).collect()
    }

    async fn nodes(&self) -> Vec<LastFmTrack> {
        self.0
            .edges
            .iter()
            .map(|edge| LastFmTrack::from(edge.node.clone()))
            .collect()
    }

    async fn total_count(&self) -> Option<i64> {
        total_count(&self.0)
    }
}

pub struct LastFmTrackEdge(Edge<Track>);

#[Object(name = "LastFMTrackEdge")]
impl LastFmTrackEdge {
    async fn node(&self) -> LastFmTrack {
        self.0.node.clone().into()
    }

    async fn cursor(&self) -> &str {
        &self.0.cursor
    }

    /// The track similarity score (0-1), if this is a similar-track list
    async fn match_score(&self) -> Option<f64> {
        self.0.node.match_score
    }
}

/// A connection to a list of Last.fm tags
pub struct LastFmTagConnection(Connection<Tag>);

impl From<Connection<Tag>> for LastFmTagConnection {
    fn from(connection: Connection<Tag>) -> Self {
        Self(connection)
    }
}

#[Object(name = "LastFMTagConnection")]
impl LastFmTagConnection {
    async fn page_info(&self) -> &PageInfo {
        &self.0.page_info
    }

    async fn edges(&self) -> Vec<LastFmTagEdge> {
        self.0.edges.iter().cloned().map(LastFmTagEdge).collect()
    }

    async fn nodes(&self) -> Vec<LastFmTag> {
        self.0
            .edges
            .iter()
            .map(|edge| LastFmTag::from(edge.node.clone()))
            .collect()
    }

    async fn total_count(&self) -> Option<i64> {
        total_count(&self.0)
    }
}

pub struct LastFmTagEdge(Edge<Tag>);

#[Object(name = "LastFMTagEdge")]
impl LastFmTagEdge {
    async fn node(&self) -> LastFmTag {
        self.0.node.clone().into()
    }

    async fn cursor(&self) -> &str {
        &self.0.cursor
    }

    /// The number of times the tag has been applied to the item
    async fn tag_count(&self) -> Option<i64> {
        self.0.node.count
    }
}
