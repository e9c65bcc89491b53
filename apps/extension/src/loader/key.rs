//! Loader keys: the operation to invoke and its parameters

use std::fmt;

use brainz_lastfm_client::Params;

/// Every upstream operation the loader can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    ArtistInfo,
    SimilarArtists,
    ArtistTopAlbums,
    ArtistTopTags,
    ArtistTopTracks,
    AlbumInfo,
    AlbumTopTags,
    TrackInfo,
    TrackTopTags,
    SimilarTracks,
    ChartTopArtists,
    ChartTopTags,
    ChartTopTracks,
    GeoTopArtists,
    GeoTopTracks,
}

impl Method {
    pub const ALL: [Method; 15] = [
        Method::ArtistInfo,
        Method::SimilarArtists,
        Method::ArtistTopAlbums,
        Method::ArtistTopTags,
        Method::ArtistTopTracks,
        Method::AlbumInfo,
        Method::AlbumTopTags,
        Method::TrackInfo,
        Method::TrackTopTags,
        Method::SimilarTracks,
        Method::ChartTopArtists,
        Method::ChartTopTags,
        Method::ChartTopTracks,
        Method::GeoTopArtists,
        Method::GeoTopTracks,
    ];

    /// Name used as the cache-key prefix
    pub fn name(self) -> &'static str {
        match self {
            Self::ArtistInfo => "artistInfo",
            Self::SimilarArtists => "similarArtists",
            Self::ArtistTopAlbums => "artistTopAlbums",
            Self::ArtistTopTags => "artistTopTags",
            Self::ArtistTopTracks => "artistTopTracks",
            Self::AlbumInfo => "albumInfo",
            Self::AlbumTopTags => "albumTopTags",
            Self::TrackInfo => "trackInfo",
            Self::TrackTopTags => "trackTopTags",
            Self::SimilarTracks => "similarTracks",
            Self::ChartTopArtists => "chartTopArtists",
            Self::ChartTopTags => "chartTopTags",
            Self::ChartTopTracks => "chartTopTracks",
            Self::GeoTopArtists => "geoTopArtists",
            Self::GeoTopTracks => "geoTopTracks",
        }
    }

    /// The upstream `method` query parameter
    pub fn api_method(self) -> &'static str {
        match self {
            Self::ArtistInfo => "artist.getInfo",
            Self::SimilarArtists => "artist.getSimilar",
            Self::ArtistTopAlbums => "artist.getTopAlbums",
            Self::ArtistTopTags => "artist.getTopTags",
            Self::ArtistTopTracks => "artist.getTopTracks",
            Self::AlbumInfo => "album.getInfo",
            Self::AlbumTopTags => "album.getTopTags",
            Self::TrackInfo => "track.getInfo",
            Self::TrackTopTags => "track.getTopTags",
            Self::SimilarTracks => "track.getSimilar",
            Self::ChartTopArtists => "chart.getTopArtists",
            Self::ChartTopTags => "chart.getTopTags",
            Self::ChartTopTracks => "chart.getTopTracks",
            Self::GeoTopArtists => "geo.getTopArtists",
            Self::GeoTopTracks => "geo.getTopTracks",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `(method, params)` pair identifying one upstream request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderKey {
    method: Method,
    params: Params,
}

impl LoaderKey {
    pub fn new(method: Method, params: Params) -> Self {
        Self { method, params }
    }

    /// Build a key from string pairs
    pub fn with<K, V>(method: Method, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            method,
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Canonical cache key: `{method}/{form-encoded params}`
    ///
    /// Parameters are serialized in name order, so keys built with different
    /// insertion orders are equal.
    pub fn cache_key(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();
        format!("{}/{}", self.method.name(), query)
    }
}

impl fmt::Display for LoaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}
