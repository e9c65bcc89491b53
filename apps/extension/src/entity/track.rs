use brainz_lastfm_client::{Params, RawTrack};

use super::{Album, Artist, Entity, Fetchable, Wiki};
use crate::loader::{Loaded, Method};

pub type Track = Entity<TrackData>;

#[derive(Debug, Clone, Default)]
pub struct TrackData {
    pub mbid: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    /// Milliseconds; only trustworthy on `track.getInfo` records
    pub duration: Option<u64>,
    pub listeners: Option<u64>,
    pub playcount: Option<u64>,
    pub wiki: Option<Wiki>,
    pub match_score: Option<f64>,
    pub artist: Option<Artist>,
    pub album: Option<Album>,
}

impl Fetchable for TrackData {
    const INFO_METHOD: Method = Method::TrackInfo;

    fn mbid(&self) -> Option<&str> {
        self.mbid.as_deref()
    }

    fn fetch_by_name_params(&self) -> Option<Params> {
        let name = self.name.as_ref()?;
        let artist = self.artist.as_ref()?.name.as_ref()?;
        Some(Params::from([
            ("track".to_string(), name.clone()),
            ("artist".to_string(), artist.clone()),
        ]))
    }

    fn from_loaded(loaded: Loaded) -> Result<Option<Track>, Loaded> {
        match loaded {
            Loaded::Track(track) => Ok(track),
            other => Err(other),
        }
    }
}

impl Entity<TrackData> {
    pub(crate) fn from_raw(raw: RawTrack, method: Method) -> Self {
        let artist = raw.artist.map(|artist| Artist::from_ref(artist, method));
        let album = raw
            .album
            .map(|album| Album::from_raw(album, method, artist.as_ref()));

        let data = TrackData {
            mbid: raw.mbid,
            name: raw.name,
            url: raw.url,
            duration: raw.duration,
            listeners: raw.listeners,
            playcount: raw.playcount,
            wiki: raw.wiki.map(Wiki::from_raw),
            match_score: raw.match_score,
            artist,
            album,
        };
        Self::new(data, method)
    }
}
