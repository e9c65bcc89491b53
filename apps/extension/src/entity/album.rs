use brainz_lastfm_client::{Params, RawAlbum};

use super::{Artist, Entity, Fetchable, Image, Wiki};
use crate::loader::{Loaded, Method};

pub type Album = Entity<AlbumData>;

#[derive(Debug, Clone, Default)]
pub struct AlbumData {
    pub mbid: Option<String>,
    /// Endpoints disagree on `name` versus `title`; both are always filled
    pub name: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub images: Vec<Image>,
    pub listeners: Option<u64>,
    pub playcount: Option<u64>,
    pub wiki: Option<Wiki>,
    pub artist: Option<Artist>,
}

impl AlbumData {
    fn artist_name(&self) -> Option<&str> {
        self.artist.as_ref()?.name.as_deref()
    }
}

impl Fetchable for AlbumData {
    const INFO_METHOD: Method = Method::AlbumInfo;

    fn mbid(&self) -> Option<&str> {
        self.mbid.as_deref()
    }

    fn fetch_by_name_params(&self) -> Option<Params> {
        let name = self.name.as_ref()?;
        let artist = self.artist_name()?;
        Some(Params::from([
            ("album".to_string(), name.clone()),
            ("artist".to_string(), artist.to_string()),
        ]))
    }

    fn from_loaded(loaded: Loaded) -> Result<Option<Album>, Loaded> {
        match loaded {
            Loaded::Album(album) => Ok(album),
            other => Err(other),
        }
    }
}

impl Entity<AlbumData> {
    /// Shape an album, reusing `track_artist` when the album names the same
    /// artist as the track it was nested in
    pub(crate) fn from_raw(raw: RawAlbum, method: Method, track_artist: Option<&Artist>) -> Self {
        let artist = raw.artist.map(|artist| match track_artist {
            Some(track_artist)
                if artist.name().is_some() && artist.name() == track_artist.name.as_deref() =>
            {
                track_artist.clone()
            }
            _ => Artist::from_ref(artist, method),
        });

        let data = AlbumData {
            mbid: raw.mbid,
            name: raw.name.clone().or_else(|| raw.title.clone()),
            title: raw.title.or(raw.name),
            url: raw.url,
            images: Image::from_raw_list(raw.image),
            listeners: raw.listeners,
            playcount: raw.playcount,
            wiki: raw.wiki.map(Wiki::from_raw),
            artist,
        };
        Self::new(data, method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainz_lastfm_client::RawArtistRef;
    use crate::entity::ArtistData;

    #[test]
    fn test_name_and_title_mirror_each_other() {
        let raw = RawAlbum {
            title: Some("Boy".to_string()),
            ..RawAlbum::default()
        };
        let album = Album::from_raw(raw, Method::TrackInfo, None);
        assert_eq!(album.name.as_deref(), Some("Boy"));
        assert_eq!(album.title.as_deref(), Some("Boy"));

        let raw = RawAlbum {
            name: Some("War".to_string()),
            ..RawAlbum::default()
        };
        let album = Album::from_raw(raw, Method::ArtistTopAlbums, None);
        assert_eq!(album.title.as_deref(), Some("War"));
    }

    #[test]
    fn test_by_name_params_need_artist() {
        let raw = RawAlbum {
            name: Some("Boy".to_string()),
            ..RawAlbum::default()
        };
        let album = Album::from_raw(raw, Method::ArtistTopAlbums, None);
        assert!(album.fetch_params().is_none());

        let raw = RawAlbum {
            name: Some("Boy".to_string()),
            artist: Some(RawArtistRef::Name("U2".to_string())),
            ..RawAlbum::default()
        };
        let album = Album::from_raw(raw, Method::ArtistTopAlbums, None);
        let params = album.fetch_by_name_params().unwrap();
        assert_eq!(params["album"], "Boy");
        assert_eq!(params["artist"], "U2");
    }

    #[test]
    fn test_different_artist_name_is_not_reused() {
        let track_artist = Artist::new(ArtistData::named("U2"), Method::TrackInfo);
        let raw = RawAlbum {
            title: Some("Rattle and Hum".to_string()),
            artist: Some(RawArtistRef::Name("B.B. King".to_string())),
            ..RawAlbum::default()
        };
        let album = Album::from_raw(raw, Method::TrackInfo, Some(&track_artist));
        let artist = album.artist.as_ref().unwrap();
        assert!(!artist.ptr_eq(&track_artist));
        assert_eq!(artist.name.as_deref(), Some("B.B. King"));
    }
}
