use brainz_lastfm_client::{Params, RawArtist, RawArtistRef};

use super::{Entity, Fetchable, Image, Wiki};
use crate::loader::{Loaded, Method};

pub type Artist = Entity<ArtistData>;

#[derive(Debug, Clone, Default)]
pub struct ArtistData {
    pub mbid: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub images: Vec<Image>,
    pub listeners: Option<u64>,
    pub playcount: Option<u64>,
    pub bio: Option<Wiki>,
    /// Similarity to the seed artist, on similar-artist lists
    pub match_score: Option<f64>,
    /// Built from a bare name string; always worth fetching in full
    pub name_only: bool,
}

impl ArtistData {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    fn from_raw(raw: RawArtist) -> Self {
        let stats = raw.stats.unwrap_or_default();
        Self {
            mbid: raw.mbid,
            name: raw.name,
            url: raw.url,
            images: Image::from_raw_list(raw.image),
            listeners: raw.listeners.or(stats.listeners),
            playcount: raw.playcount.or(stats.playcount),
            bio: raw.bio.map(Wiki::from_raw),
            match_score: raw.match_score,
            name_only: false,
        }
    }
}

impl Fetchable for ArtistData {
    const INFO_METHOD: Method = Method::ArtistInfo;

    fn mbid(&self) -> Option<&str> {
        self.mbid.as_deref()
    }

    fn fetch_by_name_params(&self) -> Option<Params> {
        let name = self.name.as_ref()?;
        Some(Params::from([("artist".to_string(), name.clone())]))
    }

    fn from_loaded(loaded: Loaded) -> Result<Option<Artist>, Loaded> {
        match loaded {
            Loaded::Artist(artist) => Ok(artist),
            other => Err(other),
        }
    }
}

impl Entity<ArtistData> {
    pub(crate) fn from_raw(raw: RawArtist, method: Method) -> Self {
        Self::new(ArtistData::from_raw(raw), method)
    }

    /// Artists nested in albums and tracks arrive either as a name or an object
    pub(crate) fn from_ref(raw: RawArtistRef, method: Method) -> Self {
        match raw {
            RawArtistRef::Name(name) => Self::new(
                ArtistData {
                    name_only: true,
                    ..ArtistData::named(&name)
                },
                method,
            ),
            RawArtistRef::Detail(raw) => Self::from_raw(*raw, method),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainz_lastfm_client::RawStats;

    #[test]
    fn test_counts_fall_back_to_stats() {
        let raw = RawArtist {
            name: Some("Queen".to_string()),
            stats: Some(RawStats {
                listeners: Some(10),
                playcount: Some(20),
            }),
            ..RawArtist::default()
        };
        let artist = Artist::from_raw(raw, Method::ArtistInfo);
        assert_eq!(artist.listeners, Some(10));
        assert_eq!(artist.playcount, Some(20));
        assert!(artist.is_full_detail());
    }

    #[test]
    fn test_name_reference_is_name_only() {
        let artist = Artist::from_ref(RawArtistRef::Name("U2".to_string()), Method::AlbumInfo);
        assert!(artist.name_only);
        assert!(!artist.is_full_detail());
        assert_eq!(artist.fetch_method(), Method::AlbumInfo);
        assert_eq!(
            artist.fetch_params(),
            Some(Params::from([("artist".to_string(), "U2".to_string())]))
        );
    }

    #[test]
    fn test_no_mbid_or_name_cannot_fetch() {
        let artist = Artist::new(ArtistData::default(), Method::ChartTopArtists);
        assert!(artist.fetch_params().is_none());
    }
}
