use async_graphql::{Context, Object, Result};
use brainz_lastfm_client::Params;

use crate::connection::{Connection, ConnectionArgs, Paging};
use crate::entity::{Tag, Track};
use crate::error::GraphQLResultExt;
use crate::loader::{LoaderKey, Method};

use super::{
    loader, resolve_wiki, LastFmAlbum, LastFmArtist, LastFmTagConnection, LastFmTrackConnection,
    LastFmWikiContent,
};

/// A track on Last.fm corresponding with a MusicBrainz recording
#[derive(Debug, Clone)]
pub struct LastFmTrack(Track);

impl LastFmTrack {
    pub fn entity(&self) -> &Track {
        &self.0
    }
}

impl From<Track> for LastFmTrack {
    fn from(track: Track) -> Self {
        Self(track)
    }
}

#[Object(name = "LastFMTrack")]
impl LastFmTrack {
    /// The MBID of the corresponding MusicBrainz recording
    async fn mbid(&self) -> Option<&str> {
        self.0.mbid.as_deref()
    }

    /// The title of the track according to Last.fm
    async fn title(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// The URL for the track on Last.fm
    async fn url(&self) -> Option<&str> {
        self.0.url.as_deref()
    }

    /// The length of the track in milliseconds
    ///
    /// Lists report zero or seconds here, so only `track.getInfo` is trusted.
    async fn duration(&self, ctx: &Context<'_>) -> Result<Option<u64>> {
        if self.0.fetch_method() == Method::TrackInfo {
            return Ok(self.0.duration);
        }
        let full = self.0.fetch_info(loader(ctx)?, Params::new()).await.gql()?;
        Ok(full.and_then(|full| full.duration))
    }

    /// The number of listeners recorded for the track
    async fn listener_count(&self, ctx: &Context<'_>) -> Result<Option<u64>> {
        self.0
            .field_or_fetch(loader(ctx)?, |data| data.listeners)
            .await
            .gql()
    }

    /// The number of plays recorded for the track
    async fn play_count(&self, ctx: &Context<'_>) -> Result<Option<u64>> {
        self.0
            .field_or_fetch(loader(ctx)?, |data| data.playcount)
            .await
            .gql()
    }

    /// Historical information about the track, often available in several
    /// languages
    async fn description(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The two-letter code for the language in which to retrieve the description")]
        lang: Option<String>,
    ) -> Result<Option<LastFmWikiContent>> {
        resolve_wiki(&self.0, loader(ctx)?, lang, |data| data.wiki.as_ref())
            .await
            .gql()
    }

    /// The artist who released the track, as known to Last.fm
    async fn artist(&self) -> Option<LastFmArtist> {
        self.0.artist.clone().map(LastFmArtist::from)
    }

    /// The album on which the track appears, as known to Last.fm
    async fn album(&self, ctx: &Context<'_>) -> Result<Option<LastFmAlbum>> {
        if let Some(album) = &self.0.album {
            return Ok(Some(album.clone().into()));
        }
        if self.0.fetch_method() == Method::TrackInfo {
            return Ok(None);
        }
        let full = self.0.fetch_info(loader(ctx)?, Params::new()).await.gql()?;
        Ok(full
            .and_then(|full| full.album.clone())
            .map(LastFmAlbum::from))
    }

    /// A list of similar tracks
    async fn similar_tracks(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<Option<LastFmTrackConnection>> {
        let Some(base) = self.0.fetch_params() else {
            return Ok(None);
        };
        let args = ConnectionArgs::new(first, after.as_deref()).gql()?;
        let Some(params) = args.upstream_params(base, Paging::Complete).gql()? else {
            return Ok(Some(Connection::<Track>::empty().into()));
        };
        let page = loader(ctx)?
            .load_tracks(LoaderKey::new(Method::SimilarTracks, params))
            .await
            .gql()?;
        Ok(Some(Connection::from_page(page, &args).into()))
    }

    /// A list of tags applied to the track by users, ordered by popularity
    async fn top_tags(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<Option<LastFmTagConnection>> {
        let Some(base) = self.0.fetch_by_name_params() else {
            return Ok(None);
        };
        let args = ConnectionArgs::new(first, after.as_deref()).gql()?;
        let Some(params) = args.upstream_params(base, Paging::Pages).gql()? else {
            return Ok(Some(Connection::<Tag>::empty().into()));
        };
        let page = loader(ctx)?
            .load_tags(LoaderKey::new(Method::TrackTopTags, params))
            .await
            .gql()?;
        Ok(Some(Connection::from_page(page, &args).into()))
    }

    /// The track similarity score (0-1), if this track came from a
    /// similar-track list
    async fn match_score(&self) -> Option<f64> {
        self.0.match_score
    }
}
