use async_graphql::{Context, Object, Result};
use brainz_lastfm_client::Params;

use crate::connection::{Connection, ConnectionArgs, Paging};
use crate::entity::{Album, Tag};
use crate::error::GraphQLResultExt;
use crate::loader::{LoaderKey, Method};

use super::{
    loader, resolve_image, resolve_wiki, LastFmArtist, LastFmImageSize, LastFmTagConnection,
    LastFmWikiContent,
};

/// An album on Last.fm corresponding with a MusicBrainz release
#[derive(Debug, Clone)]
pub struct LastFmAlbum(Album);

impl LastFmAlbum {
    pub fn entity(&self) -> &Album {
        &self.0
    }
}

impl From<Album> for LastFmAlbum {
    fn from(album: Album) -> Self {
        Self(album)
    }
}

#[Object(name = "LastFMAlbum")]
impl LastFmAlbum {
    /// The MBID of the corresponding MusicBrainz release
    async fn mbid(&self) -> Option<&str> {
        self.0.mbid.as_deref()
    }

    /// The title of the album according to Last.fm
    async fn title(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// The URL for the album on Last.fm
    async fn url(&self) -> Option<&str> {
        self.0.url.as_deref()
    }

    /// An image of the cover artwork of the release
    async fn image(&self, ctx: &Context<'_>, size: Option<LastFmImageSize>) -> Result<Option<String>> {
        resolve_image(&self.0, loader(ctx)?, size, |data| &data.images)
            .await
            .gql()
    }

    /// The number of listeners recorded for the album
    async fn listener_count(&self, ctx: &Context<'_>) -> Result<Option<u64>> {
        self.0
            .field_or_fetch(loader(ctx)?, |data| data.listeners)
            .await
            .gql()
    }

    /// The number of plays recorded for the album
    async fn play_count(&self, ctx: &Context<'_>) -> Result<Option<u64>> {
        self.0
            .field_or_fetch(loader(ctx)?, |data| data.playcount)
            .await
            .gql()
    }

    /// Background information about the album, often available in several
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

    /// The artist who released the album, as known to Last.fm
    async fn artist(&self, ctx: &Context<'_>) -> Result<Option<LastFmArtist>> {
        let Some(artist) = self.0.artist.as_ref() else {
            return Ok(None);
        };
        if !artist.name_only {
            return Ok(Some(artist.clone().into()));
        }
        let full = artist.fetch_info(loader(ctx)?, Params::new()).await.gql()?;
        Ok(full.map(LastFmArtist::from))
    }

    /// A list of tags applied to the album by users, ordered by popularity
    ///
    /// `album.getTopTags` has no MBID lookup, so this needs the album and
    /// artist names.
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
            .load_tags(LoaderKey::new(Method::AlbumTopTags, params))
            .await
            .gql()?;
        Ok(Some(Connection::from_page(page, &args).into()))
    }
}
