use async_graphql::{Context, Object, Result};

use crate::connection::{Connection, ConnectionArgs, Paging};
use crate::entity::{Album, Artist, Tag, Track};
use crate::error::GraphQLResultExt;
use crate::loader::{LoaderKey, Method};

use super::{
    loader, resolve_image, resolve_wiki, LastFmAlbumConnection, LastFmArtistConnection,
    LastFmImageSize, LastFmTagConnection, LastFmTrackConnection, LastFmWikiContent,
};

/// An artist on Last.fm
#[derive(Debug, Clone)]
pub struct LastFmArtist(Artist);

impl LastFmArtist {
    pub fn entity(&self) -> &Artist {
        &self.0
    }
}

impl From<Artist> for LastFmArtist {
    fn from(artist: Artist) -> Self {
        Self(artist)
    }
}

#[Object(name = "LastFMArtist")]
impl LastFmArtist {
    /// The MBID of the corresponding MusicBrainz artist
    async fn mbid(&self) -> Option<&str> {
        self.0.mbid.as_deref()
    }

    /// The name of the artist according to Last.fm
    async fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// The URL for the artist on Last.fm
    async fn url(&self) -> Option<&str> {
        self.0.url.as_deref()
    }

    /// An image of the artist
    async fn image(&self, ctx: &Context<'_>, size: Option<LastFmImageSize>) -> Result<Option<String>> {
        resolve_image(&self.0, loader(ctx)?, size, |data| &data.images)
            .await
            .gql()
    }

    /// The number of listeners recorded for the artist
    async fn listener_count(&self, ctx: &Context<'_>) -> Result<Option<u64>> {
        self.0
            .field_or_fetch(loader(ctx)?, |data| data.listeners)
            .await
            .gql()
    }

    /// The number of plays recorded for the artist
    async fn play_count(&self, ctx: &Context<'_>) -> Result<Option<u64>> {
        self.0
            .field_or_fetch(loader(ctx)?, |data| data.playcount)
            .await
            .gql()
    }

    /// A list of similar artists
    ///
    /// The upstream cannot paginate this list, so it is fetched whole and
    /// sliced here.
    async fn similar_artists(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<Option<LastFmArtistConnection>> {
        let Some(base) = self.0.fetch_params() else {
            return Ok(None);
        };
        let args = ConnectionArgs::new(first, after.as_deref()).gql()?;
        let Some(params) = args.upstream_params(base, Paging::Complete).gql()? else {
            return Ok(Some(Connection::<Artist>::empty().into()));
        };
        let page = loader(ctx)?
            .load_artists(LoaderKey::new(Method::SimilarArtists, params))
            .await
            .gql()?;
        Ok(Some(Connection::from_page(page, &args).into()))
    }

    /// A list of the artist's most popular albums
    async fn top_albums(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<Option<LastFmAlbumConnection>> {
        let Some(base) = self.0.fetch_params() else {
            return Ok(None);
        };
        let args = ConnectionArgs::new(first, after.as_deref()).gql()?;
        let Some(params) = args.upstream_params(base, Paging::Pages).gql()? else {
            return Ok(Some(Connection::<Album>::empty().into()));
        };
        let page = loader(ctx)?
            .load_albums(LoaderKey::new(Method::ArtistTopAlbums, params))
            .await
            .gql()?;
        Ok(Some(Connection::from_page(page, &args).into()))
    }

    /// A list of tags applied to the artist by users, ordered by popularity
    async fn top_tags(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<Option<LastFmTagConnection>> {
        let Some(base) = self.0.fetch_params() else {
            return Ok(None);
        };
        let args = ConnectionArgs::new(first, after.as_deref()).gql()?;
        let Some(params) = args.upstream_params(base, Paging::Pages).gql()? else {
            return Ok(Some(Connection::<Tag>::empty().into()));
        };
        let page = loader(ctx)?
            .load_tags(LoaderKey::new(Method::ArtistTopTags, params))
            .await
            .gql()?;
        Ok(Some(Connection::from_page(page, &args).into()))
    }

    /// A list of the artist's most popular tracks
    async fn top_tracks(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<Option<LastFmTrackConnection>> {
        let Some(base) = self.0.fetch_params() else {
            return Ok(None);
        };
        let args = ConnectionArgs::new(first, after.as_deref()).gql()?;
        let Some(params) = args.upstream_params(base, Paging::Pages).gql()? else {
            return Ok(Some(Connection::<Track>::empty().into()));
        };
        let page = loader(ctx)?
            .load_tracks(LoaderKey::new(Method::ArtistTopTracks, params))
            .await
            .gql()?;
        Ok(Some(Connection::from_page(page, &args).into()))
    }

    /// A biography of the artist, often available in several languages
    async fn biography(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The two-letter code for the language in which to retrieve the biography")]
        lang: Option<String>,
    ) -> Result<Option<LastFmWikiContent>> {
        resolve_wiki(&self.0, loader(ctx)?, lang, |data| data.bio.as_ref())
            .await
            .gql()
    }
}
