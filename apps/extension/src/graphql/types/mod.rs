//! GraphQL object types for Last.fm data
//!
//! Each type wraps an entity handle. Fields read what the handle already
//! carries and go through the loader only when a value is missing.

mod album;
mod artist;
mod connection;
mod media;
mod tag;
mod track;

pub use album::LastFmAlbum;
pub use artist::LastFmArtist;
pub use connection::{
    LastFmAlbumConnection, LastFmAlbumEdge, LastFmArtistConnection, LastFmArtistEdge,
    LastFmTagConnection, LastFmTagEdge, LastFmTrackConnection, LastFmTrackEdge,
};
pub use media::{LastFmImageSize, LastFmWikiContent};
pub use tag::LastFmTag;
pub use track::LastFmTrack;

use async_graphql::Context;
use brainz_lastfm_client::Params;

use crate::entity::{Entity, Fetchable, Image, Wiki};
use crate::loader::{LastfmLoader, LoadResult};

/// The loader installed into the schema by the extension
pub(crate) fn loader<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a LastfmLoader> {
    ctx.data::<LastfmLoader>()
}

/// Resolve an image URL, fetching the full record when no images are known
pub(crate) async fn resolve_image<T: Fetchable>(
    entity: &Entity<T>,
    loader: &LastfmLoader,
    size: Option<LastFmImageSize>,
    images: impl Fn(&T) -> &[Image],
) -> LoadResult<Option<String>> {
    let size = size.map(LastFmImageSize::as_str);
    let select = |data: &T| Image::select(images(data), size).map(str::to_string);

    if !images(entity.data()).is_empty() {
        return Ok(select(entity.data()));
    }
    let full = entity.fetch_info(loader, Params::new()).await?;
    Ok(full.and_then(|full| select(full.data())))
}

/// Resolve wiki text in the requested language
///
/// The language a nested wiki was fetched in is unknown, so this always goes
/// through the loader, with `lang` lowercased.
pub(crate) async fn resolve_wiki<T: Fetchable>(
    entity: &Entity<T>,
    loader: &LastfmLoader,
    lang: Option<String>,
    wiki: impl Fn(&T) -> Option<&Wiki>,
) -> LoadResult<Option<LastFmWikiContent>> {
    let mut extra = Params::new();
    if let Some(lang) = lang {
        extra.insert("lang".to_string(), lang.to_lowercase());
    }
    let full = entity.fetch_info(loader, extra).await?;
    Ok(full.and_then(|full| wiki(full.data()).map(LastFmWikiContent::from_wiki)))
}
