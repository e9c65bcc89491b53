//! Lazily hydrated Last.fm entities
//!
//! An entity is built from whatever fragment an upstream response carried.
//! It is either a [`Entity::Stub`], remembering which method produced it, or
//! [`Entity::Hydrated`] when it came from the entity's own detail method.
//! Entities are immutable; enriching one means fetching a replacement through
//! the loader with [`Entity::fetch_info`].

mod album;
mod artist;
mod media;
mod tag;
mod track;

pub use album::{Album, AlbumData};
pub use artist::{Artist, ArtistData};
pub use media::{Image, Wiki};
pub use tag::Tag;
pub use track::{Track, TrackData};

use std::ops::Deref;
use std::sync::Arc;

use brainz_lastfm_client::Params;

use crate::loader::{LastfmLoader, LoadResult, Loaded, LoaderKey, Method};

/// A partially or fully populated entity
pub enum Entity<T> {
    Stub { data: Arc<T>, source: Method },
    Hydrated(Arc<T>),
}

impl<T> Clone for Entity<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Stub { data, source } => Self::Stub {
                data: Arc::clone(data),
                source: *source,
            },
            Self::Hydrated(data) => Self::Hydrated(Arc::clone(data)),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Entity<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stub { data, source } => f
                .debug_struct("Stub")
                .field("source", source)
                .field("data", data)
                .finish(),
            Self::Hydrated(data) => f.debug_tuple("Hydrated").field(data).finish(),
        }
    }
}

impl<T> Deref for Entity<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.data()
    }
}

impl<T> Entity<T> {
    pub fn data(&self) -> &T {
        self.shared()
    }

    pub fn shared(&self) -> &Arc<T> {
        match self {
            Self::Stub { data, .. } | Self::Hydrated(data) => data,
        }
    }

    /// Whether this record came from the entity's own detail method
    pub fn is_full_detail(&self) -> bool {
        matches!(self, Self::Hydrated(_))
    }

    /// Whether both handles point at the same underlying record
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self.shared(), other.shared())
    }
}

/// An entity kind that can be fetched in full from the upstream
pub trait Fetchable: Sized {
    /// Detail method that yields a full record
    const INFO_METHOD: Method;

    fn mbid(&self) -> Option<&str>;

    /// Name-based lookup parameters, if the record has enough to build them
    fn fetch_by_name_params(&self) -> Option<Params>;

    /// Lookup parameters, preferring the MBID over names
    fn fetch_params(&self) -> Option<Params> {
        match self.mbid() {
            Some(mbid) => Some(Params::from([("mbid".to_string(), mbid.to_string())])),
            None => self.fetch_by_name_params(),
        }
    }

    /// Extract this kind from a detail result; any other shape is handed back
    fn from_loaded(loaded: Loaded) -> Result<Option<Entity<Self>>, Loaded>;
}

impl<T: Fetchable> Entity<T> {
    /// Wrap freshly shaped data; records from the detail method are hydrated
    pub(crate) fn new(data: T, source: Method) -> Self {
        if source == T::INFO_METHOD {
            Self::Hydrated(Arc::new(data))
        } else {
            Self::Stub {
                data: Arc::new(data),
                source,
            }
        }
    }

    /// The method that produced this record
    pub fn fetch_method(&self) -> Method {
        match self {
            Self::Stub { source, .. } => *source,
            Self::Hydrated(_) => T::INFO_METHOD,
        }
    }

    pub fn fetch_params(&self) -> Option<Params> {
        self.data().fetch_params()
    }

    pub fn fetch_by_name_params(&self) -> Option<Params> {
        self.data().fetch_by_name_params()
    }

    /// Fetch the full record through the loader
    ///
    /// The lookup parameters take precedence over `extra` on conflicting
    /// names. When no lookup parameters can be built, or this is already a
    /// full record and `extra` adds nothing, the entity itself is returned.
    /// `Ok(None)` means the upstream has no such entity.
    pub async fn fetch_info(&self, loader: &LastfmLoader, extra: Params) -> LoadResult<Option<Self>> {
        if self.is_full_detail() && extra.is_empty() {
            return Ok(Some(self.clone()));
        }
        let Some(params) = self.fetch_params() else {
            return Ok(Some(self.clone()));
        };

        let mut merged = extra;
        merged.extend(params);
        loader
            .load_entity(LoaderKey::new(T::INFO_METHOD, merged))
            .await
    }

    /// Read a field, fetching the full record only when it is missing here
    pub async fn field_or_fetch<R>(
        &self,
        loader: &LastfmLoader,
        field: impl Fn(&T) -> Option<R>,
    ) -> LoadResult<Option<R>> {
        if let Some(value) = field(self.data()) {
            return Ok(Some(value));
        }
        Ok(self
            .fetch_info(loader, Params::new())
            .await?
            .and_then(|full| field(full.data())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_method_hydrates() {
        let full = Artist::new(ArtistData::named("Queen"), Method::ArtistInfo);
        let stub = Artist::new(ArtistData::named("Queen"), Method::SimilarArtists);

        assert!(full.is_full_detail());
        assert_eq!(full.fetch_method(), Method::ArtistInfo);
        assert!(!stub.is_full_detail());
        assert_eq!(stub.fetch_method(), Method::SimilarArtists);
    }

    #[test]
    fn test_clone_shares_data() {
        let stub = Artist::new(ArtistData::named("Queen"), Method::ChartTopArtists);
        let copy = stub.clone();
        assert!(stub.ptr_eq(&copy));

        let other = Artist::new(ArtistData::named("Queen"), Method::ChartTopArtists);
        assert!(!stub.ptr_eq(&other));
    }

    #[test]
    fn test_mbid_takes_precedence_over_name() {
        let data = ArtistData {
            mbid: Some("0383dadf-2a4e-4d10-a46a-e9e041da8eb3".to_string()),
            ..ArtistData::named("Queen")
        };
        let params = data.fetch_params().unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(
            params.get("mbid").map(String::as_str),
            Some("0383dadf-2a4e-4d10-a46a-e9e041da8eb3")
        );
    }
}
