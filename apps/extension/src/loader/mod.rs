//! Batching, caching loader in front of the Last.fm client
//!
//! Resolvers call [`LastfmLoader::load`] with a `(method, params)` key. Loads
//! for the same canonical key that arrive before a batch is dispatched share
//! one upstream request; every distinct key in a batch is fetched
//! concurrently and completes independently of the others. Only successful
//! results are cached.
//!
//! Unlike `async_graphql::dataloader::DataLoader`, a failure here belongs to
//! the single key that produced it, so one bad request never fails the rest
//! of its batch.

mod cache;
mod key;
mod value;

pub use key::{LoaderKey, Method};
pub use value::{Loaded, Page, PageAttrs};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use brainz_lastfm_client::{LastfmClient, LastfmError, LastfmResult, RawPage};
use brainz_shared_config::LastfmConfig;
use futures_util::future::{join_all, BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::entity::{Album, Artist, Entity, Fetchable, Tag, Track};
use cache::ResponseCache;

/// Loader failure, shared by every caller coalesced onto the failing key
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    /// The upstream call failed
    #[error(transparent)]
    Upstream(Arc<LastfmError>),

    /// The dispatch for this key ended without reporting a result
    #[error("load of `{0}` ended without a result")]
    Dropped(String),

    /// A method produced a result of the wrong shape for its caller
    #[error("`{method}` produced an unexpected {found} result")]
    Shape { method: Method, found: &'static str },
}

impl LoadError {
    /// The upstream error, if this failure came from the client
    pub fn upstream(&self) -> Option<&LastfmError> {
        match self {
            Self::Upstream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LastfmError> for LoadError {
    fn from(err: LastfmError) -> Self {
        Self::Upstream(Arc::new(err))
    }
}

/// Result type for loader operations
pub type LoadResult<T> = Result<T, LoadError>;

type SharedLoad = Shared<BoxFuture<'static, LoadResult<Loaded>>>;

struct Queued {
    key: LoaderKey,
    cache_key: String,
    sender: oneshot::Sender<LoadResult<Loaded>>,
}

#[derive(Default)]
struct Batch {
    queued: Vec<Queued>,
    in_flight: HashMap<String, SharedLoad>,
    scheduled: bool,
}

struct LoaderInner {
    client: LastfmClient,
    cache: Mutex<ResponseCache>,
    batch: Mutex<Batch>,
    delay: Duration,
}

enum Lookup {
    Cached(Loaded),
    Pending(SharedLoad),
}

/// Batching, caching loader
///
/// Clones share the cache and the pending batch. One loader is meant to live
/// as long as the schema, so cached results carry across executions.
#[derive(Clone)]
pub struct LastfmLoader {
    inner: Arc<LoaderInner>,
}

impl LastfmLoader {
    /// Create a loader using the cache and batching settings from `config`
    pub fn new(client: LastfmClient, config: &LastfmConfig) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                client,
                cache: Mutex::new(ResponseCache::new(config.cache_size, config.cache_ttl())),
                batch: Mutex::new(Batch::default()),
                delay: config.batch_delay(),
            }),
        }
    }

    /// Load a key, sharing any cached or in-flight result for the same
    /// canonical key
    pub async fn load(&self, key: LoaderKey) -> LoadResult<Loaded> {
        match self.lookup(key) {
            Lookup::Cached(value) => Ok(value),
            Lookup::Pending(pending) => pending.await,
        }
    }

    /// Load a detail key whose method yields the entity kind `T`
    pub async fn load_entity<T: Fetchable>(&self, key: LoaderKey) -> LoadResult<Option<Entity<T>>> {
        let method = key.method();
        T::from_loaded(self.load(key).await?).map_err(|other| LoadError::Shape {
            method,
            found: other.kind(),
        })
    }

    /// Load a key whose method yields an artist list
    pub async fn load_artists(&self, key: LoaderKey) -> LoadResult<Page<Artist>> {
        let method = key.method();
        match self.load(key).await? {
            Loaded::Artists(page) => Ok(page),
            other => Err(LoadError::Shape {
                method,
                found: other.kind(),
            }),
        }
    }

    /// Load a key whose method yields an album list
    pub async fn load_albums(&self, key: LoaderKey) -> LoadResult<Page<Album>> {
        let method = key.method();
        match self.load(key).await? {
            Loaded::Albums(page) => Ok(page),
            other => Err(LoadError::Shape {
                method,
                found: other.kind(),
            }),
        }
    }

    /// Load a key whose method yields a track list
    pub async fn load_tracks(&self, key: LoaderKey) -> LoadResult<Page<Track>> {
        let method = key.method();
        match self.load(key).await? {
            Loaded::Tracks(page) => Ok(page),
            other => Err(LoadError::Shape {
                method,
                found: other.kind(),
            }),
        }
    }

    /// Load a key whose method yields a tag list
    pub async fn load_tags(&self, key: LoaderKey) -> LoadResult<Page<Tag>> {
        let method = key.method();
        match self.load(key).await? {
            Loaded::Tags(page) => Ok(page),
            other => Err(LoadError::Shape {
                method,
                found: other.kind(),
            }),
        }
    }

    /// The client this loader dispatches through
    pub fn client(&self) -> &LastfmClient {
        &self.inner.client
    }

    /// Number of live cache entries
    pub fn cached_len(&self) -> usize {
        self.inner.cache.lock().len()
    }

    /// Drop every cached result
    pub fn clear_cache(&self) {
        self.inner.cache.lock().clear();
    }

    // Lock order is batch, then cache.
    fn lookup(&self, key: LoaderKey) -> Lookup {
        let cache_key = key.cache_key();
        let mut batch = self.inner.batch.lock();

        if let Some(value) = self.inner.cache.lock().get(&cache_key) {
            debug!(key = %cache_key, "Loader cache hit");
            return Lookup::Cached(value);
        }

        if let Some(pending) = batch.in_flight.get(&cache_key) {
            debug!(key = %cache_key, "Joining in-flight load");
            return Lookup::Pending(pending.clone());
        }

        let (sender, receiver) = oneshot::channel();
        let dropped_key = cache_key.clone();
        let pending = receiver
            .map(move |received| received.unwrap_or_else(|_| Err(LoadError::Dropped(dropped_key))))
            .boxed()
            .shared();

        batch.in_flight.insert(cache_key.clone(), pending.clone());
        batch.queued.push(Queued {
            key,
            cache_key,
            sender,
        });
        if !batch.scheduled {
            batch.scheduled = true;
            self.schedule();
        }

        Lookup::Pending(pending)
    }

    fn schedule(&self) {
        let loader = self.clone();
        let delay = self.inner.delay;
        tokio::spawn(async move {
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }
            loader.dispatch().await;
        });
    }

    async fn dispatch(&self) {
        let queued = {
            let mut batch = self.inner.batch.lock();
            batch.scheduled = false;
            std::mem::take(&mut batch.queued)
        };
        debug!(batch_size = queued.len(), "Dispatching loader batch");
        join_all(queued.into_iter().map(|queued| self.resolve(queued))).await;
    }

    async fn resolve(&self, queued: Queued) {
        let Queued {
            key,
            cache_key,
            sender,
        } = queued;
        let result = self.fetch(&key).await;

        {
            let mut batch = self.inner.batch.lock();
            match &result {
                Ok(value) => self.inner.cache.lock().insert(cache_key.clone(), value.clone()),
                Err(e) => warn!(key = %cache_key, error = %e, "Load failed, result not cached"),
            }
            batch.in_flight.remove(&cache_key);
        }

        // Every caller may have gone away; the result is cached regardless.
        let _ = sender.send(result);
    }

    /// Invoke the client for one key and shape the response
    async fn fetch(&self, key: &LoaderKey) -> LoadResult<Loaded> {
        let client = &self.inner.client;
        let params = key.params();
        let method = key.method();
        debug!(method = method.api_method(), ?params, "Loader fetching");

        let loaded = match method {
            Method::ArtistInfo => Loaded::Artist(
                absent_if_not_found(client.artist_info(params).await)?
                    .map(|raw| Artist::from_raw(raw, method)),
            ),
            Method::AlbumInfo => Loaded::Album(
                absent_if_not_found(client.album_info(params).await)?
                    .map(|raw| Album::from_raw(raw, method, None)),
            ),
            Method::TrackInfo => Loaded::Track(
                absent_if_not_found(client.track_info(params).await)?
                    .map(|raw| Track::from_raw(raw, method)),
            ),
            Method::SimilarArtists => artists(client.similar_artists(params).await?, method),
            Method::ChartTopArtists => artists(client.chart_top_artists(params).await?, method),
            Method::GeoTopArtists => artists(
                empty_if_not_found(client.geo_top_artists(params).await)?,
                method,
            ),
            Method::ArtistTopAlbums => Loaded::Albums(Page::from_raw(
                client.artist_top_albums(params).await?,
                |raw| Album::from_raw(raw, method, None),
            )),
            Method::ArtistTopTracks => tracks(client.artist_top_tracks(params).await?, method),
            Method::SimilarTracks => tracks(client.similar_tracks(params).await?, method),
            Method::ChartTopTracks => tracks(client.chart_top_tracks(params).await?, method),
            Method::GeoTopTracks => tracks(
                empty_if_not_found(client.geo_top_tracks(params).await)?,
                method,
            ),
            Method::ArtistTopTags => tags(client.artist_top_tags(params).await?),
            Method::AlbumTopTags => tags(client.album_top_tags(params).await?),
            Method::TrackTopTags => tags(client.track_top_tags(params).await?),
            Method::ChartTopTags => tags(client.chart_top_tags(params).await?),
        };
        Ok(loaded)
    }
}

fn artists(raw: RawPage<brainz_lastfm_client::RawArtist>, method: Method) -> Loaded {
    Loaded::Artists(Page::from_raw(raw, |raw| Artist::from_raw(raw, method)))
}

fn tracks(raw: RawPage<brainz_lastfm_client::RawTrack>, method: Method) -> Loaded {
    Loaded::Tracks(Page::from_raw(raw, |raw| Track::from_raw(raw, method)))
}

fn tags(raw: RawPage<brainz_lastfm_client::RawTag>) -> Loaded {
    Loaded::Tags(Page::from_raw(raw, Tag::from_raw))
}

/// A detail lookup for a missing entity resolves to `None`
fn absent_if_not_found<T>(result: LastfmResult<Option<T>>) -> LastfmResult<Option<T>> {
    match result {
        Err(LastfmError::NotFound { .. }) => Ok(None),
        other => other,
    }
}

/// A chart for an unknown country resolves to an empty list
fn empty_if_not_found<T>(result: LastfmResult<RawPage<T>>) -> LastfmResult<RawPage<T>> {
    match result {
        Err(LastfmError::NotFound { .. }) => Ok(RawPage {
            items: Vec::new(),
            attr: None,
        }),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_becomes_absent() {
        let result: LastfmResult<Option<u8>> = Err(LastfmError::from_code(6, "missing"));
        assert!(matches!(absent_if_not_found(result), Ok(None)));

        let result: LastfmResult<Option<u8>> = Err(LastfmError::from_code(8, "backend"));
        assert!(matches!(absent_if_not_found(result), Err(LastfmError::Api { code: 8, .. })));
    }

    #[test]
    fn test_not_found_becomes_empty_page() {
        let result: LastfmResult<RawPage<u8>> = Err(LastfmError::from_code(6, "no country"));
        let page = empty_if_not_found(result).unwrap();
        assert!(page.items.is_empty());
        assert!(page.attr.is_none());
    }

    #[test]
    fn test_load_error_exposes_upstream() {
        let err = LoadError::from(LastfmError::MissingApiKey);
        assert!(matches!(err.upstream(), Some(LastfmError::MissingApiKey)));
        assert!(LoadError::Dropped("k".to_string()).upstream().is_none());
    }
}
