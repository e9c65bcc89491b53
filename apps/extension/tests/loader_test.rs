//! Loader integration tests against a mock Last.fm server

use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use brainz_lastfm_client::{LastfmClient, LastfmError, Params};
use brainz_lastfm_extension::entity::Artist;
use brainz_lastfm_extension::{LastfmLoader, LoadError, Loaded, LoaderKey, Method};
use brainz_shared_config::LastfmConfig;
use brainz_test_utils::{fixtures, AlbumFixture, ArtistFixture, MockLastfmServer, TrackFixture};
use tokio_test::{assert_err, assert_ok};
use tracing_test::traced_test;

fn loader_with(config: &LastfmConfig) -> LastfmLoader {
    LastfmLoader::new(LastfmClient::new(config).unwrap(), config)
}

fn loader_for(server: &MockLastfmServer) -> LastfmLoader {
    loader_with(&LastfmConfig::with_base_url(server.url()))
}

fn artist_key(name: &str) -> LoaderKey {
    LoaderKey::with(Method::ArtistInfo, [("artist", name)])
}

fn unwrap_artist(loaded: Loaded) -> Artist {
    match loaded {
        Loaded::Artist(Some(artist)) => artist,
        other => panic!("expected an artist, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_loads_coalesce_regardless_of_param_order() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method("album.getInfo", fixtures::album_info(&AlbumFixture::new("Boy", "U2")))
        .await;
    let loader = loader_for(&server);

    let (a, b) = tokio::join!(
        loader.load(LoaderKey::with(Method::AlbumInfo, [("artist", "U2"), ("album", "Boy")])),
        loader.load(LoaderKey::with(Method::AlbumInfo, [("album", "Boy"), ("artist", "U2")])),
    );

    let (a, b) = match (a.unwrap(), b.unwrap()) {
        (Loaded::Album(Some(a)), Loaded::Album(Some(b))) => (a, b),
        other => panic!("expected two albums, got {:?}", other),
    };
    assert!(a.ptr_eq(&b));
    assert_eq!(a.title.as_deref(), Some("Boy"));
    assert_eq!(server.requests_for("album.getInfo").await, 1);
}

#[tokio::test]
async fn test_distinct_keys_are_fetched_separately() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method("artist.getInfo", fixtures::artist_info(&ArtistFixture::new("Queen")))
        .await;
    let loader = loader_for(&server);

    let (a, b) = tokio::join!(loader.load(artist_key("Queen")), loader.load(artist_key("Muse")));
    assert_ok!(a);
    assert_ok!(b);
    assert_eq!(server.requests_for("artist.getInfo").await, 2);
}

#[tokio::test]
async fn test_cached_result_is_reused() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method("artist.getInfo", fixtures::artist_info(&ArtistFixture::new("Queen")))
        .await;
    let loader = loader_for(&server);

    let first = unwrap_artist(loader.load(artist_key("Queen")).await.unwrap());
    let second = unwrap_artist(loader.load(artist_key("Queen")).await.unwrap());

    assert!(first.ptr_eq(&second));
    assert_eq!(loader.cached_len(), 1);
    assert_eq!(server.requests_for("artist.getInfo").await, 1);
}

#[tokio::test]
async fn test_cleared_cache_refetches() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method("artist.getInfo", fixtures::artist_info(&ArtistFixture::new("Queen")))
        .await;
    let loader = loader_for(&server);

    loader.load(artist_key("Queen")).await.unwrap();
    loader.clear_cache();
    assert_eq!(loader.cached_len(), 0);
    loader.load(artist_key("Queen")).await.unwrap();

    assert_eq!(server.requests_for("artist.getInfo").await, 2);
}

#[tokio::test]
async fn test_least_recently_used_entry_is_evicted() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method("artist.getInfo", fixtures::artist_info(&ArtistFixture::new("Queen")))
        .await;
    let config = LastfmConfig::with_base_url(server.url()).cache(2, Duration::from_secs(60));
    let loader = loader_with(&config);

    for name in ["A", "B", "C"] {
        loader.load(artist_key(name)).await.unwrap();
    }
    assert_eq!(loader.cached_len(), 2);
    assert_eq!(server.requests_for("artist.getInfo").await, 3);

    // "A" was least recently used, so it is fetched again; "C" is still cached
    loader.load(artist_key("C")).await.unwrap();
    assert_eq!(server.requests_for("artist.getInfo").await, 3);
    loader.load(artist_key("A")).await.unwrap();
    assert_eq!(server.requests_for("artist.getInfo").await, 4);
}

#[tokio::test]
async fn test_expired_entry_is_refetched() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method("artist.getInfo", fixtures::artist_info(&ArtistFixture::new("Queen")))
        .await;
    let config = LastfmConfig::with_base_url(server.url()).cache(10, Duration::from_millis(50));
    let loader = loader_with(&config);

    loader.load(artist_key("Queen")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    loader.load(artist_key("Queen")).await.unwrap();

    assert_eq!(server.requests_for("artist.getInfo").await, 2);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let server = MockLastfmServer::start().await;
    server
        .mock_error_times("artist.getInfo", 8, "Operation failed", 1)
        .await;
    server
        .mock_method("artist.getInfo", fixtures::artist_info(&ArtistFixture::new("Queen")))
        .await;
    let loader = loader_for(&server);

    let err = loader.load(artist_key("Queen")).await.unwrap_err();
    assert_matches!(err.upstream(), Some(LastfmError::Api { code: 8, .. }));
    assert_eq!(loader.cached_len(), 0);

    let artist = unwrap_artist(loader.load(artist_key("Queen")).await.unwrap());
    assert_eq!(artist.name.as_deref(), Some("Queen"));
    assert_eq!(server.requests_for("artist.getInfo").await, 2);
}

#[tokio::test]
async fn test_coalesced_callers_share_a_failure() {
    let server = MockLastfmServer::start().await;
    server
        .mock_error("artist.getInfo", 8, "Operation failed")
        .await;
    let loader = loader_for(&server);

    let (a, b) = tokio::join!(loader.load(artist_key("Queen")), loader.load(artist_key("Queen")));

    assert_matches!(a, Err(LoadError::Upstream(_)));
    assert_matches!(b, Err(LoadError::Upstream(_)));
    assert_eq!(server.requests_for("artist.getInfo").await, 1);
}

#[tokio::test]
async fn test_not_found_detail_is_absent() {
    let server = MockLastfmServer::start().await;
    server.mock_not_found("artist.getInfo").await;
    let loader = loader_for(&server);

    let loaded = loader.load(artist_key("Nobody")).await.unwrap();
    assert_matches!(loaded, Loaded::Artist(None));
}

#[tokio::test]
async fn test_not_found_country_is_an_empty_chart() {
    let server = MockLastfmServer::start().await;
    server.mock_not_found("geo.getTopArtists").await;
    let loader = loader_for(&server);

    let page = loader
        .load_artists(LoaderKey::with(
            Method::GeoTopArtists,
            [("country", "Atlantis"), ("page", "1"), ("limit", "10")],
        ))
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert!(page.attrs.is_none());
}

#[tokio::test]
async fn test_not_found_elsewhere_is_an_error() {
    let server = MockLastfmServer::start().await;
    server.mock_not_found("artist.getTopTracks").await;
    let loader = loader_for(&server);

    let err = loader
        .load(LoaderKey::with(Method::ArtistTopTracks, [("artist", "Nobody")]))
        .await
        .unwrap_err();
    assert_matches!(err.upstream(), Some(LastfmError::NotFound { .. }));
}

#[tokio::test]
async fn test_missing_api_key_makes_no_requests() {
    let server = MockLastfmServer::start().await;
    let config = LastfmConfig::with_base_url(server.url()).api_key(None::<String>);
    let loader = loader_with(&config);

    let err = assert_err!(loader.load(artist_key("Queen")).await);
    assert_matches!(err.upstream(), Some(LastfmError::MissingApiKey));
    assert_eq!(server.request_count().await, 0);
}

#[tokio::test]
async fn test_slow_key_does_not_block_others() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method_delayed(
            "artist.getInfo",
            fixtures::artist_info(&ArtistFixture::new("Slow")),
            800,
        )
        .await;
    server
        .mock_method("album.getInfo", fixtures::album_info(&AlbumFixture::new("Boy", "U2")))
        .await;
    let loader = loader_for(&server);
    let start = Instant::now();

    let (fast_elapsed, slow) = tokio::join!(
        async {
            loader
                .load(LoaderKey::with(Method::AlbumInfo, [("album", "Boy"), ("artist", "U2")]))
                .await
                .unwrap();
            start.elapsed()
        },
        loader.load(artist_key("Slow")),
    );

    assert_ok!(slow);
    assert!(fast_elapsed < Duration::from_millis(600), "fast key took {:?}", fast_elapsed);
}

#[tokio::test]
async fn test_track_album_reuses_track_artist() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method(
            "track.getInfo",
            fixtures::track_info(&TrackFixture::new("One", "U2").on_album("Achtung Baby")),
        )
        .await;
    let loader = loader_for(&server);

    let loaded = loader
        .load(LoaderKey::with(Method::TrackInfo, [("track", "One"), ("artist", "U2")]))
        .await
        .unwrap();
    let track = match loaded {
        Loaded::Track(Some(track)) => track,
        other => panic!("expected a track, got {:?}", other),
    };

    let track_artist = track.artist.as_ref().unwrap();
    let album = track.album.as_ref().unwrap();
    assert_eq!(album.title.as_deref(), Some("Achtung Baby"));
    assert!(album.artist.as_ref().unwrap().ptr_eq(track_artist));
}

#[tokio::test]
async fn test_fetch_info_prefers_mbid_and_passes_extra_params() {
    let server = MockLastfmServer::start().await;
    let seed = ArtistFixture::numbered(7);
    server
        .mock_method("artist.getSimilar", fixtures::similar_artists(&[seed.clone()]))
        .await;
    server
        .mock_method("artist.getInfo", fixtures::artist_info(&seed))
        .await;
    let loader = loader_for(&server);

    let page = loader
        .load_artists(LoaderKey::with(Method::SimilarArtists, [("artist", "Seed")]))
        .await
        .unwrap();
    let stub = &page.items[0];
    assert!(!stub.is_full_detail());

    let extra = Params::from([
        ("mbid".to_string(), "bogus".to_string()),
        ("lang".to_string(), "de".to_string()),
    ]);
    let full = stub.fetch_info(&loader, extra).await.unwrap().unwrap();
    assert!(full.is_full_detail());
    assert!(full.bio.is_some());

    let requests = server.requests_params("artist.getInfo").await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["mbid"], seed.mbid);
    assert_eq!(requests[0]["lang"], "de");
    assert!(!requests[0].contains_key("artist"));
}

#[tokio::test]
async fn test_full_record_skips_fetch_without_extra_params() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method("artist.getInfo", fixtures::artist_info(&ArtistFixture::new("Queen")))
        .await;
    let loader = loader_for(&server);

    let artist = unwrap_artist(loader.load(artist_key("Queen")).await.unwrap());
    let again = artist.fetch_info(&loader, Params::new()).await.unwrap().unwrap();

    assert!(again.ptr_eq(&artist));
    assert_eq!(server.requests_for("artist.getInfo").await, 1);
}

#[tokio::test]
#[traced_test]
async fn test_cache_hits_are_logged() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method("artist.getInfo", fixtures::artist_info(&ArtistFixture::new("Queen")))
        .await;
    let loader = loader_for(&server);

    loader.load(artist_key("Queen")).await.unwrap();
    loader.load(artist_key("Queen")).await.unwrap();

    assert!(logs_contain("Loader cache hit"));
}
