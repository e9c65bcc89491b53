//! Mock Last.fm server for testing the client, loader and schema
//!
//! Last.fm serves every method from a single endpoint and selects the
//! operation with the `method` query parameter, so mocks here match on that
//! parameter rather than on paths.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PATH: &str = "/2.0/";

/// Mock Last.fm server
///
/// This struct wraps a [`wiremock::MockServer`] and provides convenience methods
/// for mounting responses per API method and inspecting what was requested.
///
/// # Example
///
/// ```rust,ignore
/// use brainz_test_utils::{fixtures, MockLastfmServer, TagFixture};
///
/// #[tokio::test]
/// async fn test_tags() {
///     let server = MockLastfmServer::start().await;
///     server
///         .mock_method("artist.getTopTags", fixtures::top_tags(&[TagFixture::new("rock", 100)]))
///         .await;
///
///     // Configure your client with server.url()
///     assert_eq!(server.requests_for("artist.getTopTags").await, 0);
/// }
/// ```
pub struct MockLastfmServer {
    server: MockServer,
}

impl MockLastfmServer {
    /// Start a new mock Last.fm server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the API endpoint URL, suitable as the client's base URL
    pub fn url(&self) -> String {
        format!("{}{}", self.server.uri(), API_PATH)
    }

    /// Get reference to the underlying mock server for custom mock setups
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    fn given(api_method: &str) -> wiremock::MockBuilder {
        Mock::given(method("GET"))
            .and(path(API_PATH))
            .and(query_param("method", api_method))
    }

    /// Mount a successful JSON response for an API method
    pub async fn mock_method(&self, api_method: &str, body: Value) {
        Self::given(api_method)
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a successful JSON response that only matches the given parameters
    pub async fn mock_method_with_params(&self, api_method: &str, params: &[(&str, &str)], body: Value) {
        let mut builder = Self::given(api_method);
        for (key, value) in params {
            builder = builder.and(query_param(*key, *value));
        }
        builder
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a response delayed by `delay_ms`
    pub async fn mock_method_delayed(&self, api_method: &str, body: Value, delay_ms: u64) {
        Self::given(api_method)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(delay_ms))
                    .set_body_json(body),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a Last.fm error payload (`{"error": code, "message": ...}`)
    pub async fn mock_error(&self, api_method: &str, code: i32, message: &str) {
        Self::given(api_method)
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::error(code, message)))
            .mount(&self.server)
            .await;
    }

    /// Mount an error payload that is served at most `times` times
    ///
    /// Mount the eventual successful response afterwards to simulate a
    /// transient failure.
    pub async fn mock_error_times(&self, api_method: &str, code: i32, message: &str, times: u64) {
        Self::given(api_method)
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::error(code, message)))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Mount the upstream "not found" error (code 6)
    pub async fn mock_not_found(&self, api_method: &str) {
        self.mock_error(api_method, 6, "The entity you supplied could not be found")
            .await;
    }

    /// Mount a bare HTTP status with no Last.fm payload
    pub async fn mock_status(&self, api_method: &str, status_code: u16) {
        Self::given(api_method)
            .respond_with(ResponseTemplate::new(status_code))
            .mount(&self.server)
            .await;
    }

    /// Query parameters of every request received for an API method
    pub async fn requests_params(&self, api_method: &str) -> Vec<HashMap<String, String>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                request
                    .url
                    .query_pairs()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect::<HashMap<_, _>>()
            })
            .filter(|params| params.get("method").map(String::as_str) == Some(api_method))
            .collect()
    }

    /// Number of requests received for an API method
    pub async fn requests_for(&self, api_method: &str) -> usize {
        self.requests_params(api_method).await.len()
    }

    /// Total number of requests received
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

fn images(base: &str) -> Value {
    json!(["small", "medium", "large", "extralarge"]
        .iter()
        .map(|size| json!({"#text": format!("{}/{}.png", base, size), "size": size}))
        .collect::<Vec<_>>())
}

fn wiki(summary: &str) -> Value {
    json!({
        "published": "28 Jan 2009, 15:12",
        "summary": summary,
        "content": format!("{} Full text.", summary),
        "links": {"link": {"#text": "", "rel": "original", "href": "https://last.fm/wiki"}}
    })
}

/// Artist payload fixture
#[derive(Debug, Clone)]
pub struct ArtistFixture {
    pub name: String,
    pub mbid: String,
    pub listeners: u64,
    pub playcount: u64,
    pub match_score: Option<f64>,
}

impl ArtistFixture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mbid: String::new(),
            listeners: 1000,
            playcount: 5000,
            match_score: None,
        }
    }

    /// Artist number `i` of a generated similar-artist list
    pub fn numbered(i: usize) -> Self {
        Self {
            mbid: format!("00000000-0000-0000-0000-{:012}", i),
            match_score: Some(1.0 - i as f64 / 1000.0),
            ..Self::new(&format!("Artist {}", i))
        }
    }

    pub fn with_mbid(mut self, mbid: &str) -> Self {
        self.mbid = mbid.to_string();
        self
    }

    /// Payload as it appears in list responses (counts as strings, no bio)
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "name": self.name,
            "mbid": self.mbid,
            "url": format!("https://www.last.fm/music/{}", self.name.replace(' ', "+")),
            "image": images(&format!("https://img.last.fm/{}", self.name.replace(' ', "_"))),
            "listeners": self.listeners.to_string(),
            "playcount": self.playcount.to_string(),
        });
        if let Some(score) = self.match_score {
            value["match"] = json!(score.to_string());
        }
        value
    }

    /// Payload as returned by `artist.getInfo`
    pub fn to_info_json(&self) -> Value {
        json!({
            "name": self.name,
            "mbid": self.mbid,
            "url": format!("https://www.last.fm/music/{}", self.name.replace(' ', "+")),
            "image": images(&format!("https://img.last.fm/{}", self.name.replace(' ', "_"))),
            "stats": {
                "listeners": self.listeners.to_string(),
                "playcount": self.playcount.to_string(),
            },
            "bio": wiki(&format!("{} is an artist.", self.name)),
        })
    }
}

/// Album payload fixture
#[derive(Debug, Clone)]
pub struct AlbumFixture {
    pub title: String,
    pub artist: String,
    pub mbid: String,
}

impl AlbumFixture {
    pub fn new(title: &str, artist: &str) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            mbid: String::new(),
        }
    }

    pub fn with_mbid(mut self, mbid: &str) -> Self {
        self.mbid = mbid.to_string();
        self
    }

    /// Payload as it appears in `artist.getTopAlbums` (nested artist object)
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.title,
            "mbid": self.mbid,
            "url": format!("https://www.last.fm/music/{}/{}", self.artist, self.title),
            "image": images(&format!("https://img.last.fm/{}", self.title.replace(' ', "_"))),
            "playcount": "250",
            "artist": {"name": self.artist, "mbid": "", "url": format!("https://www.last.fm/music/{}", self.artist)},
        })
    }

    /// Payload as returned by `album.getInfo` (artist as a bare name)
    pub fn to_info_json(&self) -> Value {
        json!({
            "name": self.title,
            "artist": self.artist,
            "mbid": self.mbid,
            "url": format!("https://www.last.fm/music/{}/{}", self.artist, self.title),
            "image": images(&format!("https://img.last.fm/{}", self.title.replace(' ', "_"))),
            "listeners": "300",
            "playcount": "900",
            "wiki": wiki(&format!("{} is an album.", self.title)),
        })
    }
}

/// Track payload fixture
#[derive(Debug, Clone)]
pub struct TrackFixture {
    pub name: String,
    pub artist: String,
    pub album: Option<String>,
    pub mbid: String,
    pub match_score: Option<f64>,
}

impl TrackFixture {
    pub fn new(name: &str, artist: &str) -> Self {
        Self {
            name: name.to_string(),
            artist: artist.to_string(),
            album: None,
            mbid: String::new(),
            match_score: None,
        }
    }

    pub fn on_album(mut self, album: &str) -> Self {
        self.album = Some(album.to_string());
        self
    }

    pub fn with_match(mut self, score: f64) -> Self {
        self.match_score = Some(score);
        self
    }

    /// Payload as it appears in list responses
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "name": self.name,
            "mbid": self.mbid,
            "url": format!("https://www.last.fm/music/{}/_/{}", self.artist, self.name),
            "duration": "215",
            "listeners": "42",
            "playcount": "420",
            "artist": {"name": self.artist, "mbid": "", "url": format!("https://www.last.fm/music/{}", self.artist)},
        });
        if let Some(score) = self.match_score {
            value["match"] = json!(score);
        }
        value
    }

    /// Payload as returned by `track.getInfo`
    pub fn to_info_json(&self) -> Value {
        let mut value = json!({
            "name": self.name,
            "mbid": self.mbid,
            "url": format!("https://www.last.fm/music/{}/_/{}", self.artist, self.name),
            "duration": "215000",
            "listeners": "42",
            "playcount": "420",
            "artist": {"name": self.artist, "mbid": "", "url": format!("https://www.last.fm/music/{}", self.artist)},
            "wiki": wiki(&format!("{} is a track.", self.name)),
        });
        if let Some(album) = &self.album {
            value["album"] = json!({
                "artist": self.artist,
                "title": album,
                "mbid": "",
                "url": format!("https://www.last.fm/music/{}/{}", self.artist, album),
                "image": images(&format!("https://img.last.fm/{}", album.replace(' ', "_"))),
            });
        }
        value
    }
}

/// Tag payload fixture
#[derive(Debug, Clone)]
pub struct TagFixture {
    pub name: String,
    pub count: i64,
}

impl TagFixture {
    pub fn new(name: &str, count: i64) -> Self {
        Self {
            name: name.to_string(),
            count,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "count": self.count,
            "url": format!("https://www.last.fm/tag/{}", self.name),
        })
    }
}

/// Envelope builders for Last.fm responses
pub mod fixtures {
    use serde_json::{json, Value};

    use super::{AlbumFixture, ArtistFixture, TagFixture, TrackFixture};

    /// `{"error": code, "message": message}`
    pub fn error(code: i32, message: &str) -> Value {
        json!({"error": code, "message": message})
    }

    pub fn artist_info(artist: &ArtistFixture) -> Value {
        json!({"artist": artist.to_info_json()})
    }

    pub fn album_info(album: &AlbumFixture) -> Value {
        json!({"album": album.to_info_json()})
    }

    pub fn track_info(track: &TrackFixture) -> Value {
        json!({"track": track.to_info_json()})
    }

    /// `artist.getSimilar` response; carries no pagination attributes
    pub fn similar_artists(artists: &[ArtistFixture]) -> Value {
        json!({
            "similarartists": {
                "artist": artists.iter().map(ArtistFixture::to_json).collect::<Vec<_>>(),
                "@attr": {"artist": "Seed"}
            }
        })
    }

    /// `track.getSimilar` response
    pub fn similar_tracks(tracks: &[TrackFixture]) -> Value {
        json!({
            "similartracks": {
                "track": tracks.iter().map(TrackFixture::to_json).collect::<Vec<_>>(),
                "@attr": {"artist": "Seed"}
            }
        })
    }

    /// `*.getTopTags` response; carries no pagination attributes
    pub fn top_tags(tags: &[TagFixture]) -> Value {
        json!({
            "toptags": {
                "tag": tags.iter().map(TagFixture::to_json).collect::<Vec<_>>(),
            }
        })
    }

    /// A paginated list response with string-typed `@attr` values
    pub fn paged(envelope: &str, field: &str, items: Vec<Value>, page: u32, per_page: u32, total: u64) -> Value {
        let total_pages = if per_page == 0 {
            0
        } else {
            (total + u64::from(per_page) - 1) / u64::from(per_page)
        };
        json!({
            envelope: {
                field: items,
                "@attr": {
                    "page": page.to_string(),
                    "perPage": per_page.to_string(),
                    "total": total.to_string(),
                    "totalPages": total_pages.to_string(),
                }
            }
        })
    }

    pub fn top_albums(albums: &[AlbumFixture], page: u32, per_page: u32, total: u64) -> Value {
        paged(
            "topalbums",
            "album",
            albums.iter().map(AlbumFixture::to_json).collect(),
            page,
            per_page,
            total,
        )
    }

    pub fn top_tracks(tracks: &[TrackFixture], page: u32, per_page: u32, total: u64) -> Value {
        paged(
            "toptracks",
            "track",
            tracks.iter().map(TrackFixture::to_json).collect(),
            page,
            per_page,
            total,
        )
    }

    pub fn chart_artists(artists: &[ArtistFixture], page: u32, per_page: u32, total: u64) -> Value {
        paged(
            "artists",
            "artist",
            artists.iter().map(ArtistFixture::to_json).collect(),
            page,
            per_page,
            total,
        )
    }

    pub fn chart_tags(tags: &[TagFixture], page: u32, per_page: u32, total: u64) -> Value {
        paged(
            "tags",
            "tag",
            tags.iter().map(TagFixture::to_json).collect(),
            page,
            per_page,
            total,
        )
    }

    pub fn geo_artists(artists: &[ArtistFixture], page: u32, per_page: u32, total: u64) -> Value {
        paged(
            "topartists",
            "artist",
            artists.iter().map(ArtistFixture::to_json).collect(),
            page,
            per_page,
            total,
        )
    }
}
