//! Last.fm API response models
//!
//! The upstream JSON is generated from XML and is loose about types: numbers
//! arrive as strings, empty strings stand in for missing MBIDs, and a list with
//! one element may arrive as a bare object. The raw models here absorb those
//! quirks so callers only ever see `Option`s and `Vec`s.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{LastfmError, LastfmResult};

/// An image reference with its size label (`small` .. `mega`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    #[serde(rename = "#text", default)]
    pub url: String,
    #[serde(default)]
    pub size: String,
}

/// Aggregate listener and play counts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStats {
    #[serde(default, deserialize_with = "de::number_opt")]
    pub listeners: Option<u64>,
    #[serde(default, deserialize_with = "de::number_opt")]
    pub playcount: Option<u64>,
}

/// Wiki or biography content
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWiki {
    #[serde(default, deserialize_with = "de::string_opt")]
    pub published: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub content: Option<String>,
    #[serde(default)]
    pub links: Option<RawLinks>,
}

impl RawWiki {
    /// URL of the first published link, if any
    pub fn link_url(&self) -> Option<&str> {
        self.links
            .as_ref()?
            .link
            .iter()
            .find_map(|link| link.href.as_deref())
            .filter(|href| !href.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLinks {
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub link: Vec<RawLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLink {
    #[serde(default)]
    pub href: Option<String>,
}

/// An artist reference: either a bare name or an object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawArtistRef {
    Name(String),
    Detail(Box<RawArtist>),
}

impl RawArtistRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name.as_str()),
            Self::Detail(artist) => artist.name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArtist {
    #[serde(default, deserialize_with = "de::string_opt")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub mbid: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub image: Vec<RawImage>,
    #[serde(default, deserialize_with = "de::number_opt")]
    pub listeners: Option<u64>,
    #[serde(default, deserialize_with = "de::number_opt")]
    pub playcount: Option<u64>,
    #[serde(default)]
    pub stats: Option<RawStats>,
    #[serde(default)]
    pub bio: Option<RawWiki>,
    #[serde(rename = "match", default, deserialize_with = "de::number_opt")]
    pub match_score: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAlbum {
    #[serde(default, deserialize_with = "de::string_opt")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub mbid: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub image: Vec<RawImage>,
    #[serde(default)]
    pub artist: Option<RawArtistRef>,
    #[serde(default, deserialize_with = "de::number_opt")]
    pub listeners: Option<u64>,
    #[serde(default, deserialize_with = "de::number_opt")]
    pub playcount: Option<u64>,
    #[serde(default)]
    pub wiki: Option<RawWiki>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrack {
    #[serde(default, deserialize_with = "de::string_opt")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub mbid: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "de::number_opt")]
    pub duration: Option<u64>,
    #[serde(default, deserialize_with = "de::number_opt")]
    pub listeners: Option<u64>,
    #[serde(default, deserialize_with = "de::number_opt")]
    pub playcount: Option<u64>,
    #[serde(default)]
    pub artist: Option<RawArtistRef>,
    #[serde(default)]
    pub album: Option<RawAlbum>,
    #[serde(default)]
    pub wiki: Option<RawWiki>,
    #[serde(rename = "match", default, deserialize_with = "de::number_opt")]
    pub match_score: Option<f64>,
}

/// A user-applied tag
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTag {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "de::number_opt")]
    pub count: Option<i64>,
}

/// Pagination attributes reported under `@attr`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawPageAttr {
    #[serde(default, deserialize_with = "de::number_opt")]
    pub page: Option<u32>,
    #[serde(rename = "perPage", default, deserialize_with = "de::number_opt")]
    pub per_page: Option<u32>,
    #[serde(default, deserialize_with = "de::number_opt")]
    pub total: Option<u64>,
    #[serde(rename = "totalPages", default, deserialize_with = "de::number_opt")]
    pub total_pages: Option<u32>,
}

/// A list response: the items plus whatever `@attr` the endpoint reported
#[derive(Debug, Clone, Default)]
pub struct RawPage<T> {
    pub items: Vec<T>,
    pub attr: Option<RawPageAttr>,
}

impl<T> RawPage<T>
where
    T: for<'de> Deserialize<'de>,
{
    /// Extract `body[envelope][field]` and `body[envelope]["@attr"]`
    ///
    /// A missing envelope yields an empty page.
    pub(crate) fn from_envelope(body: &Value, envelope: &str, field: &str) -> LastfmResult<Self> {
        let Some(inner) = body.get(envelope) else {
            return Ok(Self::empty());
        };
        let items = match inner.get(field) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| T::deserialize(value))
                .collect::<Result<_, _>>()?,
            Some(value) => vec![T::deserialize(value)?],
        };
        let attr = match inner.get("@attr") {
            Some(value) => Some(RawPageAttr::deserialize(value)?),
            None => None,
        };
        Ok(Self { items, attr })
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            attr: None,
        }
    }
}

/// Extract a single entity from `body[envelope]`; absent means `None`
pub(crate) fn from_detail_envelope<T>(body: &Value, envelope: &str) -> LastfmResult<Option<T>>
where
    T: for<'de> Deserialize<'de>,
{
    match body.get(envelope) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(T::deserialize(value)?)),
    }
}

/// Last.fm API error response
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: i32,
    #[serde(default)]
    pub message: String,
}

impl ErrorResponse {
    /// Detect an error payload inside an otherwise successful response
    pub(crate) fn detect(body: &Value) -> Option<LastfmError> {
        body.get("error")?;
        let error = ErrorResponse::deserialize(body).ok()?;
        Some(LastfmError::from_code(error.error, error.message))
    }
}

mod de {
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    /// Numbers that may arrive as JSON numbers or numeric strings
    pub fn number_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.to_string().parse().ok(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Strings where an empty value means "absent"
    pub fn string_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    /// A list that may be collapsed to a single object when it has one entry
    pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        match value {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<_, _>>()
                .map_err(D::Error::custom),
            Some(other) => serde_json::from_value(other)
                .map(|item| vec![item])
                .map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_as_strings() {
        let artist: RawArtist = serde_json::from_value(json!({
            "name": "Tom Petty",
            "listeners": "1234",
            "playcount": 5678,
            "match": "0.75"
        }))
        .unwrap();
        assert_eq!(artist.listeners, Some(1234));
        assert_eq!(artist.playcount, Some(5678));
        assert_eq!(artist.match_score, Some(0.75));
    }

    #[test]
    fn test_empty_mbid_becomes_none() {
        let artist: RawArtist =
            serde_json::from_value(json!({"name": "Test Artist", "mbid": ""})).unwrap();
        assert!(artist.mbid.is_none());
    }

    #[test]
    fn test_artist_ref_string_or_object() {
        let album: RawAlbum = serde_json::from_value(json!({
            "title": "Damn the Torpedoes",
            "artist": "Tom Petty and the Heartbreakers"
        }))
        .unwrap();
        assert!(matches!(album.artist, Some(RawArtistRef::Name(_))));

        let album: RawAlbum = serde_json::from_value(json!({
            "name": "Wildflowers",
            "artist": {"name": "Tom Petty", "mbid": "5ca3f318-d028-4151-ac73-78e2b2d6cdcc"}
        }))
        .unwrap();
        match album.artist {
            Some(RawArtistRef::Detail(artist)) => {
                assert_eq!(artist.name.as_deref(), Some("Tom Petty"));
                assert!(artist.mbid.is_some());
            }
            other => panic!("expected artist object, got {:?}", other),
        }
    }

    #[test]
    fn test_single_image_object_becomes_list() {
        let artist: RawArtist = serde_json::from_value(json!({
            "name": "Solo",
            "image": {"#text": "http://img/solo.png", "size": "large"}
        }))
        .unwrap();
        assert_eq!(artist.image.len(), 1);
        assert_eq!(artist.image[0].size, "large");
    }

    #[test]
    fn test_page_from_envelope_with_attrs() {
        let body = json!({
            "topartists": {
                "artist": [{"name": "A"}, {"name": "B"}],
                "@attr": {"page": "2", "perPage": "10", "totalPages": "4", "total": "37"}
            }
        });
        let page: RawPage<RawArtist> = RawPage::from_envelope(&body, "topartists", "artist").unwrap();
        assert_eq!(page.items.len(), 2);
        let attr = page.attr.unwrap();
        assert_eq!(attr.page, Some(2));
        assert_eq!(attr.per_page, Some(10));
        assert_eq!(attr.total, Some(37));
    }

    #[test]
    fn test_page_from_missing_envelope_is_empty() {
        let page: RawPage<RawTag> = RawPage::from_envelope(&json!({}), "toptags", "tag").unwrap();
        assert!(page.items.is_empty());
        assert!(page.attr.is_none());
    }

    #[test]
    fn test_page_with_single_object_item() {
        let body = json!({"toptags": {"tag": {"name": "rock", "count": 100}}});
        let page: RawPage<RawTag> = RawPage::from_envelope(&body, "toptags", "tag").unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].count, Some(100));
    }

    #[test]
    fn test_error_payload_detection() {
        let body = json!({"error": 6, "message": "The artist you supplied could not be found"});
        let err = ErrorResponse::detect(&body).unwrap();
        assert!(err.is_not_found());

        assert!(ErrorResponse::detect(&json!({"artist": {}})).is_none());
    }

    #[test]
    fn test_wiki_link_url() {
        let wiki: RawWiki = serde_json::from_value(json!({
            "published": "01 Jan 2009, 00:00",
            "summary": "Short",
            "links": {"link": {"#text": "", "rel": "original", "href": "https://last.fm/wiki"}}
        }))
        .unwrap();
        assert_eq!(wiki.link_url(), Some("https://last.fm/wiki"));
    }
}
