//! Shaped loader results

use brainz_lastfm_client::{RawPage, RawPageAttr};

use crate::entity::{Album, Artist, Tag, Track};

/// Pagination attributes reported by a paginated endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageAttrs {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl PageAttrs {
    /// Only complete attributes count; similar-item endpoints report an
    /// `@attr` without paging fields.
    fn from_raw(attr: &RawPageAttr) -> Option<Self> {
        Some(Self {
            page: attr.page?,
            per_page: attr.per_page?,
            total: attr.total?,
        })
    }
}

/// A list result: items plus optional pagination attributes
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub attrs: Option<PageAttrs>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, attrs: Option<PageAttrs>) -> Self {
        Self { items, attrs }
    }

    /// Shape a raw page, mapping every item
    pub(crate) fn from_raw<R>(raw: RawPage<R>, f: impl FnMut(R) -> T) -> Self {
        let attrs = raw.attr.as_ref().and_then(PageAttrs::from_raw);
        Self {
            items: raw.items.into_iter().map(f).collect(),
            attrs,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            attrs: None,
        }
    }
}

/// The value a loader key resolves to
#[derive(Debug, Clone)]
pub enum Loaded {
    Artist(Option<Artist>),
    Album(Option<Album>),
    Track(Option<Track>),
    Artists(Page<Artist>),
    Albums(Page<Album>),
    Tracks(Page<Track>),
    Tags(Page<Tag>),
}

impl Loaded {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Artist(_) => "artist",
            Self::Album(_) => "album",
            Self::Track(_) => "track",
            Self::Artists(_) => "artist list",
            Self::Albums(_) => "album list",
            Self::Tracks(_) => "track list",
            Self::Tags(_) => "tag list",
        }
    }
}
