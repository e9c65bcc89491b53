//! Cursor connections over upstream lists
//!
//! Upstream lists are either a complete in-memory collection or one page of
//! a larger virtual list. Either way the returned items are treated as a
//! slice starting at some absolute offset, and cursors encode absolute
//! offsets, so paging with `after` works the same for both.

use async_graphql::SimpleObject;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use brainz_lastfm_client::Params;

use crate::error::{ExtensionError, ExtensionResult};
use crate::loader::{Page, PageAttrs};

/// Largest page a client may request
pub const MAX_FIRST: i32 = 100;

/// Upstream limit for the similar-item endpoints, which cannot paginate
pub const SIMILAR_LIMIT: u32 = 1000;

pub const FIRST_RANGE_MESSAGE: &str = "The `first` argument must be an integer in the range 0-100.";

/// Cursors past this offset cannot point into any upstream list
pub const MAX_CURSOR_OFFSET: usize = u32::MAX as usize;

pub const CURSOR_RANGE_MESSAGE: &str = "The `after` cursor is out of range.";

const CURSOR_PREFIX: &str = "arrayconnection:";

pub fn encode_cursor(offset: usize) -> String {
    STANDARD.encode(format!("{}{}", CURSOR_PREFIX, offset))
}

/// Decode an opaque cursor; anything malformed is treated as no cursor
pub fn decode_cursor(cursor: &str) -> Option<usize> {
    let bytes = STANDARD.decode(cursor).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    text.strip_prefix(CURSOR_PREFIX)?.parse().ok()
}

/// Validated `first`/`after` connection arguments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
    first: Option<usize>,
    after: Option<usize>,
}

impl ConnectionArgs {
    /// Validate `first` (0 to 100 when given) and decode `after`
    pub fn new(first: Option<i32>, after: Option<&str>) -> ExtensionResult<Self> {
        let first = match first {
            Some(n) if (0..=MAX_FIRST).contains(&n) => Some(n as usize),
            Some(_) => return Err(ExtensionError::InvalidArgument(FIRST_RANGE_MESSAGE.to_string())),
            None => None,
        };
        let after = after.and_then(decode_cursor);
        if after.is_some_and(|offset| offset >= MAX_CURSOR_OFFSET) {
            return Err(ExtensionError::InvalidArgument(CURSOR_RANGE_MESSAGE.to_string()));
        }
        Ok(Self { first, after })
    }

    pub fn first(&self) -> Option<usize> {
        self.first
    }

    /// `first: 0` never needs an upstream call
    pub fn is_empty_request(&self) -> bool {
        self.first == Some(0)
    }

    /// Absolute offset of the first requested item
    pub fn start_offset(&self) -> usize {
        self.after.map_or(0, |after| after.saturating_add(1))
    }

    /// Upstream `page`/`limit` for a paginated endpoint; `first` is required
    pub fn page_params(&self) -> ExtensionResult<Params> {
        let limit = self
            .first
            .ok_or_else(|| ExtensionError::InvalidArgument(FIRST_RANGE_MESSAGE.to_string()))?;
        let (page, per_page) = paginate_by_page(self.start_offset(), limit);
        Ok(Params::from([
            ("page".to_string(), page.to_string()),
            ("limit".to_string(), per_page.to_string()),
        ]))
    }

    /// Extend `base` with the paging params for an upstream list call
    ///
    /// Returns `None` for `first: 0`, which never needs the upstream.
    pub fn upstream_params(&self, mut base: Params, paging: Paging) -> ExtensionResult<Option<Params>> {
        if self.is_empty_request() {
            return Ok(None);
        }
        match paging {
            Paging::Pages => base.extend(self.page_params()?),
            Paging::Complete => {
                base.insert("limit".to_string(), SIMILAR_LIMIT.to_string());
            }
        }
        Ok(Some(base))
    }
}

/// How an upstream list endpoint is paged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// Real `page`/`limit` pagination
    Pages,
    /// No pagination; the whole list is fetched and sliced locally
    Complete,
}

/// Smallest page size whose page containing `offset` also contains
/// `offset + limit - 1`; returns `(page, per_page)` with 1-based pages
pub fn paginate_by_page(offset: usize, limit: usize) -> (usize, usize) {
    let limit = limit.max(1);
    let end = offset.saturating_add(limit);
    let per_page = (limit..=end)
        .find(|per_page| (offset / per_page + 1).saturating_mul(*per_page) >= end)
        .unwrap_or(end);
    (offset / per_page + 1, per_page)
}

/// Position of a returned slice within the full virtual list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceMeta {
    pub start: usize,
    pub total: usize,
}

impl SliceMeta {
    pub fn new(attrs: Option<&PageAttrs>, len: usize) -> Self {
        match attrs {
            Some(attrs) => Self {
                start: (attrs.page.saturating_sub(1) as usize).saturating_mul(attrs.per_page as usize),
                total: attrs.total as usize,
            },
            None => Self { start: 0, total: len },
        }
    }
}

/// Relay page info
#[derive(SimpleObject, Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

#[derive(Debug, Clone)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    /// Length of the full virtual list; unknown for `first: 0`
    pub total_count: Option<usize>,
}

impl<T> Connection<T> {
    pub fn empty() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
            total_count: None,
        }
    }

    /// Build from a loader page, honoring its pagination attributes
    pub fn from_page(page: Page<T>, args: &ConnectionArgs) -> Self {
        let meta = SliceMeta::new(page.attrs.as_ref(), page.items.len());
        Self::from_slice(page.items, meta, args)
    }

    /// Build from `items` sitting at `meta.start` in a list of `meta.total`
    pub fn from_slice(items: Vec<T>, meta: SliceMeta, args: &ConnectionArgs) -> Self {
        let slice_end = meta.start.saturating_add(items.len());
        let start = meta.start.max(args.start_offset());
        let mut end = slice_end.min(meta.total);
        if let Some(first) = args.first() {
            end = end.min(start.saturating_add(first));
        }

        let edges: Vec<Edge<T>> = if start < end {
            items
                .into_iter()
                .skip(start - meta.start)
                .take(end - start)
                .enumerate()
                .map(|(i, node)| Edge {
                    cursor: encode_cursor(start + i),
                    node,
                })
                .collect()
        } else {
            Vec::new()
        };

        let page_info = PageInfo {
            has_next_page: args.first().is_some() && end < meta.total,
            has_previous_page: start > 0,
            start_cursor: edges.first().map(|edge| edge.cursor.clone()),
            end_cursor: edges.last().map(|edge| edge.cursor.clone()),
        };

        Self {
            edges,
            page_info,
            total_count: Some(meta.total),
        }
    }
}
