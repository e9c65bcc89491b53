use brainz_lastfm_client::RawTag;

/// A user-applied tag; tag lists are passed through without hydration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub url: Option<String>,
    /// Relative weight on top-tag lists
    pub count: Option<i64>,
}

impl Tag {
    pub(crate) fn from_raw(raw: RawTag) -> Self {
        Self {
            name: raw.name,
            url: raw.url,
            count: raw.count,
        }
    }
}
