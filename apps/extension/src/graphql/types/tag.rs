use async_graphql::Object;

use crate::entity::Tag;

/// A tag added by users to an entity on Last.fm
#[derive(Debug, Clone)]
pub struct LastFmTag(Tag);

impl From<Tag> for LastFmTag {
    fn from(tag: Tag) -> Self {
        Self(tag)
    }
}

#[Object(name = "LastFMTag")]
impl LastFmTag {
    /// The tag name
    async fn name(&self) -> &str {
        &self.0.name
    }

    /// The URL for the tag on Last.fm
    async fn url(&self) -> Option<&str> {
        self.0.url.as_deref()
    }
}
