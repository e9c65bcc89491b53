use async_graphql::{Enum, SimpleObject};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::entity::Wiki;

/// Upstream wiki stamp format, e.g. `28 Jan 2009, 15:12`
const PUBLISHED_FORMAT: &str = "%d %b %Y, %H:%M";

/// The image sizes that may be requested from Last.fm
#[derive(Enum, Copy, Clone, Debug, PartialEq, Eq)]
#[graphql(name = "LastFMImageSize")]
pub enum LastFmImageSize {
    /// A maximum dimension of 34px
    Small,
    /// A maximum dimension of 64px
    Medium,
    /// A maximum dimension of 174px
    Large,
    /// A maximum dimension of 300px
    Extralarge,
    /// A maximum dimension of 300px
    Mega,
}

impl LastFmImageSize {
    /// The upstream size label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Extralarge => "extralarge",
            Self::Mega => "mega",
        }
    }
}

/// Biographical or background text written about an entity on Last.fm
#[derive(SimpleObject, Debug, Clone, PartialEq, Eq)]
#[graphql(name = "LastFMWikiContent")]
pub struct LastFmWikiContent {
    /// A summary of the wiki content, which may contain HTML
    #[graphql(name = "summaryHTML")]
    pub summary_html: Option<String>,
    /// The full wiki content, which may contain HTML
    #[graphql(name = "contentHTML")]
    pub content_html: Option<String>,
    /// The date the content was published
    pub publish_date: Option<NaiveDate>,
    /// The time the content was published, in an unspecified time zone
    pub publish_time: Option<NaiveTime>,
    /// The URL at which the content was published
    pub url: Option<String>,
}

impl LastFmWikiContent {
    pub(crate) fn from_wiki(wiki: &Wiki) -> Self {
        let published = wiki.published.as_deref().and_then(parse_published);
        Self {
            summary_html: wiki.summary.clone(),
            content_html: wiki.content.clone(),
            publish_date: published.map(|stamp| stamp.date()),
            publish_time: published.map(|stamp| stamp.time()),
            url: wiki.url.clone(),
        }
    }
}

fn parse_published(text: &str) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(text.trim(), PUBLISHED_FORMAT) {
        Ok(stamp) => Some(stamp),
        Err(e) => {
            tracing::debug!(published = text, error = %e, "Unparseable wiki publish stamp");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_splits_into_date_and_time() {
        let wiki = Wiki {
            published: Some("28 Jan 2009, 15:12".to_string()),
            summary: Some("<b>Queen</b>".to_string()),
            ..Wiki::default()
        };
        let content = LastFmWikiContent::from_wiki(&wiki);
        assert_eq!(content.publish_date, NaiveDate::from_ymd_opt(2009, 1, 28));
        assert_eq!(content.publish_time, NaiveTime::from_hms_opt(15, 12, 0));
        assert_eq!(content.summary_html.as_deref(), Some("<b>Queen</b>"));
    }

    #[test]
    fn test_bad_stamp_is_dropped() {
        let wiki = Wiki {
            published: Some("sometime".to_string()),
            ..Wiki::default()
        };
        let content = LastFmWikiContent::from_wiki(&wiki);
        assert!(content.publish_date.is_none());
        assert!(content.publish_time.is_none());
    }

    #[test]
    fn test_size_labels() {
        assert_eq!(LastFmImageSize::Extralarge.as_str(), "extralarge");
    }
}
