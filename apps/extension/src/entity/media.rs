use brainz_lastfm_client::{RawImage, RawWiki};

/// An image URL with its size label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub size: String,
}

impl Image {
    pub(crate) fn from_raw_list(raw: Vec<RawImage>) -> Vec<Self> {
        raw.into_iter()
            .map(|image| Self {
                url: image.url,
                size: image.size,
            })
            .collect()
    }

    /// Pick an image by size label, or the last (largest) one without a size
    ///
    /// Empty URLs count as no image.
    pub fn select<'a>(images: &'a [Image], size: Option<&str>) -> Option<&'a str> {
        let image = match size {
            Some(size) => images.iter().find(|image| image.size.eq_ignore_ascii_case(size)),
            None => images.last(),
        }?;
        Some(image.url.as_str()).filter(|url| !url.is_empty())
    }
}

/// Wiki or biography text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wiki {
    /// Upstream publish stamp, e.g. `28 Jan 2009, 15:12`
    pub published: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
}

impl Wiki {
    pub(crate) fn from_raw(raw: RawWiki) -> Self {
        let url = raw.link_url().map(str::to_string);
        Self {
            published: raw.published,
            summary: raw.summary,
            content: raw.content,
            url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images() -> Vec<Image> {
        ["small", "medium", "large", "extralarge"]
            .iter()
            .map(|size| Image {
                url: format!("http://img/{}.png", size),
                size: size.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_select_defaults_to_last_image() {
        assert_eq!(Image::select(&images(), None), Some("http://img/extralarge.png"));
    }

    #[test]
    fn test_select_by_size() {
        assert_eq!(Image::select(&images(), Some("medium")), Some("http://img/medium.png"));
        assert_eq!(Image::select(&images(), Some("MEDIUM")), Some("http://img/medium.png"));
        assert_eq!(Image::select(&images(), Some("mega")), None);
    }

    #[test]
    fn test_empty_url_is_no_image() {
        let images = vec![Image {
            url: String::new(),
            size: "large".to_string(),
        }];
        assert_eq!(Image::select(&images, None), None);
        assert_eq!(Image::select(&[], None), None);
    }
}
