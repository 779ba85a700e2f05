use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

use crate::feed::Entry;
use crate::util::{resolve_url, UrlValidationError};

/// Visible text that marks the "read online" link in a newsletter body.
const ONLINE_MARKER: &str = "Online";

/// Cover images are the ones whose URL carries a `MM-DD` style stamp, e.g. `.../07-14-banner.png`.
static DATE_STAMP: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\d{2}-\d{2}"));

/// Everything needed to post one entry to a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PostData {
    pub title: String,
    pub image_url: Url,
    pub published_at: DateTime<Utc>,
    pub reference_url: Url,
}

/// Reasons an entry's markup cannot be turned into a [`PostData`].
///
/// Extraction is all-or-nothing: any of these means no message is sent.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no image with a date-stamped source in entry content")]
    MissingImage,
    #[error("no link containing \"Online\" in entry content")]
    MissingLink,
    #[error("entry has no publication date")]
    MissingDate,
    #[error("unusable {field} URL: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: UrlValidationError,
    },
    #[error("markup query failed: {0}")]
    Markup(String),
}

/// Pulls the cover image, the "read online" link and the publication date out of an entry.
///
/// Relative URLs in the markup are resolved against the entry's own link.
///
/// # Errors
///
/// - [`ExtractionError::MissingImage`] - no `<img>` whose `src` contains `NN-NN`
/// - [`ExtractionError::MissingLink`] - no `<a>` whose text contains `Online`
/// - [`ExtractionError::MissingDate`] - the feed item had no published/updated date
/// - [`ExtractionError::InvalidUrl`] - a matched URL could not be made absolute http(s)
pub fn extract(entry: &Entry) -> Result<PostData, ExtractionError> {
    let document = Html::parse_fragment(&entry.raw_content);
    let img_selector = Selector::parse("img").map_err(|e| ExtractionError::Markup(e.to_string()))?;
    let a_selector = Selector::parse("a").map_err(|e| ExtractionError::Markup(e.to_string()))?;
    let date_stamp = DATE_STAMP
        .as_ref()
        .map_err(|e| ExtractionError::Markup(e.to_string()))?;

    let image_src = document
        .select(&img_selector)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| date_stamp.is_match(src))
        .ok_or(ExtractionError::MissingImage)?;

    let link_href = document
        .select(&a_selector)
        .find(|a| a.text().collect::<String>().contains(ONLINE_MARKER))
        .ok_or(ExtractionError::MissingLink)?
        .value()
        .attr("href")
        .ok_or(ExtractionError::MissingLink)?;

    let published_at = entry.published_at.ok_or(ExtractionError::MissingDate)?;

    let base = entry.link.as_deref();
    let image_url = resolve_url(image_src, base).map_err(|source| ExtractionError::InvalidUrl {
        field: "image",
        source,
    })?;
    let reference_url =
        resolve_url(link_href, base).map_err(|source| ExtractionError::InvalidUrl {
            field: "link",
            source,
        })?;

    Ok(PostData {
        title: entry.title.clone(),
        image_url,
        published_at,
        reference_url,
    })
}
