//! Defines the [`Article`] type, the record decoded from each file in the
//! content directory.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// A single article record. Each source file holds exactly one JSON object of
/// the form:
///
/// ```json
/// {
///     "Title": "Hello, world!",
///     "Url": "hello-world",
///     "Tags": ["go", "web"],
///     "Date": "2016-03-01T10:00:00Z",
///     "LimitedContent": "The first few sentences..."
/// }
/// ```
///
/// Unknown fields are ignored.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Article {
    /// The title of the article. Used as the key of
    /// [`crate::aggregator::Aggregator::title_to_url`].
    #[serde(rename = "Title")]
    pub title: String,

    /// The article's URL path segment, rendered under the article link
    /// prefix (e.g., `/article/{url}`).
    #[serde(rename = "Url")]
    pub url: String,

    /// The tags associated with the article, in source order.
    #[serde(default, rename = "Tags")]
    pub tags: Vec<String>,

    /// The publication date. Must be an RFC 3339 timestamp.
    #[serde(rename = "Date")]
    pub date: DateTime<FixedOffset>,

    /// The truncated article body. Truncation happens upstream; this is
    /// inserted into the listing as-is.
    #[serde(rename = "LimitedContent")]
    pub limited_content: String,
}

impl std::str::FromStr for Article {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}
