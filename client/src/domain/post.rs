//! Post model and the normalisation that keeps it total.
//!
//! The server omits optional columns freely. Every [`Post`] handed to a
//! caller is built through [`Post::from_record`], which substitutes defaults
//! instead of rejecting the record, so rendering code never has to branch on
//! missing fields.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ports::PostRecord;

/// Category shown when the server has none.
pub const UNCATEGORISED: &str = "Non classé";

/// Reading time shown when the server has none.
pub const DEFAULT_READ_TIME: &str = "5 min";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Server-assigned post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier as used in request paths.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PostId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A content/news item as shown to readers.
///
/// ## Invariants
/// - `excerpt`, `category`, `read_time` and `tags` are always present;
///   `category` and `read_time` are never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Server-assigned identifier.
    pub id: PostId,
    /// Headline.
    pub title: String,
    /// Full body.
    pub content: String,
    /// Short summary, possibly empty.
    pub excerpt: String,
    /// Category label.
    pub category: String,
    /// Author name.
    pub author: String,
    /// Publication date as the server sent it, or today as `YYYY-MM-DD`.
    pub date: String,
    /// Estimated reading time, e.g. `"5 min"`.
    pub read_time: String,
    /// Optional image reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether the post is highlighted on listing pages.
    pub featured: bool,
    /// Ordered tags.
    pub tags: Vec<String>,
    /// Classification such as `news`, `event` or `blog`.
    #[serde(rename = "type")]
    pub post_type: String,
}

impl Post {
    /// Build a total post from a loosely shaped server record.
    ///
    /// `today` replaces a missing or blank publication date. Any other value
    /// is kept verbatim, whatever its format.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use content_client::domain::Post;
    /// use content_client::domain::ports::PostRecord;
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    /// let post = Post::from_record(PostRecord::with_id(7), today);
    /// assert_eq!(post.read_time, "5 min");
    /// assert_eq!(post.date, "2025-03-14");
    /// assert!(post.tags.is_empty());
    /// ```
    #[must_use]
    pub fn from_record(record: PostRecord, today: NaiveDate) -> Self {
        let PostRecord {
            id,
            title,
            content,
            excerpt,
            category,
            author,
            date,
            read_time,
            image,
            featured,
            tags,
            post_type,
        } = record;

        Self {
            id: PostId::new(id),
            title: title.unwrap_or_default(),
            content: content.unwrap_or_default(),
            excerpt: excerpt.unwrap_or_default(),
            category: non_blank(category).unwrap_or_else(|| UNCATEGORISED.to_owned()),
            author: author.unwrap_or_default(),
            date: non_blank(date).unwrap_or_else(|| today.format(DATE_FORMAT).to_string()),
            read_time: non_blank(read_time).unwrap_or_else(|| DEFAULT_READ_TIME.to_owned()),
            image: non_blank(image),
            featured: featured.unwrap_or(false),
            tags: tags.unwrap_or_default(),
            post_type: post_type.unwrap_or_default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}


/// Payload for creating a post: every field except the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    /// Headline.
    pub title: String,
    /// Full body.
    pub content: String,
    /// Short summary.
    pub excerpt: String,
    /// Category label.
    pub category: String,
    /// Author name.
    pub author: String,
    /// Publication date.
    pub date: NaiveDate,
    /// Estimated reading time.
    pub read_time: String,
    /// Optional image reference, typically an uploaded image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Highlight flag.
    pub featured: bool,
    /// Ordered tags.
    pub tags: Vec<String>,
    /// Classification.
    #[serde(rename = "type")]
    pub post_type: String,
}

impl NewPost {
    /// Start a draft with the required fields and default presentation.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
        post_type: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            excerpt: String::new(),
            category: UNCATEGORISED.to_owned(),
            author: author.into(),
            date,
            read_time: DEFAULT_READ_TIME.to_owned(),
            image: None,
            featured: false,
            tags: Vec::new(),
            post_type: post_type.into(),
        }
    }
}

/// Partial update; only the fields that are set are sent.
///
/// # Examples
/// ```
/// use content_client::domain::PostPatch;
///
/// let patch = PostPatch {
///     title: Some("Nouvelle carte".to_owned()),
///     ..PostPatch::default()
/// };
/// assert_eq!(
///     serde_json::to_value(&patch).unwrap(),
///     serde_json::json!({ "title": "Nouvelle carte" })
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    /// New headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// New category label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New author name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// New publication date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// New reading time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    /// New image reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// New highlight flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    /// Replacement tag list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New classification.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub post_type: Option<String>,
}

impl PostPatch {
    /// True when no field would be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
