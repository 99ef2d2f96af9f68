//! Read-only listings that feed passive display: categories, tags and
//! aggregate counters.

use serde::{Deserialize, Serialize};

/// Category labels shown when the server cannot be reached, in display order.
pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "Formation",
    "Partenariat",
    "Événement",
    "Technologie",
    "Recherche",
];

/// Owned copy of [`DEFAULT_CATEGORIES`].
#[must_use]
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|&label| label.to_owned()).collect()
}

/// Aggregate counters for the admin dashboard.
///
/// Missing counters decode as zero, and [`SiteStats::default`] is the value
/// shown when the server cannot be reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteStats {
    /// Number of posts.
    pub total_posts: u64,
    /// Number of featured posts.
    pub featured_posts: u64,
    /// Total page views.
    pub total_views: u64,
    /// Number of registered accounts.
    pub total_users: u64,
}
