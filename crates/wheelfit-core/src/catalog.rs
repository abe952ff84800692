//! Catalog item model and tag tokenization.
//!
//! ## Observed tag shape from the Admin API
//!
//! The Admin REST API returns `tags` as a single **comma-and-space-delimited
//! string**, e.g. `"5X112-bolt, CB 66.6, ET 42MM"` (unlike the public
//! `products.json` endpoint, which returns an array). Tags are free-form text
//! owned entirely by the store; the relay parses them per request and never
//! writes them back.

use serde::{Deserialize, Serialize};

/// A product or smart collection fetched from the commerce platform,
/// reduced to the fields the fitment filter consumes.
///
/// Instances are ephemeral: constructed from one upstream fetch, filtered,
/// serialized into the response, and dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Shopify numeric resource ID.
    pub id: i64,

    /// Display title. Absent on some trimmed `fields=` responses.
    #[serde(default)]
    pub title: Option<String>,

    /// Raw comma-delimited facet string. `None` when the store set no tags.
    #[serde(default)]
    pub tags: Option<String>,
}

/// Splits a raw tag string into trimmed, non-empty tokens.
///
/// Shopify delimits tags with `,` followed by an optional space; surrounding
/// whitespace on each token is not significant.
#[must_use]
pub fn tag_tokens(tags: &str) -> Vec<&str> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}
