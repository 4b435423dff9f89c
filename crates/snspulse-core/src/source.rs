//! The [`SourceClient`] seam over the external post search.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Utc};

use crate::record::UNKNOWN_AUTHOR;

/// A post as returned by the source, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// One page of search results plus whatever author handles the source
/// resolved alongside them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub posts: Vec<RawPost>,
    /// `author_id` → display handle. May be partial or empty.
    pub authors: HashMap<String, String>,
}

impl SearchResult {
    /// Display handle for `post`, falling back to [`UNKNOWN_AUTHOR`].
    #[must_use]
    pub fn author_for(&self, post: &RawPost) -> &str {
        self.authors
            .get(&post.author_id)
            .map_or(UNKNOWN_AUTHOR, String::as_str)
    }
}

/// Outcome of a single keyword search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(SearchResult),
    /// The source asked us to stop calling it for a while.
    RateLimited,
    /// Recoverable failure for this keyword (network, bad payload, auth hiccup).
    Transient { reason: String },
}

/// External search capability queried once per keyword per cycle.
///
/// Returned posts carry no ordering guarantee.
pub trait SourceClient {
    fn search(&self, keyword: &str, limit: u32) -> impl Future<Output = SearchOutcome> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(author_id: &str) -> RawPost {
        RawPost {
            id: "1".to_string(),
            author_id: author_id.to_string(),
            text: "hello".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn author_for_resolves_known_id() {
        let mut result = SearchResult::default();
        result
            .authors
            .insert("u1".to_string(), "alice".to_string());
        assert_eq!(result.author_for(&post("u1")), "alice");
    }

    #[test]
    fn author_for_falls_back_to_unknown() {
        let mut result = SearchResult::default();
        result
            .authors
            .insert("u1".to_string(), "alice".to_string());
        assert_eq!(result.author_for(&post("u2")), UNKNOWN_AUTHOR);
    }

    #[test]
    fn author_for_with_empty_map_is_unknown() {
        let result = SearchResult::default();
        assert_eq!(result.author_for(&post("u1")), UNKNOWN_AUTHOR);
    }
}
