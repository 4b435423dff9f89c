//! Wire types for `GET /2/tweets/search/recent`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use snspulse_core::{RawPost, SearchResult};

/// Top-level search envelope.
///
/// `data` is absent entirely when nothing matched. Posts are kept as raw
/// JSON so one malformed post does not discard the page.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub includes: Option<Includes>,
    /// Partial errors reported alongside a 200 (e.g. a suspended author).
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

/// Expanded objects. Users are kept as raw JSON for the same reason as posts.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Includes {
    #[serde(default)]
    pub users: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct User {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Tweet {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub author_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SearchResponse {
    /// Convert into the source-neutral [`SearchResult`], skipping posts that
    /// do not parse.
    pub(crate) fn into_search_result(self, keyword: &str) -> SearchResult {
        if !self.errors.is_empty() {
            tracing::debug!(
                keyword,
                count = self.errors.len(),
                "search response carried partial errors"
            );
        }

        let posts = self
            .data
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Tweet>(value) {
                Ok(tweet) => Some(RawPost {
                    id: tweet.id,
                    author_id: tweet.author_id.unwrap_or_default(),
                    text: tweet.text,
                    created_at: tweet.created_at,
                }),
                Err(e) => {
                    tracing::warn!(keyword, error = %e, "skipping malformed post");
                    None
                }
            })
            .collect();

        let authors: HashMap<String, String> = self
            .includes
            .unwrap_or_default()
            .users
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<User>(value) {
                Ok(user) => Some((user.id, user.username)),
                Err(e) => {
                    tracing::debug!(keyword, error = %e, "skipping unreadable author");
                    None
                }
            })
            .collect();

        SearchResult { posts, authors }
    }
}
