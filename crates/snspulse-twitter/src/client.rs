//! HTTP client for the recent-search endpoint.
//!
//! Wraps `reqwest` with bearer-token auth, status classification, and typed
//! response decoding. No retries happen here: the poller decides what a
//! failed keyword means for the current cycle.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use snspulse_core::{AppConfig, SearchOutcome, SearchResult, SourceClient};

use crate::error::TwitterError;
use crate::types::SearchResponse;

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/";
const DEFAULT_USER_AGENT: &str = "snspulse/0.1 (sentiment-ingest)";
const SEARCH_PATH: &str = "2/tweets/search/recent";
const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";
/// Cap on how much of an error body is kept in [`TwitterError::UnexpectedStatus`].
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Client for `GET /2/tweets/search/recent`.
///
/// Use [`TwitterClient::new`] for production or
/// [`TwitterClient::with_base_url`] to point at a mock server in tests.
pub struct TwitterClient {
    client: Client,
    bearer_token: String,
    search_url: Url,
    query_filter: String,
}

impl std::fmt::Debug for TwitterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterClient")
            .field("bearer_token", &"[redacted]")
            .field("search_url", &self.search_url.as_str())
            .field("query_filter", &self.query_filter)
            .finish_non_exhaustive()
    }
}

impl TwitterClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`TwitterError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(bearer_token: &str, timeout_secs: u64) -> Result<Self, TwitterError> {
        Self::with_base_url(bearer_token, timeout_secs, DEFAULT_USER_AGENT, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TwitterError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`TwitterError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        bearer_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, TwitterError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Ensure exactly one trailing slash so `join` appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let search_url = Url::parse(&normalised)
            .and_then(|base| base.join(SEARCH_PATH))
            .map_err(|e| TwitterError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            bearer_token: bearer_token.to_owned(),
            search_url,
            query_filter: String::new(),
        })
    }

    /// Builds a client from the loaded application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`TwitterClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, TwitterError> {
        Ok(Self::with_base_url(
            &config.bearer_token,
            config.request_timeout_secs,
            &config.user_agent,
            &config.search_base_url,
        )?
        .with_query_filter(&config.query_filter))
    }

    /// Search operators appended to every keyword, e.g. `lang:en -is:retweet`.
    #[must_use]
    pub fn with_query_filter(mut self, filter: &str) -> Self {
        self.query_filter = filter.trim().to_owned();
        self
    }

    /// The full query string sent for `keyword`.
    #[must_use]
    pub fn build_query(&self, keyword: &str) -> String {
        if self.query_filter.is_empty() {
            keyword.to_owned()
        } else {
            format!("{keyword} {}", self.query_filter)
        }
    }

    /// Fetches up to `max_results` recent posts matching `keyword`, with the
    /// authors' usernames expanded.
    ///
    /// # Errors
    ///
    /// - [`TwitterError::RateLimited`] on HTTP 429.
    /// - [`TwitterError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`TwitterError::Http`] on network failure or timeout.
    /// - [`TwitterError::Deserialize`] if the body is not the expected shape.
    pub async fn search_recent(
        &self,
        keyword: &str,
        max_results: u32,
    ) -> Result<SearchResult, TwitterError> {
        let query = self.build_query(keyword);
        let max_results = max_results.to_string();

        let response = self
            .client
            .get(self.search_url.clone())
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("query", query.as_str()),
                ("max_results", max_results.as_str()),
                ("tweet.fields", "author_id,created_at"),
                ("expansions", "author_id"),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let reset_at = response
                .headers()
                .get(RATE_LIMIT_RESET_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<i64>().ok());
            return Err(TwitterError::RateLimited { reset_at });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TwitterError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| TwitterError::Deserialize {
                context: format!("search(query={query})"),
                source: e,
            })?;

        Ok(parsed.into_search_result(keyword))
    }
}

impl SourceClient for TwitterClient {
    async fn search(&self, keyword: &str, limit: u32) -> SearchOutcome {
        match self.search_recent(keyword, limit).await {
            Ok(result) => SearchOutcome::Found(result),
            Err(TwitterError::RateLimited { reset_at }) => {
                // The cooldown is fixed; the reset hint is only recorded.
                tracing::debug!(keyword, ?reset_at, "search endpoint returned 429");
                SearchOutcome::RateLimited
            }
            Err(e) => SearchOutcome::Transient {
                reason: e.to_string(),
            },
        }
    }
}
