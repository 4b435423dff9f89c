use thiserror::Error;

/// Errors returned by the search client.
#[derive(Debug, Error)]
pub enum TwitterError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429. `reset_at` is the epoch second from `x-rate-limit-reset`, if sent.
    #[error("rate limited (reset at {reset_at:?})")]
    RateLimited { reset_at: Option<i64> },

    /// Any other non-2xx status (401 bad token, 503 overload, ...).
    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
