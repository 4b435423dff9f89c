use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("text contains no scorable words")]
    EmptyText,

    #[error("scorer failed: {0}")]
    Scorer(String),
}
