//! The persisted [`Record`] and the [`RecordStore`] seam.

use std::future::Future;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author handle stored when a post's author id has no resolved username.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Sentiment label derived from a polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Neutral,
    Negative,
}

impl Label {
    /// All labels in display order.
    pub const ALL: [Label; 3] = [Label::Positive, Label::Neutral, Label::Negative];

    /// Derive the label for a polarity score.
    ///
    /// `> 0` is positive, `< 0` is negative, exactly `0` is neutral. A NaN
    /// score compares false both ways and is therefore neutral.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > 0.0 {
            Label::Positive
        } else if score < 0.0 {
            Label::Negative
        } else {
            Label::Neutral
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Neutral => "neutral",
            Label::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Label::Positive),
            "neutral" => Ok(Label::Neutral),
            "negative" => Ok(Label::Negative),
            other => Err(format!(
                "unknown label '{other}'; expected positive, neutral, or negative"
            )),
        }
    }
}

/// One ingested, classified post. Created once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// External post id; primary key in the store.
    pub id: String,
    /// Display handle, or [`UNKNOWN_AUTHOR`].
    pub author: String,
    pub text: String,
    /// Creation time asserted by the source.
    pub created_at: DateTime<Utc>,
    /// Local ingestion time.
    pub fetched_at: DateTime<Utc>,
    pub sentiment_score: f64,
    pub label: Label,
}

impl Record {
    /// Build a record, deriving `label` from `sentiment_score`.
    ///
    /// This is the only constructor the pipeline uses, so a stored label can
    /// never disagree with its score.
    #[must_use]
    pub fn new(
        id: String,
        author: String,
        text: String,
        created_at: DateTime<Utc>,
        fetched_at: DateTime<Utc>,
        sentiment_score: f64,
    ) -> Self {
        Self {
            id,
            author,
            text,
            created_at,
            fetched_at,
            sentiment_score,
            label: Label::from_score(sentiment_score),
        }
    }
}

/// Result of a successful [`RecordStore::insert`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A record with the same id already exists; the store is unchanged.
    DuplicateSkipped,
}

/// Durable, deduplicating storage for records keyed by external post id.
///
/// Uniqueness is enforced by the write itself; callers never pre-check.
pub trait RecordStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist `record` unless its id is already stored.
    fn insert(
        &self,
        record: &Record,
    ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send;

    /// Up to `limit` records, most recently inserted first.
    fn query_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send;
}
