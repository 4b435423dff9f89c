//! Sentiment scoring and the polling pipeline for `snspulse`.
//!
//! [`Poller`] queries a [`snspulse_core::SourceClient`] for each tracked
//! keyword, labels every post with a [`SentimentClassifier`], and writes the
//! result to a [`snspulse_core::RecordStore`], pacing itself between cycles
//! and backing off when the source is rate limited.

pub mod classifier;
pub mod error;
pub mod poller;
pub mod scorer;

pub use classifier::{Classification, PolarityScorer, SentimentClassifier};
pub use error::SentimentError;
pub use poller::{CycleReport, Poller, PollerSettings, PollerState, RunSummary};
pub use scorer::{lexicon_score, LexiconScorer};
