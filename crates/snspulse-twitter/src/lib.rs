//! Client for the recent-search endpoint of the X/Twitter v2 API.
//!
//! [`TwitterClient`] implements [`snspulse_core::SourceClient`], folding HTTP
//! 429 into `SearchOutcome::RateLimited` and every other failure into
//! `SearchOutcome::Transient`.

pub mod client;
pub mod error;
mod types;

pub use client::TwitterClient;
pub use error::TwitterError;
