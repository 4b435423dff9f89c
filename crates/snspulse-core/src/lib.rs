//! Domain types and configuration shared by every `snspulse` crate.
//!
//! The two seams of the ingestion pipeline live here: [`SourceClient`]
//! (where posts come from) and [`RecordStore`] (where classified records
//! go). Concrete implementations live in `snspulse-twitter` and
//! `snspulse-db`.

pub mod app_config;
pub mod config;
pub mod error;
pub mod keywords;
pub mod record;
pub mod source;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_DATABASE_URL};
pub use error::ConfigError;
pub use keywords::{load_keywords_file, KeywordSet};
pub use record::{InsertOutcome, Label, Record, RecordStore, UNKNOWN_AUTHOR};
pub use source::{RawPost, SearchOutcome, SearchResult, SourceClient};
