//! Every cycle outcome must reach the operational log at the default level.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use snspulse_core::{KeywordSet, RawPost, SearchOutcome, SearchResult, SourceClient};
use snspulse_db::{connect_pool, run_migrations, PoolConfig, SqliteRecordStore};
use snspulse_sentiment::{LexiconScorer, Poller, PollerSettings, SentimentClassifier};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Shared buffer the fmt layer writes into.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// `ai` always returns post 42, `cloud` is rate limited, `aws` fails.
struct FixedSource;

impl SourceClient for FixedSource {
    async fn search(&self, keyword: &str, _limit: u32) -> SearchOutcome {
        match keyword {
            "ai" => SearchOutcome::Found(SearchResult {
                posts: vec![RawPost {
                    id: "42".to_string(),
                    author_id: "u1".to_string(),
                    text: "I love ai and data".to_string(),
                    created_at: Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap(),
                }],
                authors: [("u1".to_string(), "alice".to_string())].into(),
            }),
            "cloud" => SearchOutcome::RateLimited,
            _ => SearchOutcome::Transient {
                reason: "connection reset".to_string(),
            },
        }
    }
}

#[tokio::test]
async fn all_outcome_kinds_are_logged_at_info() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let pool = connect_pool("sqlite::memory:", PoolConfig::single_connection())
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    let settings = PollerSettings {
        rate_limit_cooldown: Duration::ZERO,
        ..PollerSettings::default()
    };
    let mut poller = Poller::new(
        FixedSource,
        SqliteRecordStore::new(pool),
        SentimentClassifier::new(LexiconScorer),
        KeywordSet::new(["ai", "cloud", "aws"]).unwrap(),
        settings,
        CancellationToken::new(),
    );

    poller.run_cycle().await;
    poller.run_cycle().await;

    let output = log.contents();
    for expected in [
        "saved post",
        "duplicate post skipped",
        "rate limit hit",
        "search failed",
    ] {
        assert!(
            output.contains(expected),
            "missing `{expected}` in log:\n{output}"
        );
    }
    assert!(
        output
            .lines()
            .any(|l| l.contains("INFO") && l.contains("duplicate post skipped")),
        "duplicate line should be at INFO:\n{output}"
    );
}
