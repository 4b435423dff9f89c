//! The polling loop: query → classify → store, one keyword at a time.
//!
//! A cycle walks the keyword set in order. A rate-limited keyword pauses
//! everything for the fixed cooldown and the cycle then resumes at the next
//! keyword; a transient failure skips the keyword at once. After a full pass
//! the poller sleeps for the poll interval. Nothing in the loop is fatal; it
//! only stops when the shutdown token is cancelled, which every sleep and the
//! in-flight search observe immediately. An insert already under way is
//! always allowed to finish.

use std::time::Duration;

use chrono::{DateTime, Utc};
use snspulse_core::{
    AppConfig, InsertOutcome, KeywordSet, Record, RecordStore, SearchOutcome, SearchResult,
    SourceClient,
};
use tokio_util::sync::CancellationToken;

use crate::classifier::{PolarityScorer, SentimentClassifier};
use crate::scorer::LexiconScorer;

const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(15 * 60);
/// Characters of post text included in the "saved" log line.
const LOG_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerSettings {
    /// Results requested per keyword search.
    pub page_size: u32,
    /// Sleep between the end of one cycle and the start of the next.
    pub poll_interval: Duration,
    /// Pause after the source reports a rate limit.
    pub rate_limit_cooldown: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            rate_limit_cooldown: DEFAULT_RATE_LIMIT_COOLDOWN,
        }
    }
}

impl PollerSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            rate_limit_cooldown: Duration::from_secs(config.rate_limit_cooldown_secs),
        }
    }
}

/// Where the poller currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Querying { keyword: String },
    Classifying { keyword: String },
    /// Waiting out a rate-limit cooldown.
    Cooling,
    /// The last keyword failed transiently and was dropped for this cycle.
    Skipping { keyword: String },
    /// Between cycles.
    Sleeping,
    Stopped,
}

/// What happened during one pass over the keyword set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub saved: usize,
    pub duplicates: usize,
    pub store_failures: usize,
    pub rate_limited: Vec<String>,
    pub transient_errors: Vec<String>,
    pub empty_keywords: Vec<String>,
    /// `false` when the pass was cut short by shutdown.
    pub completed: bool,
}

/// Totals across every cycle of a [`Poller::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles_completed: u64,
    pub saved: usize,
    pub duplicates: usize,
    pub store_failures: usize,
    pub rate_limited: usize,
    pub transient_errors: usize,
}

impl RunSummary {
    fn absorb(&mut self, report: &CycleReport) {
        if report.completed {
            self.cycles_completed += 1;
        }
        self.saved += report.saved;
        self.duplicates += report.duplicates;
        self.store_failures += report.store_failures;
        self.rate_limited += report.rate_limited.len();
        self.transient_errors += report.transient_errors.len();
    }
}

pub struct Poller<S, R, P = LexiconScorer> {
    source: S,
    store: R,
    classifier: SentimentClassifier<P>,
    keywords: KeywordSet,
    settings: PollerSettings,
    shutdown: CancellationToken,
    state: PollerState,
    last_fetched_at: Option<DateTime<Utc>>,
}

impl<S, R, P> Poller<S, R, P>
where
    S: SourceClient,
    R: RecordStore,
    P: PolarityScorer,
{
    pub fn new(
        source: S,
        store: R,
        classifier: SentimentClassifier<P>,
        keywords: KeywordSet,
        settings: PollerSettings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            source,
            store,
            classifier,
            keywords,
            settings,
            shutdown,
            state: PollerState::Idle,
            last_fetched_at: None,
        }
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    /// Raise the `fetched_at` floor to the newest stored record, so a clock
    /// that stepped backwards across a restart cannot produce rows older than
    /// those already in the store.
    pub async fn restore_fetched_at_floor(&mut self) {
        match self.store.query_recent(1).await {
            Ok(newest) => {
                if let Some(record) = newest.first() {
                    self.last_fetched_at = self.last_fetched_at.max(Some(record.fetched_at));
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "could not read newest record; fetched_at floor not restored"
                );
            }
        }
    }

    /// Poll until the shutdown token is cancelled.
    pub async fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary::default();
        self.restore_fetched_at_floor().await;
        tracing::info!(
            keywords = ?self.keywords.as_slice(),
            page_size = self.settings.page_size,
            poll_interval_secs = self.settings.poll_interval.as_secs(),
            "poller started"
        );

        while !self.shutdown.is_cancelled() {
            let report = self.run_cycle().await;
            summary.absorb(&report);
            if !report.completed {
                break;
            }

            tracing::info!(
                saved = report.saved,
                duplicates = report.duplicates,
                store_failures = report.store_failures,
                rate_limited = report.rate_limited.len(),
                transient_errors = report.transient_errors.len(),
                empty = report.empty_keywords.len(),
                "cycle complete"
            );

            self.state = PollerState::Sleeping;
            if !self.pause(self.settings.poll_interval).await {
                break;
            }
        }

        self.state = PollerState::Stopped;
        tracing::info!(
            cycles = summary.cycles_completed,
            saved = summary.saved,
            duplicates = summary.duplicates,
            "poller stopped"
        );
        summary
    }

    /// One pass over every keyword, in order.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        let keywords = self.keywords.clone();

        for keyword in keywords.iter() {
            if self.shutdown.is_cancelled() {
                return report;
            }

            self.state = PollerState::Querying {
                keyword: keyword.to_owned(),
            };
            let outcome = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => None,
                outcome = self.source.search(keyword, self.settings.page_size) => Some(outcome),
            };
            let Some(outcome) = outcome else {
                return report;
            };

            match outcome {
                SearchOutcome::RateLimited => {
                    report.rate_limited.push(keyword.to_owned());
                    tracing::warn!(
                        keyword,
                        cooldown_secs = self.settings.rate_limit_cooldown.as_secs(),
                        "rate limit hit; pausing all queries"
                    );
                    self.state = PollerState::Cooling;
                    if !self.pause(self.settings.rate_limit_cooldown).await {
                        return report;
                    }
                }
                SearchOutcome::Transient { reason } => {
                    report.transient_errors.push(keyword.to_owned());
                    tracing::error!(keyword, error = %reason, "search failed; skipping keyword");
                    self.state = PollerState::Skipping {
                        keyword: keyword.to_owned(),
                    };
                }
                SearchOutcome::Found(result) if result.posts.is_empty() => {
                    report.empty_keywords.push(keyword.to_owned());
                    tracing::debug!(keyword, "search returned no posts");
                }
                SearchOutcome::Found(result) => {
                    self.state = PollerState::Classifying {
                        keyword: keyword.to_owned(),
                    };
                    if !self.ingest(keyword, &result, &mut report).await {
                        return report;
                    }
                }
            }
        }

        report.completed = true;
        self.state = PollerState::Idle;
        report
    }

    /// Classify and store every post in `result`. Returns `false` if shutdown
    /// was requested part-way through.
    async fn ingest(
        &mut self,
        keyword: &str,
        result: &SearchResult,
        report: &mut CycleReport,
    ) -> bool {
        for post in &result.posts {
            if self.shutdown.is_cancelled() {
                return false;
            }

            let author = result.author_for(post);
            let classification = self.classifier.classify(&post.text);
            let record = Record::new(
                post.id.clone(),
                author.to_owned(),
                post.text.clone(),
                post.created_at,
                self.next_fetched_at(),
                classification.score,
            );

            match self.store.insert(&record).await {
                Ok(InsertOutcome::Inserted) => {
                    report.saved += 1;
                    tracing::info!(
                        keyword,
                        post_id = %record.id,
                        author = %record.author,
                        label = %record.label,
                        score = record.sentiment_score,
                        preview = %preview(&record.text),
                        "saved post"
                    );
                }
                Ok(InsertOutcome::DuplicateSkipped) => {
                    report.duplicates += 1;
                    tracing::info!(keyword, post_id = %record.id, "duplicate post skipped");
                }
                Err(e) => {
                    report.store_failures += 1;
                    tracing::error!(
                        keyword,
                        post_id = %record.id,
                        error = %e,
                        "failed to store post"
                    );
                }
            }
        }
        true
    }

    /// Current time, never earlier than the previous record's `fetched_at`.
    fn next_fetched_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let at = match self.last_fetched_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_fetched_at = Some(at);
        at
    }

    /// Sleep for `duration` unless shutdown comes first. Returns `false` on shutdown.
    async fn pause(&self, duration: Duration) -> bool {
        tokio::select! {
            biased;
            () = self.shutdown.cancelled() => false,
            () = tokio::time::sleep(duration) => true,
        }
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
