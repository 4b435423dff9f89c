//! Database operations for the `tweets` table.

use chrono::{DateTime, Utc};
use snspulse_core::{InsertOutcome, Label, Record};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `tweets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TweetRow {
    pub id: String,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub fetched_at: DateTime<Utc>,
    pub sentiment_score: f64,
    pub label: String,
}

impl TryFrom<TweetRow> for Record {
    type Error = DbError;

    fn try_from(row: TweetRow) -> Result<Self, Self::Error> {
        let label = row
            .label
            .parse::<Label>()
            .map_err(|reason| DbError::InvalidLabel {
                id: row.id.clone(),
                reason,
            })?;

        Ok(Record {
            id: row.id,
            author: row.author,
            text: row.text,
            created_at: row.created_at,
            fetched_at: row.fetched_at,
            sentiment_score: row.sentiment_score,
            label,
        })
    }
}

/// Read-side filter applied to the most recent rows.
///
/// An empty `labels` list means "any label".
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Case-insensitive substring that `text` must contain.
    pub text_contains: Option<String>,
    pub labels: Vec<Label>,
}

const COLUMNS: &str = "id, author, text, created_at, fetched_at, sentiment_score, label";

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn into_records(rows: Vec<TweetRow>) -> Result<Vec<Record>, DbError> {
    rows.into_iter().map(Record::try_from).collect()
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Insert `record`, relying on the primary key to reject duplicates.
///
/// Returns [`InsertOutcome::DuplicateSkipped`] when a row with the same id
/// already exists; the existing row is left untouched.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] for any failure other than an id conflict.
pub async fn insert_record(pool: &SqlitePool, record: &Record) -> Result<InsertOutcome, DbError> {
    let result = sqlx::query(
        "INSERT INTO tweets \
             (id, author, text, created_at, fetched_at, sentiment_score, label) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(&record.id)
    .bind(&record.author)
    .bind(&record.text)
    .bind(record.created_at)
    .bind(record.fetched_at)
    .bind(record.sentiment_score)
    .bind(record.label.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        Ok(InsertOutcome::DuplicateSkipped)
    } else {
        Ok(InsertOutcome::Inserted)
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Up to `limit` records, most recently inserted first.
///
/// Insertion order is SQLite's implicit `rowid`, which only ever grows for
/// this table because rows are never deleted.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored label is unreadable.
pub async fn list_recent_records(pool: &SqlitePool, limit: usize) -> Result<Vec<Record>, DbError> {
    let rows = sqlx::query_as::<_, TweetRow>(&format!(
        "SELECT {COLUMNS} FROM tweets ORDER BY rowid DESC LIMIT ?"
    ))
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    into_records(rows)
}

/// Push the `SELECT` over the `limit` most recent rows with `filter` applied.
///
/// The window is taken first and the filter second, so "the last 200 rows,
/// negatives only" may return fewer than 200.
fn push_filtered_window<'a>(
    builder: &mut QueryBuilder<'a, Sqlite>,
    limit: usize,
    filter: &'a RecordFilter,
) {
    builder.push(format!(
        "SELECT {COLUMNS}, seq FROM \
         (SELECT rowid AS seq, {COLUMNS} FROM tweets ORDER BY rowid DESC LIMIT "
    ));
    builder.push_bind(sql_limit(limit));
    builder.push(") WHERE 1 = 1");

    if let Some(needle) = filter.text_contains.as_deref().filter(|n| !n.is_empty()) {
        builder.push(" AND instr(lower(text), lower(");
        builder.push_bind(needle);
        builder.push(")) > 0");
    }

    if !filter.labels.is_empty() {
        builder.push(" AND label IN (");
        let mut separated = builder.separated(", ");
        for label in &filter.labels {
            separated.push_bind(label.as_str());
        }
        separated.push_unseparated(")");
    }
}

/// Up to `limit` most recent records narrowed by `filter`, newest first.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored label is unreadable.
pub async fn list_recent_filtered(
    pool: &SqlitePool,
    limit: usize,
    filter: &RecordFilter,
) -> Result<Vec<Record>, DbError> {
    let mut builder = QueryBuilder::<Sqlite>::new("");
    push_filtered_window(&mut builder, limit, filter);
    builder.push(" ORDER BY seq DESC");

    let rows = builder
        .build_query_as::<TweetRow>()
        .fetch_all(pool)
        .await?;

    into_records(rows)
}

/// Per-label counts over the same window as [`list_recent_filtered`].
///
/// Always returns all three labels in [`Label::ALL`] order, zero-filled.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn label_counts(
    pool: &SqlitePool,
    limit: usize,
    filter: &RecordFilter,
) -> Result<Vec<(Label, i64)>, DbError> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT label, COUNT(*) FROM (");
    push_filtered_window(&mut builder, limit, filter);
    builder.push(") GROUP BY label");

    let rows: Vec<(String, i64)> = builder.build_query_as().fetch_all(pool).await?;

    Ok(Label::ALL
        .iter()
        .map(|label| {
            let count = rows
                .iter()
                .find(|(name, _)| name == label.as_str())
                .map_or(0, |(_, n)| *n);
            (*label, count)
        })
        .collect())
}

/// Total number of stored records.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_records(pool: &SqlitePool) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tweets")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
