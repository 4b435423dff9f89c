//! Integration tests for the SQLite record store. Each test runs against a
//! fresh in-memory database, except the tests that need a file on disk.

use chrono::{Duration, TimeZone, Utc};
use snspulse_core::{InsertOutcome, Label, Record, RecordStore};
use snspulse_db::{
    connect_pool, count_records, health_check, label_counts, list_recent_filtered,
    open_existing_pool, run_migrations, PoolConfig, RecordFilter, SqliteRecordStore,
};

async fn memory_store() -> SqliteRecordStore {
    let pool = connect_pool("sqlite::memory:", PoolConfig::single_connection())
        .await
        .expect("in-memory pool should open");
    run_migrations(&pool).await.expect("migrations should apply");
    SqliteRecordStore::new(pool)
}

fn record(id: &str, text: &str, score: f64) -> Record {
    let created_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    Record::new(
        id.to_string(),
        "alice".to_string(),
        text.to_string(),
        created_at,
        created_at + Duration::seconds(30),
        score,
    )
}

#[tokio::test]
async fn migrations_report_applied_count_once() {
    let pool = connect_pool("sqlite::memory:", PoolConfig::single_connection())
        .await
        .unwrap();
    assert_eq!(run_migrations(&pool).await.unwrap(), 1);
    assert_eq!(run_migrations(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn insert_then_read_back_preserves_every_field() {
    let store = memory_store().await;
    let original = record("42", "I love ai and data", 0.5);

    let outcome = store.insert(&original).await.unwrap();
    assert_eq!(outcome, InsertOutcome::Inserted);

    let stored = store.query_recent(10).await.unwrap();
    assert_eq!(stored, vec![original]);
}

#[tokio::test]
async fn duplicate_id_is_skipped_and_row_count_unchanged() {
    let store = memory_store().await;
    store.insert(&record("7", "first text", 0.2)).await.unwrap();

    let second = store.insert(&record("7", "different text", -0.9)).await.unwrap();
    assert_eq!(second, InsertOutcome::DuplicateSkipped);
    assert_eq!(count_records(store.pool()).await.unwrap(), 1);

    // The original row is untouched.
    let stored = store.query_recent(1).await.unwrap();
    assert_eq!(stored[0].text, "first text");
    assert_eq!(stored[0].label, Label::Positive);
}

#[tokio::test]
async fn query_recent_is_newest_insert_first() {
    let store = memory_store().await;
    // Ids deliberately sort opposite to insertion order.
    for id in ["c", "b", "a"] {
        store.insert(&record(id, "text", 0.0)).await.unwrap();
    }

    let ids: Vec<String> = store
        .query_recent(2)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, ["a", "b"]);
}

#[tokio::test]
async fn query_recent_beyond_size_returns_whole_store() {
    let store = memory_store().await;
    for id in ["1", "2", "3"] {
        store.insert(&record(id, "text", 0.0)).await.unwrap();
    }
    assert_eq!(store.query_recent(100).await.unwrap().len(), 3);
}

#[tokio::test]
async fn query_recent_on_empty_store_is_empty() {
    let store = memory_store().await;
    assert!(store.query_recent(5).await.unwrap().is_empty());
}

#[tokio::test]
async fn filtered_read_matches_text_case_insensitively_and_labels() {
    let store = memory_store().await;
    store.insert(&record("1", "Cloud costs are terrible", -0.6)).await.unwrap();
    store.insert(&record("2", "the cloud is great", 0.4)).await.unwrap();
    store.insert(&record("3", "python release notes", 0.0)).await.unwrap();
    store.insert(&record("4", "CLOUD outage again", -0.3)).await.unwrap();

    let filter = RecordFilter {
        text_contains: Some("cloud".to_string()),
        labels: vec![Label::Negative],
    };
    let ids: Vec<String> = list_recent_filtered(store.pool(), 10, &filter)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, ["4", "1"]);
}

#[tokio::test]
async fn filtered_read_applies_window_before_filter() {
    let store = memory_store().await;
    store.insert(&record("old", "ai is great", 0.4)).await.unwrap();
    store.insert(&record("new", "ai is bad", -0.4)).await.unwrap();

    let filter = RecordFilter {
        text_contains: None,
        labels: vec![Label::Positive],
    };
    // Only the newest row is in the window, and it is negative.
    let rows = list_recent_filtered(store.pool(), 1, &filter).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn label_counts_are_zero_filled() {
    let store = memory_store().await;
    store.insert(&record("1", "good", 0.3)).await.unwrap();
    store.insert(&record("2", "fine", 0.1)).await.unwrap();

    let counts = label_counts(store.pool(), 100, &RecordFilter::default())
        .await
        .unwrap();
    assert_eq!(
        counts,
        vec![(Label::Positive, 2), (Label::Neutral, 0), (Label::Negative, 0)]
    );
}

#[tokio::test]
async fn inserted_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("tweets.db").display());

    {
        let pool = connect_pool(&url, PoolConfig::default()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let store = SqliteRecordStore::new(pool);
        store.insert(&record("99", "persist me", 0.1)).await.unwrap();
        store.close().await;
    }

    let pool = connect_pool(&url, PoolConfig::default()).await.unwrap();
    assert_eq!(run_migrations(&pool).await.unwrap(), 0);
    let store = SqliteRecordStore::new(pool);
    let stored = store.query_recent(10).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, "99");
    assert_eq!(
        store.insert(&record("99", "persist me", 0.1)).await.unwrap(),
        InsertOutcome::DuplicateSkipped
    );
}

#[tokio::test]
async fn open_existing_does_not_create_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typo.db");
    let url = format!("sqlite://{}", path.display());

    assert!(open_existing_pool(&url).await.is_err());
    assert!(!path.exists());
}

#[tokio::test]
async fn open_existing_reads_what_the_writer_stored() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("tweets.db").display());

    let writer = connect_pool(&url, PoolConfig::default()).await.unwrap();
    run_migrations(&writer).await.unwrap();
    health_check(&writer).await.unwrap();
    SqliteRecordStore::new(writer.clone())
        .insert(&record("7", "visible to readers", -0.2))
        .await
        .unwrap();

    let reader = open_existing_pool(&url).await.unwrap();
    let rows = list_recent_filtered(&reader, 10, &RecordFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label, Label::Negative);

    reader.close().await;
    writer.close().await;
}
