//! [`RecordStore`] backed by the SQLite `tweets` table.

use snspulse_core::{InsertOutcome, Record, RecordStore};
use sqlx::SqlitePool;

use crate::tweets::{insert_record, list_recent_records};
use crate::DbError;

/// The poller's handle on the database. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for in-flight queries to finish and close every connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl RecordStore for SqliteRecordStore {
    type Error = DbError;

    async fn insert(&self, record: &Record) -> Result<InsertOutcome, DbError> {
        insert_record(&self.pool, record).await
    }

    async fn query_recent(&self, limit: usize) -> Result<Vec<Record>, DbError> {
        list_recent_records(&self.pool, limit).await
    }
}
