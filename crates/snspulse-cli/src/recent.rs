//! `snspulse recent`: read-only view of stored records.

use anyhow::Context;
use snspulse_core::Record;
use snspulse_db::RecordFilter;

/// Characters of post text shown per row.
const TEXT_COLUMN_CHARS: usize = 60;

/// Print up to `limit` newest records matching `filter`, then label totals.
///
/// # Errors
///
/// Returns an error if the database does not exist or cannot be queried.
pub(crate) async fn run_recent(
    database_url: &str,
    limit: usize,
    filter: &RecordFilter,
) -> anyhow::Result<()> {
    let pool = snspulse_db::open_existing_pool(database_url)
        .await
        .with_context(|| format!("no readable database at {database_url}"))?;

    let records = snspulse_db::list_recent_filtered(&pool, limit, filter).await?;
    if records.is_empty() {
        println!("no records found; run `snspulse poll` first");
        pool.close().await;
        return Ok(());
    }

    println!(
        "{:<20}{:<18}{:<18}{:<10}{:>7}  TEXT",
        "ID", "AUTHOR", "FETCHED", "LABEL", "SCORE"
    );
    for record in &records {
        println!("{}", format_row(record));
    }

    let counts = snspulse_db::label_counts(&pool, limit, filter).await?;
    let totals: Vec<String> = counts
        .iter()
        .map(|(label, n)| format!("{label}={n}"))
        .collect();
    println!();
    println!("{} shown  {}", records.len(), totals.join("  "));

    pool.close().await;
    Ok(())
}

pub(crate) fn format_row(record: &Record) -> String {
    let fetched = record.fetched_at.format("%Y-%m-%d %H:%M").to_string();
    let text: String = record
        .text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .take(TEXT_COLUMN_CHARS)
        .collect();
    format!(
        "{:<20}{:<18}{:<18}{:<10}{:>+7.3}  {}",
        record.id,
        record.author,
        fetched,
        record.label.as_str(),
        record.sentiment_score,
        text
    )
}
