//! Word count persistence
//!
//! Insert-or-increment keyed on `(date, word)`. The whole mapping for one
//! invocation commits in a single transaction: either every row is visible
//! or, on failure, none are.

use crate::types::WordCount;
use chrono::NaiveDate;
use kokkai_common::Result;
use sqlx::SqlitePool;

/// Upsert the aggregated counts for one date in one transaction
///
/// Existing `(date, word)` rows accumulate: re-ingesting the same date adds
/// to the stored count rather than overwriting it.
pub async fn upsert_word_counts(
    pool: &SqlitePool,
    date: NaiveDate,
    counts: &WordCount,
) -> Result<()> {
    let day = date.format("%Y-%m-%d").to_string();

    let mut tx = pool.begin().await?;

    for (word, count) in counts {
        sqlx::query(
            r#"
            INSERT INTO word_counts (date, word, count)
            VALUES (?, ?, ?)
            ON CONFLICT(date, word) DO UPDATE SET
                count = word_counts.count + excluded.count,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(&day)
        .bind(word)
        .bind(*count as i64)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// Load the stored count for one `(date, word)` pair
pub async fn load_count(pool: &SqlitePool, date: NaiveDate, word: &str) -> Result<Option<i64>> {
    let day = date.format("%Y-%m-%d").to_string();

    let count = sqlx::query_scalar("SELECT count FROM word_counts WHERE date = ? AND word = ?")
        .bind(day)
        .bind(word)
        .fetch_optional(pool)
        .await?;

    Ok(count)
}

/// Load all stored counts for one date
pub async fn load_counts_for_date(pool: &SqlitePool, date: NaiveDate) -> Result<WordCount> {
    let day = date.format("%Y-%m-%d").to_string();

    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT word, count FROM word_counts WHERE date = ?")
            .bind(day)
            .fetch_all(pool)
            .await?;

    Ok(rows
        .into_iter()
        .map(|(word, count)| (word, count as u64))
        .collect())
}
