//! Sample data for `recordql system seed`

use chrono::NaiveDate;
use sqlx::SqlitePool;

use super::error::SqliteError;
use crate::domain::filter::DATE_FORMAT;

/// `(name, email_address, age)` of the sample people
const SAMPLE_PEOPLE: &[(&str, &str, i64)] = &[
    ("Person 1", "person-1@example.com", 10),
    ("Person 2", "person-2@example.com", 20),
    ("Person 3", "person-3@example.com", 30),
];

/// Insert the sample people in one transaction, all created on `created_at`.
///
/// Returns the number of inserted rows.
pub async fn seed_people(pool: &SqlitePool, created_at: NaiveDate) -> Result<u64, SqliteError> {
    let created_at = created_at.format(DATE_FORMAT).to_string();
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for (name, email_address, age) in SAMPLE_PEOPLE {
        let result = sqlx::query(
            "INSERT INTO person (name, email_address, age, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email_address)
        .bind(age)
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    tracing::debug!(inserted, "Seeded sample people");
    Ok(inserted)
}
