//! License persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `licenses` table.
//! Records are insert-only: no update or delete statements exist because
//! licenses are immutable after issuance.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::LicenseRecord;

/// Insert a new license record.
///
/// A `UNIQUE` violation on `key` surfaces as an `sqlx::Error`; the caller
/// maps any persistence failure to a generic internal error.
pub async fn insert(pool: &PgPool, record: &LicenseRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO licenses (id, key, message, expiration, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(record.id)
    .bind(&record.key)
    .bind(&record.message)
    .bind(record.expiration)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all licenses from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<LicenseRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, LicenseRow>(
        "SELECT id, key, message, expiration, created_at
         FROM licenses ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(LicenseRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct LicenseRow {
    id: Uuid,
    key: String,
    message: String,
    expiration: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl LicenseRow {
    fn into_record(self) -> LicenseRecord {
        LicenseRecord {
            id: self.id,
            key: self.key,
            message: self.message,
            expiration: self.expiration,
            created_at: self.created_at,
        }
    }
}
