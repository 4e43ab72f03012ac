//! Database operations for the `unmapped_listings` quarantine.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `unmapped_listings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UnmappedListingRow {
    pub id: i64,
    pub product_id: i64,
    pub marketplace_id: Option<i64>,
    pub external_title: String,
    pub external_url: String,
    pub ram_gb: Option<i32>,
    pub storage_gb: Option<i32>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Input for [`upsert_unmapped_listing`].
#[derive(Debug, Clone)]
pub struct NewUnmappedListing<'a> {
    pub product_id: i64,
    pub marketplace_id: Option<i64>,
    pub external_title: &'a str,
    pub external_url: &'a str,
    /// The extracted capacity pair, if any pattern matched the title.
    pub ram_gb: Option<i32>,
    pub storage_gb: Option<i32>,
    pub notes: Option<&'a str>,
}

/// Quarantines a listing whose title could not be attributed to a variant.
/// Returns the internal `id`. Rows here are never auto-promoted to prices;
/// an operator resolves them.
///
/// Keyed on `(product_id, external_url)`: a scheduled sync that keeps
/// observing the same unmatched listing updates the existing row and
/// re-opens it rather than piling up duplicates.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_unmapped_listing(
    pool: &PgPool,
    listing: &NewUnmappedListing<'_>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO unmapped_listings \
             (product_id, marketplace_id, external_title, external_url, \
              ram_gb, storage_gb, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (product_id, external_url) DO UPDATE SET \
             marketplace_id = EXCLUDED.marketplace_id, \
             external_title = EXCLUDED.external_title, \
             ram_gb         = EXCLUDED.ram_gb, \
             storage_gb     = EXCLUDED.storage_gb, \
             notes          = EXCLUDED.notes, \
             status         = 'unmapped' \
         RETURNING id",
    )
    .bind(listing.product_id)
    .bind(listing.marketplace_id)
    .bind(listing.external_title)
    .bind(listing.external_url)
    .bind(listing.ram_gb)
    .bind(listing.storage_gb)
    .bind(listing.notes)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Lists quarantined rows, optionally filtered by status, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unmapped_listings(
    pool: &PgPool,
    status: Option<&str>,
) -> Result<Vec<UnmappedListingRow>, DbError> {
    let rows = sqlx::query_as::<_, UnmappedListingRow>(
        "SELECT id, product_id, marketplace_id, external_title, external_url, \
                ram_gb, storage_gb, notes, status, created_at \
         FROM unmapped_listings \
         WHERE $1::text IS NULL OR status = $1 \
         ORDER BY created_at DESC, id DESC",
    )
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Marks a quarantined row with a new status (e.g. `resolved`, `dismissed`).
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn resolve_unmapped_listing(
    pool: &PgPool,
    id: i64,
    status: &str,
) -> Result<(), DbError> {
    let affected = sqlx::query("UPDATE unmapped_listings SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
