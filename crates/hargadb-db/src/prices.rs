//! Database operations for `prices`.
//!
//! Price rows are mutated only through this module, and only by the
//! reconciliation engine; nothing here is reachable from user input.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `prices` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PriceRow {
    pub id: i64,
    pub variant_id: i64,
    pub marketplace_id: Option<i64>,
    pub amount: i64,
    pub currency: String,
    pub seller_name: Option<String>,
    pub raw_title: String,
    pub affiliate_url: String,
    pub is_active: bool,
    pub last_synced_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Input for [`upsert_price`].
#[derive(Debug, Clone)]
pub struct NewPrice<'a> {
    pub variant_id: i64,
    pub marketplace_id: Option<i64>,
    pub amount: i64,
    pub seller_name: Option<&'a str>,
    pub raw_title: &'a str,
    pub affiliate_url: &'a str,
}

/// Upserts a price observation keyed by (variant, marketplace-or-null,
/// affiliate URL).
///
/// Conflicts update `amount`, `seller_name`, `raw_title`, and
/// `last_synced_at` in place and reactivate the row, so re-ingesting the
/// same listing never duplicates. Returns the internal `id`.
///
/// Runs on whatever executor the caller supplies; the reconciliation engine
/// passes its transaction so the write and the roll-up commit together.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_price(
    executor: impl sqlx::PgExecutor<'_>,
    price: &NewPrice<'_>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO prices \
             (variant_id, marketplace_id, amount, seller_name, raw_title, affiliate_url) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (variant_id, marketplace_id, affiliate_url) DO UPDATE SET \
             amount         = EXCLUDED.amount, \
             seller_name    = EXCLUDED.seller_name, \
             raw_title      = EXCLUDED.raw_title, \
             is_active      = TRUE, \
             last_synced_at = NOW() \
         RETURNING id",
    )
    .bind(price.variant_id)
    .bind(price.marketplace_id)
    .bind(price.amount)
    .bind(price.seller_name)
    .bind(price.raw_title)
    .bind(price.affiliate_url)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// Lists all active prices across a product's variants, cheapest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_prices_for_product(
    pool: &PgPool,
    product_id: i64,
) -> Result<Vec<PriceRow>, DbError> {
    let rows = sqlx::query_as::<_, PriceRow>(
        "SELECT p.id, p.variant_id, p.marketplace_id, p.amount, p.currency, \
                p.seller_name, p.raw_title, p.affiliate_url, p.is_active, \
                p.last_synced_at, p.created_at \
         FROM prices p \
         JOIN variants v ON v.id = p.variant_id \
         WHERE v.product_id = $1 AND p.is_active \
         ORDER BY p.amount, p.id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Flips a price row's active flag. The caller is responsible for
/// recomputing the owning product's roll-up afterwards.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_price_active(
    executor: impl sqlx::PgExecutor<'_>,
    price_id: i64,
    is_active: bool,
) -> Result<(), DbError> {
    let affected = sqlx::query("UPDATE prices SET is_active = $2 WHERE id = $1")
        .bind(price_id)
        .bind(is_active)
        .execute(executor)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
