//! Database operations for `marketplaces` reference data.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `marketplaces` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MarketplaceRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_marketplace_by_id(
    pool: &PgPool,
    id: i64,
) -> Result<Option<MarketplaceRow>, DbError> {
    let row = sqlx::query_as::<_, MarketplaceRow>(
        "SELECT id, name, slug, created_at FROM marketplaces WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_marketplace_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<MarketplaceRow>, DbError> {
    let row = sqlx::query_as::<_, MarketplaceRow>(
        "SELECT id, name, slug, created_at FROM marketplaces WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Upserts a marketplace by slug, updating the display name in place.
/// Returns the internal `id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_marketplace(pool: &PgPool, name: &str, slug: &str) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO marketplaces (name, slug) VALUES ($1, $2) \
         ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name \
         RETURNING id",
    )
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await?;

    Ok(id)
}
