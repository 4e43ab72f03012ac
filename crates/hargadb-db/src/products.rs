//! Database operations for `products` and `variants`.

use chrono::{DateTime, Utc};
use hargadb_core::VariantSpec;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub slug: String,
    pub name: String,
    /// Derived roll-up; NULL when no price is active. Written only by the
    /// reconciliation engine.
    pub lowest_new_price: Option<i64>,
    /// Manually entered, never derived.
    pub lowest_used_price: Option<i64>,
    pub release_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `variants` table.
///
/// Variant identity is not stable: the admin form replaces the whole set on
/// every resubmit, so rows must be matched by (RAM, storage, color) content
/// rather than by an id carried across edits.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VariantRow {
    pub id: i64,
    pub product_id: i64,
    pub ram_gb: i32,
    pub storage_gb: i32,
    pub color: Option<String>,
    pub label: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VariantRow {
    /// Projects the row into the matcher's input shape.
    #[must_use]
    pub fn to_spec(&self) -> VariantSpec {
        VariantSpec {
            variant_id: self.id,
            ram_gb: self.ram_gb,
            storage_gb: self.storage_gb,
            color: self.color.clone(),
            label: self.label.clone(),
        }
    }
}

/// Input for [`replace_variants`].
#[derive(Debug, Clone)]
pub struct NewVariant {
    pub ram_gb: i32,
    pub storage_gb: i32,
    pub color: Option<String>,
    pub label: Option<String>,
}

// ---------------------------------------------------------------------------
// products operations
// ---------------------------------------------------------------------------

/// Upserts a product row by slug, updating `name` and `release_year` in
/// place on conflict. Returns the internal `id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_product(
    pool: &PgPool,
    slug: &str,
    name: &str,
    release_year: Option<i32>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products (slug, name, release_year) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (slug) DO UPDATE SET \
             name         = EXCLUDED.name, \
             release_year = EXCLUDED.release_year, \
             updated_at   = NOW() \
         RETURNING id",
    )
    .bind(slug)
    .bind(name)
    .bind(release_year)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Looks up a product by its canonical slug.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product_by_slug(pool: &PgPool, slug: &str) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, slug, name, lowest_new_price, lowest_used_price, release_year, \
                created_at, updated_at \
         FROM products WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Takes a row-level lock on the product inside the caller's transaction.
///
/// Concurrent reconciliations for the same product serialize here, so each
/// one recomputes the roll-up against the other's committed writes rather
/// than a stale snapshot.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the product does not exist, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn lock_product(
    executor: impl sqlx::PgExecutor<'_>,
    product_id: i64,
) -> Result<(), DbError> {
    let locked: Option<i64> =
        sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE id = $1 FOR UPDATE")
            .bind(product_id)
            .fetch_optional(executor)
            .await?;

    match locked {
        Some(_) => Ok(()),
        None => Err(DbError::NotFound),
    }
}

/// Recomputes `lowest_new_price` as the minimum active price across the
/// product's variants (NULL if none) and stamps `updated_at`. Returns the
/// new roll-up value.
///
/// Must run inside the same transaction as the price write it follows, after
/// [`lock_product`].
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the product does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn recompute_lowest_new_price(
    executor: impl sqlx::PgExecutor<'_>,
    product_id: i64,
) -> Result<Option<i64>, DbError> {
    let row: Option<Option<i64>> = sqlx::query_scalar::<_, Option<i64>>(
        "UPDATE products SET \
             lowest_new_price = ( \
                 SELECT MIN(p.amount) \
                 FROM prices p \
                 JOIN variants v ON v.id = p.variant_id \
                 WHERE v.product_id = $1 AND p.is_active \
             ), \
             updated_at = NOW() \
         WHERE id = $1 \
         RETURNING lowest_new_price",
    )
    .bind(product_id)
    .fetch_optional(executor)
    .await?;

    row.ok_or(DbError::NotFound)
}

// ---------------------------------------------------------------------------
// variants operations
// ---------------------------------------------------------------------------

/// Lists a product's variants in creation order (the order the matcher's
/// first-variant fallback relies on).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_variants(pool: &PgPool, product_id: i64) -> Result<Vec<VariantRow>, DbError> {
    let rows = sqlx::query_as::<_, VariantRow>(
        "SELECT id, product_id, ram_gb, storage_gb, color, label, is_default, \
                created_at, updated_at \
         FROM variants WHERE product_id = $1 ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Replaces a product's variant set wholesale, mirroring the admin form's
/// delete-and-recreate behavior. The first variant in `variants` becomes the
/// default. Returns the new variant ids in input order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement in the transaction fails.
pub async fn replace_variants(
    pool: &PgPool,
    product_id: i64,
    variants: &[NewVariant],
) -> Result<Vec<i64>, DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM variants WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

    let mut ids = Vec::with_capacity(variants.len());
    for (index, variant) in variants.iter().enumerate() {
        let id: i64 = sqlx::query_scalar::<_, i64>(
            "INSERT INTO variants (product_id, ram_gb, storage_gb, color, label, is_default) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(product_id)
        .bind(variant.ram_gb)
        .bind(variant.storage_gb)
        .bind(&variant.color)
        .bind(&variant.label)
        .bind(index == 0)
        .fetch_one(&mut *tx)
        .await?;
        ids.push(id);
    }

    tx.commit().await?;
    Ok(ids)
}
