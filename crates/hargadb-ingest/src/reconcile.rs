//! The reconciliation engine.
//!
//! Everything before the price write is read-only; the write and the
//! roll-up recomputation share one transaction, serialized per product by a
//! row lock, so a concurrent reconciliation never reads a stale roll-up and
//! the roll-up never reflects a half-written price.

use hargadb_core::ColorFallback;
use hargadb_db::{
    get_marketplace_by_id, get_marketplace_by_slug, get_product_by_slug, list_variants,
    lock_product, recompute_lowest_new_price, upsert_price, upsert_unmapped_listing, NewPrice,
    NewUnmappedListing, VariantRow,
};
use hargadb_extract::match_variant;
use sqlx::PgPool;

use crate::error::IngestError;
use crate::types::{IngestOutcome, IngestRequest, MarketplaceRef};

/// Reconciles one listing observation against the catalog.
///
/// A title that matches no variant quarantines the listing and returns
/// `mapped=false` with `success=true`; the pipeline never forces a wrong
/// assignment.
///
/// # Errors
///
/// Returns [`IngestError::Validation`] for a non-positive price or empty
/// title/URL, [`IngestError::ProductNotFound`] when the slug resolves to
/// nothing (products are never auto-created here),
/// [`IngestError::MarketplaceNotFound`] for a dangling marketplace
/// reference, and [`IngestError::Db`] on persistence failure.
pub async fn reconcile(
    pool: &PgPool,
    color_fallback: ColorFallback,
    request: &IngestRequest,
) -> Result<IngestOutcome, IngestError> {
    validate(request)?;

    let marketplace_id = resolve_marketplace(pool, request.marketplace.as_ref()).await?;

    let product = get_product_by_slug(pool, &request.product_slug)
        .await?
        .ok_or_else(|| IngestError::ProductNotFound {
            slug: request.product_slug.clone(),
        })?;
    let variants = list_variants(pool, product.id).await?;
    let specs: Vec<_> = variants.iter().map(VariantRow::to_spec).collect();

    let outcome = match_variant(&request.listing_title, &specs, color_fallback);

    let Some(variant) = outcome.variant else {
        let (ram_gb, storage_gb) = outcome
            .extracted
            .map_or((None, None), |m| (Some(m.pair.ram_gb), Some(m.pair.storage_gb)));

        let unmapped_id = upsert_unmapped_listing(
            pool,
            &NewUnmappedListing {
                product_id: product.id,
                marketplace_id,
                external_title: &request.listing_title,
                external_url: &request.affiliate_url,
                ram_gb,
                storage_gb,
                notes: None,
            },
        )
        .await?;

        tracing::info!(
            product = %request.product_slug,
            title = %request.listing_title,
            ram_gb,
            storage_gb,
            unmapped_id,
            "listing quarantined: no matching variant"
        );
        return Ok(IngestOutcome {
            success: true,
            mapped: false,
            message: "no matching variant; listing quarantined for review".to_string(),
            variant_id: None,
            variant_label: None,
            price_record_id: None,
            unmapped_record_id: Some(unmapped_id),
            lowest_new_price: product.lowest_new_price,
        });
    };

    let mut tx = pool.begin().await?;
    lock_product(&mut *tx, product.id).await?;
    let price_id = upsert_price(
        &mut *tx,
        &NewPrice {
            variant_id: variant.variant_id,
            marketplace_id,
            amount: request.price,
            seller_name: request.seller_name.as_deref(),
            raw_title: &request.listing_title,
            affiliate_url: &request.affiliate_url,
        },
    )
    .await?;
    let lowest_new_price = recompute_lowest_new_price(&mut *tx, product.id).await?;
    tx.commit().await?;

    tracing::info!(
        product = %request.product_slug,
        variant_id = variant.variant_id,
        amount = request.price,
        price_id,
        lowest_new_price,
        "price reconciled"
    );
    Ok(IngestOutcome {
        success: true,
        mapped: true,
        message: "price reconciled".to_string(),
        variant_id: Some(variant.variant_id),
        variant_label: Some(variant.display_label()),
        price_record_id: Some(price_id),
        unmapped_record_id: None,
        lowest_new_price,
    })
}

fn validate(request: &IngestRequest) -> Result<(), IngestError> {
    if request.price <= 0 {
        return Err(IngestError::Validation {
            field: "price",
            reason: "must be positive",
        });
    }
    if request.listing_title.trim().is_empty() {
        return Err(IngestError::Validation {
            field: "listing_title",
            reason: "must not be empty",
        });
    }
    if request.affiliate_url.trim().is_empty() {
        return Err(IngestError::Validation {
            field: "affiliate_url",
            reason: "must not be empty",
        });
    }
    if !request.affiliate_url.starts_with("http://") && !request.affiliate_url.starts_with("https://")
    {
        return Err(IngestError::Validation {
            field: "affiliate_url",
            reason: "must be an http(s) URL",
        });
    }
    Ok(())
}

async fn resolve_marketplace(
    pool: &PgPool,
    reference: Option<&MarketplaceRef>,
) -> Result<Option<i64>, IngestError> {
    match reference {
        None => Ok(None),
        Some(MarketplaceRef::Id(id)) => {
            let row = get_marketplace_by_id(pool, *id).await?;
            row.map(|m| Some(m.id))
                .ok_or_else(|| IngestError::MarketplaceNotFound {
                    reference: id.to_string(),
                })
        }
        Some(MarketplaceRef::Slug(slug)) => {
            let row = get_marketplace_by_slug(pool, slug).await?;
            row.map(|m| Some(m.id))
                .ok_or_else(|| IngestError::MarketplaceNotFound {
                    reference: slug.clone(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(price: i64, title: &str, url: &str) -> IngestRequest {
        IngestRequest {
            product_slug: "redmi-note-13".to_string(),
            listing_title: title.to_string(),
            price,
            affiliate_url: url.to_string(),
            seller_name: None,
            marketplace: None,
        }
    }

    // -----------------------------------------------------------------------
    // validate
    // -----------------------------------------------------------------------

    #[test]
    fn rejects_non_positive_price() {
        let err = validate(&request(0, "title", "https://x.test/a")).expect_err("must fail");
        assert!(matches!(err, IngestError::Validation { field: "price", .. }));
    }

    #[test]
    fn rejects_blank_title() {
        let err = validate(&request(1000, "   ", "https://x.test/a")).expect_err("must fail");
        assert!(matches!(
            err,
            IngestError::Validation {
                field: "listing_title",
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_url() {
        let err = validate(&request(1000, "title", "")).expect_err("must fail");
        assert!(matches!(
            err,
            IngestError::Validation {
                field: "affiliate_url",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_http_url() {
        let err = validate(&request(1000, "title", "ftp://x.test/a")).expect_err("must fail");
        assert!(matches!(
            err,
            IngestError::Validation {
                field: "affiliate_url",
                ..
            }
        ));
    }

    #[test]
    fn accepts_well_formed_request() {
        assert!(validate(&request(2_549_000, "Redmi Note 13 8/256", "https://x.test/a")).is_ok());
    }
}
