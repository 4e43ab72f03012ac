//! Ingestion request/result shapes consumed by callers (CLI, scheduler,
//! admin actions).

use serde::{Deserialize, Serialize};

/// A marketplace reference by internal id or by slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketplaceRef {
    Id(i64),
    Slug(String),
}

/// One listing observation to reconcile against the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Stable external product key (the catalog slug).
    pub product_slug: String,
    pub listing_title: String,
    /// Integer rupiah; must be positive.
    pub price: i64,
    pub affiliate_url: String,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub marketplace: Option<MarketplaceRef>,
}

/// Outcome of one reconciliation. `success=true, mapped=false` signals a
/// quarantined listing, not a failure.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub success: bool,
    pub mapped: bool,
    pub message: String,
    pub variant_id: Option<i64>,
    pub variant_label: Option<String>,
    pub price_record_id: Option<i64>,
    pub unmapped_record_id: Option<i64>,
    /// The product roll-up after this reconciliation, when one ran.
    pub lowest_new_price: Option<i64>,
}
