//! Marketplace price extraction.
//!
//! Tries extraction strategies in priority order (JSON-LD offer blocks,
//! the `__NEXT_DATA__` state block, per-source CSS selectors, inline script
//! key scan, loose currency scan) and returns the first hit. A page carrying
//! an anti-bot marker fails before any strategy runs.

mod candidates;
mod currency_scan;
mod jsonld;
mod next_data;
mod script_scan;
mod selectors;

use hargadb_core::MarketplaceSource;

use crate::error::ExtractError;

/// Which cascade strategy produced the price; kept for diagnostics and
/// ingestion logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceStrategy {
    JsonLd,
    NextData,
    Selector,
    ScriptScan,
    CurrencyScan,
}

impl PriceStrategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JsonLd => "jsonld",
            Self::NextData => "next_data",
            Self::Selector => "selector",
            Self::ScriptScan => "script_scan",
            Self::CurrencyScan => "currency_scan",
        }
    }
}

/// An extracted price in integer rupiah plus the strategy that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFound {
    pub amount: i64,
    pub strategy: PriceStrategy,
}

const BLOCK_MARKERS: [&str; 4] = [
    "captcha",
    "access denied",
    "unusual traffic",
    "verify you are a human",
];

fn blocked_marker(html: &str) -> Option<&'static str> {
    let lower = html.to_lowercase();
    BLOCK_MARKERS.iter().copied().find(|m| lower.contains(m))
}

/// Extracts the current price from a fetched marketplace page.
///
/// Returns `Ok(None)` when every strategy comes up empty; callers surface
/// that as "price not found" and offer a manual path.
///
/// # Errors
///
/// Returns [`ExtractError::BlockedPage`] when the page carries an
/// access-denied or CAPTCHA marker; no strategy runs in that case.
pub fn extract_price(
    html: &str,
    source: MarketplaceSource,
) -> Result<Option<PriceFound>, ExtractError> {
    if let Some(marker) = blocked_marker(html) {
        return Err(ExtractError::BlockedPage { marker });
    }

    // Strategy 1: schema.org JSON-LD
    if let Some(amount) = jsonld::extract_jsonld_price(html, source) {
        tracing::debug!(source = source.slug(), amount, "price found in JSON-LD");
        return Ok(Some(PriceFound {
            amount,
            strategy: PriceStrategy::JsonLd,
        }));
    }

    // Strategy 2: __NEXT_DATA__ application state
    if let Some(amount) = next_data::extract_next_data_price(html, source) {
        tracing::debug!(source = source.slug(), amount, "price found in __NEXT_DATA__");
        return Ok(Some(PriceFound {
            amount,
            strategy: PriceStrategy::NextData,
        }));
    }

    // Strategy 3: known CSS selector targets
    if let Some(amount) = selectors::extract_selector_price(html, source) {
        tracing::debug!(source = source.slug(), amount, "price found via CSS selector");
        return Ok(Some(PriceFound {
            amount,
            strategy: PriceStrategy::Selector,
        }));
    }

    // Strategy 4: inline script key scan
    if let Some(amount) = script_scan::extract_script_price(html, source) {
        tracing::debug!(source = source.slug(), amount, "price found in inline script");
        return Ok(Some(PriceFound {
            amount,
            strategy: PriceStrategy::ScriptScan,
        }));
    }

    // Strategy 5: loose currency scan
    if let Some(amount) = currency_scan::extract_currency_price(html) {
        tracing::debug!(source = source.slug(), amount, "price found by currency scan");
        return Ok(Some(PriceFound {
            amount,
            strategy: PriceStrategy::CurrencyScan,
        }));
    }

    tracing::debug!(source = source.slug(), "no price found by any strategy");
    Ok(None)
}
