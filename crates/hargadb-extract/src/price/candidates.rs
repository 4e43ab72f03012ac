//! Candidate pooling and tie-break shared by the tree-walk and scan
//! strategies.

use hargadb_core::MarketplaceSource;
use serde_json::Value;

use crate::money::{normalize_scaled, parse_price_text};

pub(crate) const PLAUSIBLE_MIN: i64 = 1_000;
pub(crate) const PLAUSIBLE_MAX: i64 = 500_000_000;

/// Picks the winner from a candidate pool: smallest value inside the
/// plausible band, else the smallest strictly-positive candidate.
pub(crate) fn pick_best(candidates: &[i64]) -> Option<i64> {
    let in_band = candidates
        .iter()
        .copied()
        .filter(|v| (PLAUSIBLE_MIN..=PLAUSIBLE_MAX).contains(v))
        .min();
    in_band.or_else(|| candidates.iter().copied().filter(|&v| v > 0).min())
}

/// A JSON key carries an amount when it mentions "price" but is not
/// currency/formatting metadata about one.
pub(crate) fn price_like_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    if !lower.contains("price") {
        return false;
    }
    const METADATA: [&str; 5] = ["currency", "format", "display", "text", "symbol"];
    !METADATA.iter().any(|word| lower.contains(word))
}

/// Walks a parsed JSON tree collecting every price-like leaf, scale-corrected
/// for the source. String leaves go through the free-text parser first so
/// formatted amounts ("Rp 2.999.000") and bare digit strings both count.
pub(crate) fn collect_price_values(node: &Value, source: MarketplaceSource, out: &mut Vec<i64>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                if price_like_key(key) {
                    match child {
                        Value::Number(n) => {
                            if let Some(v) = n.as_f64().and_then(|f| normalize_scaled(f, source)) {
                                out.push(v);
                            }
                        }
                        Value::String(s) => {
                            if let Some(v) = parse_price_text(s)
                                .and_then(|p| normalize_scaled(p as f64, source))
                            {
                                out.push(v);
                            }
                        }
                        _ => {}
                    }
                }
                collect_price_values(child, source, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_price_values(item, source, out);
            }
        }
        _ => {}
    }
}
