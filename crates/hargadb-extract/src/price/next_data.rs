//! Strategy 2: the `__NEXT_DATA__` embedded application state block.

use hargadb_core::MarketplaceSource;
use regex::Regex;

use super::candidates::{collect_price_values, pick_best};

/// Applies the same tree walk as the JSON-LD strategy to the single
/// well-known Next.js state block, when present and parseable.
pub(super) fn extract_next_data_price(html: &str, source: MarketplaceSource) -> Option<i64> {
    let re = Regex::new(r#"(?is)<script[^>]+id\s*=\s*["']__NEXT_DATA__["'][^>]*>(.*?)</script>"#)
        .expect("valid regex");
    let json_text = re.captures(html)?.get(1)?.as_str();
    let value: serde_json::Value = serde_json::from_str(json_text).ok()?;

    let mut candidates = Vec::new();
    collect_price_values(&value, source, &mut candidates);
    pick_best(&candidates)
}
