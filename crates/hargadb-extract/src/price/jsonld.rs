//! Strategy 1: schema.org JSON-LD offer blocks.

use hargadb_core::MarketplaceSource;
use regex::Regex;

use super::candidates::{collect_price_values, pick_best};

/// Scans every `<script type="application/ld+json">` block and pools all
/// price-like values across them. Malformed blocks are skipped; `@graph`
/// containers need no special casing because the walk recurses into every
/// nested value.
pub(super) fn extract_jsonld_price(html: &str, source: MarketplaceSource) -> Option<i64> {
    let script_re = Regex::new(
        r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
    )
    .expect("valid regex");

    let mut candidates = Vec::new();
    for cap in script_re.captures_iter(html) {
        let Some(m) = cap.get(1) else { continue };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(m.as_str()) else {
            continue;
        };
        collect_price_values(&value, source, &mut candidates);
    }
    pick_best(&candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_offer_price() {
        let html = r#"
            <script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "Product",
                "name": "Redmi Note 13",
                "offers": {"@type": "Offer", "price": "2999000", "priceCurrency": "IDR"}
            }
            </script>
        "#;
        assert_eq!(
            extract_jsonld_price(html, MarketplaceSource::Tokopedia),
            Some(2_999_000)
        );
    }

    #[test]
    fn graph_wrapped_product_found() {
        let html = r#"
            <script type="application/ld+json">
            {"@graph": [{"@type": "Product", "offers": {"lowPrice": 1500000, "highPrice": 1750000}}]}
            </script>
        "#;
        assert_eq!(
            extract_jsonld_price(html, MarketplaceSource::Generic),
            Some(1_500_000)
        );
    }

    #[test]
    fn malformed_block_skipped_valid_block_used() {
        let html = r#"
            <script type="application/ld+json">{not json</script>
            <script type="application/ld+json">{"price": 150000}</script>
        "#;
        assert_eq!(
            extract_jsonld_price(html, MarketplaceSource::Generic),
            Some(150_000)
        );
    }

    #[test]
    fn no_blocks_yields_none() {
        assert_eq!(
            extract_jsonld_price("<html><body></body></html>", MarketplaceSource::Generic),
            None
        );
    }
}
