//! Strategy 4: inline script key scan.

use hargadb_core::MarketplaceSource;
use regex::Regex;

use super::candidates::pick_best;
use crate::money::normalize_scaled;

const SCAN_CAP: usize = 30;

/// Scans raw page text for `"<price-like key>": <digits>` literals, quoted
/// or not, pooling the first [`SCAN_CAP`] matches. Digit runs shorter than
/// four are skipped to avoid quantities and flags.
pub(super) fn extract_script_price(html: &str, source: MarketplaceSource) -> Option<i64> {
    let re = Regex::new(
        r#""(?:price|product_price|price_amount|priceValue|price_min|defaultPrice|sellingPrice)"\s*:\s*"?(\d{4,15})"?"#,
    )
    .expect("valid regex");

    let mut candidates = Vec::new();
    for caps in re.captures_iter(html).take(SCAN_CAP) {
        if let Some(amount) = caps[1]
            .parse::<f64>()
            .ok()
            .and_then(|raw| normalize_scaled(raw, source))
        {
            candidates.push(amount);
        }
    }
    pick_best(&candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquoted_numeric_literal_found() {
        let html = r#"<script>window.product = {"price": 2599000, "stock": 5};</script>"#;
        assert_eq!(
            extract_script_price(html, MarketplaceSource::Generic),
            Some(2_599_000)
        );
    }

    #[test]
    fn quoted_numeric_literal_found() {
        let html = r#"<script>var data = {"price_min":"1899000"};</script>"#;
        assert_eq!(
            extract_script_price(html, MarketplaceSource::Generic),
            Some(1_899_000)
        );
    }

    #[test]
    fn shopee_scaled_literal_corrected() {
        let html = r#"<script>{"price_min": 189900000}</script>"#;
        assert_eq!(
            extract_script_price(html, MarketplaceSource::Shopee),
            Some(1_899_000)
        );
    }

    #[test]
    fn short_digit_runs_skipped() {
        let html = r#"<script>{"price": 299}</script>"#;
        assert_eq!(extract_script_price(html, MarketplaceSource::Generic), None);
    }

    #[test]
    fn smallest_plausible_candidate_wins() {
        let html = r#"<script>{"price": 2599000, "defaultPrice": 2499000}</script>"#;
        assert_eq!(
            extract_script_price(html, MarketplaceSource::Generic),
            Some(2_499_000)
        );
    }

    #[test]
    fn no_price_keys_yields_none() {
        let html = r#"<script>{"quantity": 123456}</script>"#;
        assert_eq!(extract_script_price(html, MarketplaceSource::Generic), None);
    }
}
