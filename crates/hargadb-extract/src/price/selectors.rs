//! Strategy 3: known per-source CSS selector targets.

use hargadb_core::MarketplaceSource;
use scraper::{Html, Selector};

use crate::money::parse_price_text;
use crate::text::normalize_fragment;

/// Source-specific selector lists, tried in order. Kept short on purpose:
/// these break whenever a marketplace reskins, so each entry earns its
/// place from an observed page.
fn selectors_for(source: MarketplaceSource) -> &'static [&'static str] {
    match source {
        MarketplaceSource::Tokopedia => &[
            r#"[data-testid="lblPDPDetailProductPrice"]"#,
            ".price",
        ],
        MarketplaceSource::Shopee => &[
            ".pdp-product-price",
            r#"[class*="product-price"]"#,
        ],
        MarketplaceSource::Blibli => &[
            ".final-price",
            ".product-price__after",
        ],
        MarketplaceSource::Lazada => &[
            ".pdp-price_type_normal",
            ".pdp-price",
        ],
        MarketplaceSource::Bukalapak => &[
            ".c-main-product__price .amount",
            r#"[data-testid="product-price"]"#,
        ],
        MarketplaceSource::Generic => &[
            r#"[itemprop="price"]"#,
            ".product-price",
            ".price",
        ],
    }
}

/// First selector whose first match yields parseable text wins. Microdata
/// elements may carry the amount in a `content` attribute instead of text.
pub(super) fn extract_selector_price(html: &str, source: MarketplaceSource) -> Option<i64> {
    let doc = Html::parse_document(html);
    for selector_text in selectors_for(source) {
        let Ok(selector) = Selector::parse(selector_text) else {
            continue;
        };
        for element in doc.select(&selector) {
            if let Some(content) = element.value().attr("content") {
                if let Some(amount) = parse_price_text(content) {
                    return Some(amount);
                }
            }
            let text = normalize_fragment(&element.inner_html());
            if let Some(amount) = parse_price_text(&text) {
                return Some(amount);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokopedia_price_label_matched() {
        let html = r#"<div data-testid="lblPDPDetailProductPrice">Rp2.799.000</div>"#;
        assert_eq!(
            extract_selector_price(html, MarketplaceSource::Tokopedia),
            Some(2_799_000)
        );
    }

    #[test]
    fn microdata_content_attribute_preferred() {
        let html = r#"<span itemprop="price" content="1250000">Rp 1.250.000,00</span>"#;
        assert_eq!(
            extract_selector_price(html, MarketplaceSource::Generic),
            Some(1_250_000)
        );
    }

    #[test]
    fn nested_markup_flattened_before_parse() {
        let html = r#"<div class="price"><b>Rp</b> <span>3.499.000</span></div>"#;
        assert_eq!(
            extract_selector_price(html, MarketplaceSource::Generic),
            Some(3_499_000)
        );
    }

    #[test]
    fn empty_target_falls_through_to_next_selector() {
        let html = r#"
            <span itemprop="price"></span>
            <div class="product-price">Rp 999.000</div>
        "#;
        assert_eq!(
            extract_selector_price(html, MarketplaceSource::Generic),
            Some(999_000)
        );
    }

    #[test]
    fn no_selector_target_yields_none() {
        assert_eq!(
            extract_selector_price("<div>no price here</div>", MarketplaceSource::Generic),
            None
        );
    }
}
