//! Raw numeric token → integer rupiah amount.
//!
//! Some marketplace payloads encode a sub-unit price as an integer scaled by
//! a fixed power of ten; which corrections apply is per-source data on
//! [`MarketplaceSource`], not logic here.

use hargadb_core::MarketplaceSource;
use regex::Regex;

/// Normalizes a raw numeric price token from `source` to integer rupiah.
///
/// Returns `None` for non-finite or non-positive input. Scale rules are
/// tried in order; a value at or above a rule's magnitude floor AND exactly
/// divisible by its divisor is corrected, everything else passes through
/// unscaled (rounded to the nearest rupiah).
#[must_use]
pub fn normalize_scaled(value: f64, source: MarketplaceSource) -> Option<i64> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    for rule in source.scale_rules() {
        if value >= rule.min_magnitude && value % rule.divisor == 0.0 {
            return Some((value / rule.divisor) as i64);
        }
    }
    Some(value.round() as i64)
}

/// Parses a free-text currency string like `"Rp 1.234.567"` into integer
/// rupiah.
///
/// Grouping separators (`.` or `,`) are removed; a trailing two-digit
/// decimal group on a grouped amount (`"1.250.000,00"`) is dropped rather
/// than concatenated. Returns `None` when no positive amount can be read.
#[must_use]
pub fn parse_price_text(text: &str) -> Option<i64> {
    let token_re = Regex::new(r"\d[\d.,]*").expect("valid regex");
    let token = token_re.find(text)?.as_str().trim_end_matches(['.', ',']);

    // "1.234.567" or "1,234,567", optionally with a ",00"/".00" decimal tail.
    let grouped = Regex::new(r"^(\d{1,3}(?:[.,]\d{3})+)(?:[.,]\d{2})?$").expect("valid regex");
    let digits: String = if let Some(caps) = grouped.captures(token) {
        caps[1].chars().filter(char::is_ascii_digit).collect()
    } else {
        token.chars().filter(char::is_ascii_digit).collect()
    };

    let value = digits.parse::<i64>().ok()?;
    if value > 0 {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // parse_price_text
    // -----------------------------------------------------------------------

    #[test]
    fn parses_dotted_rupiah_string() {
        assert_eq!(parse_price_text("Rp 1.234.567"), Some(1_234_567));
    }

    #[test]
    fn parses_comma_grouped_string() {
        assert_eq!(parse_price_text("IDR 1,250,000"), Some(1_250_000));
    }

    #[test]
    fn drops_trailing_decimal_group() {
        assert_eq!(parse_price_text("Rp 1.250.000,00"), Some(1_250_000));
    }

    #[test]
    fn parses_plain_digit_run() {
        assert_eq!(parse_price_text("harga: 15000"), Some(15_000));
    }

    #[test]
    fn parses_price_with_trailing_text() {
        assert_eq!(parse_price_text("Rp2.799.000 Cicilan 0%"), Some(2_799_000));
    }

    #[test]
    fn no_digits_returns_none() {
        assert_eq!(parse_price_text("Hubungi penjual"), None);
    }

    #[test]
    fn zero_returns_none() {
        assert_eq!(parse_price_text("Rp 0"), None);
    }

    #[test]
    fn trailing_separator_ignored() {
        assert_eq!(parse_price_text("1.234.567."), Some(1_234_567));
    }

    // -----------------------------------------------------------------------
    // normalize_scaled
    // -----------------------------------------------------------------------

    #[test]
    fn shopee_ten_to_five_scale_corrected() {
        assert_eq!(
            normalize_scaled(12_340_000_000.0, MarketplaceSource::Shopee),
            Some(123_400)
        );
    }

    #[test]
    fn shopee_cent_scale_corrected() {
        assert_eq!(
            normalize_scaled(299_900_000.0, MarketplaceSource::Shopee),
            Some(2_999_000)
        );
    }

    #[test]
    fn shopee_ordinary_price_passes_through() {
        assert_eq!(
            normalize_scaled(2_999_000.0, MarketplaceSource::Shopee),
            Some(2_999_000)
        );
    }

    #[test]
    fn indivisible_large_value_passes_through() {
        // Magnitude alone is not enough; exact divisibility is required.
        assert_eq!(
            normalize_scaled(12_340_000_001.0, MarketplaceSource::Shopee),
            Some(12_340_000_001)
        );
    }

    #[test]
    fn source_without_rules_never_scales() {
        assert_eq!(
            normalize_scaled(12_340_000_000.0, MarketplaceSource::Tokopedia),
            Some(12_340_000_000)
        );
    }

    #[test]
    fn non_positive_returns_none() {
        assert_eq!(normalize_scaled(0.0, MarketplaceSource::Shopee), None);
        assert_eq!(normalize_scaled(-150_000.0, MarketplaceSource::Shopee), None);
    }

    #[test]
    fn non_finite_returns_none() {
        assert_eq!(normalize_scaled(f64::NAN, MarketplaceSource::Shopee), None);
        assert_eq!(normalize_scaled(f64::INFINITY, MarketplaceSource::Shopee), None);
    }

    #[test]
    fn fractional_passthrough_rounds() {
        assert_eq!(
            normalize_scaled(1_999.6, MarketplaceSource::Generic),
            Some(2_000)
        );
    }
}
