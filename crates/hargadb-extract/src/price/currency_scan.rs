//! Strategy 5: loose currency-marker scan, the last resort.

use regex::Regex;

use super::candidates::pick_best;
use crate::money::parse_price_text;

const SCAN_CAP: usize = 30;

/// Scans the whole page for `Rp`/`IDR` markers followed by a digit run and
/// pools the first [`SCAN_CAP`] amounts. Runs over visible text and markup
/// alike, so the plausible-band tie-break does the filtering.
pub(super) fn extract_currency_price(html: &str) -> Option<i64> {
    let re = Regex::new(r"(?i)\b(?:Rp|IDR)\s*\.?\s*([0-9][0-9.,]*)").expect("valid regex");

    let mut candidates = Vec::new();
    for caps in re.captures_iter(html).take(SCAN_CAP) {
        if let Some(amount) = parse_price_text(&caps[1]) {
            candidates.push(amount);
        }
    }
    pick_best(&candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_rupiah_amount_in_text() {
        assert_eq!(
            extract_currency_price("<p>Harga spesial Rp 2.350.000 hari ini</p>"),
            Some(2_350_000)
        );
    }

    #[test]
    fn idr_marker_accepted() {
        assert_eq!(
            extract_currency_price("Total: IDR 1,499,000"),
            Some(1_499_000)
        );
    }

    #[test]
    fn rp_with_dot_abbreviation() {
        assert_eq!(extract_currency_price("Rp. 750.000"), Some(750_000));
    }

    #[test]
    fn smallest_plausible_amount_wins() {
        let html = "Harga Rp 2.999.000, cicilan Rp 250.000/bulan, ongkir Rp 10";
        assert_eq!(extract_currency_price(html), Some(250_000));
    }

    #[test]
    fn implausible_only_falls_back_to_smallest_positive() {
        assert_eq!(extract_currency_price("Diskon Rp 500"), Some(500));
    }

    #[test]
    fn no_marker_yields_none() {
        assert_eq!(extract_currency_price("harga 2.999.000"), None);
    }
}
