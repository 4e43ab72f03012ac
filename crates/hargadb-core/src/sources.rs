//! Marketplace source registry.
//!
//! Each supported marketplace gets a slug, hostname detection, and a
//! scale-correction table for sources that embed sub-unit prices as scaled
//! integers. Adding a source is a data change here, not a code change in
//! the extractors.

/// Scale-correction rule for a marketplace that encodes prices as integers
/// multiplied by a fixed power of ten.
///
/// A raw value is corrected when it is at least `min_magnitude` AND exactly
/// divisible by `divisor`; both conditions must hold so ordinary large
/// prices pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRule {
    pub min_magnitude: f64,
    pub divisor: f64,
}

/// Rules for sources whose APIs scale prices by 10^5 (sub-unit pricing)
/// and, in older payloads, by 10^2.
const SUBUNIT_SCALE_RULES: &[ScaleRule] = &[
    ScaleRule {
        min_magnitude: 1e10,
        divisor: 1e5,
    },
    ScaleRule {
        min_magnitude: 1e8,
        divisor: 1e2,
    },
];

/// Rule for sources that only exhibit the cent-scaled (10^2) artifact.
const CENT_SCALE_RULES: &[ScaleRule] = &[ScaleRule {
    min_magnitude: 1e8,
    divisor: 1e2,
}];

/// A marketplace the price extractor knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketplaceSource {
    Tokopedia,
    Shopee,
    Blibli,
    Lazada,
    Bukalapak,
    /// Unrecognized host; generic strategies only, no scale correction.
    Generic,
}

impl MarketplaceSource {
    /// Detects the source from a listing URL's hostname.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let host = host_of(url).unwrap_or("");
        if host.contains("tokopedia") {
            Self::Tokopedia
        } else if host.contains("shopee") {
            Self::Shopee
        } else if host.contains("blibli") {
            Self::Blibli
        } else if host.contains("lazada") {
            Self::Lazada
        } else if host.contains("bukalapak") {
            Self::Bukalapak
        } else {
            Self::Generic
        }
    }

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Tokopedia => "tokopedia",
            Self::Shopee => "shopee",
            Self::Blibli => "blibli",
            Self::Lazada => "lazada",
            Self::Bukalapak => "bukalapak",
            Self::Generic => "generic",
        }
    }

    /// Scale-correction rules for raw numeric price tokens from this source,
    /// tried in order.
    #[must_use]
    pub fn scale_rules(self) -> &'static [ScaleRule] {
        match self {
            Self::Shopee => SUBUNIT_SCALE_RULES,
            Self::Lazada => CENT_SCALE_RULES,
            Self::Tokopedia | Self::Blibli | Self::Bukalapak | Self::Generic => &[],
        }
    }
}

impl std::fmt::Display for MarketplaceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Extracts the host component of a URL without pulling in a URL parser.
fn host_of(url: &str) -> Option<&str> {
    let scheme_split = url.find("://")?;
    let remainder = &url[(scheme_split + 3)..];
    let host_end = remainder
        .find(|c| c == '/' || c == '?' || c == '#')
        .unwrap_or(remainder.len());
    let host = &remainder[..host_end];
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
