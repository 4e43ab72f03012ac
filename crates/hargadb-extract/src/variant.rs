//! Title-to-variant matching.
//!
//! A listing title is matched to a known variant in two steps: extract a
//! (RAM, storage) capacity pair through an ordered set of patterns, then
//! disambiguate among same-capacity variants by color mention. The matcher
//! never substitutes a variant from a different capacity group: zero
//! candidates means no match, and the caller quarantines the listing.

use hargadb_core::{ColorFallback, RamStorage, VariantSpec};
use regex::Regex;

/// Which extraction pattern produced the capacity pair; kept for
/// diagnostics and ingestion logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitlePattern {
    CompactPair,
    UnitPair,
    RamFirst,
    StorageFirst,
    LooseScan,
}

impl TitlePattern {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompactPair => "compact_pair",
            Self::UnitPair => "unit_pair",
            Self::RamFirst => "ram_first",
            Self::StorageFirst => "storage_first",
            Self::LooseScan => "loose_scan",
        }
    }
}

/// A capacity pair extracted from a listing title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RamRomMatch {
    pub pair: RamStorage,
    pub pattern: TitlePattern,
}

/// Result of matching a listing title against a product's variant set.
#[derive(Debug, Clone)]
pub struct MatchOutcome<'a> {
    /// The capacity pair read from the title, if any pattern matched.
    pub extracted: Option<RamRomMatch>,
    /// The matched variant; `None` means the listing must be quarantined.
    pub variant: Option<&'a VariantSpec>,
}

/// Lower-cases a title and replaces bracket/pipe/underscore characters with
/// spaces, collapsing whitespace. Separator characters that carry capacity
/// meaning (`/`, `x`, `-`, `+`) are preserved.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let replaced: String = title
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '[' | ']' | '(' | ')' | '{' | '}' | '|' | '_' => ' ',
            other => other,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts a (RAM, storage) pair from a free-text listing title.
///
/// Patterns are tried in order, first plausible pair wins:
/// 1. compact pair, no units: `"8/256"`
/// 2. compact pair with units: `"8GB/256GB"`, `"12GB/1TB"`
/// 3. `ram` keyword before a storage keyword: `"RAM 12GB ROM 256GB"`
/// 4. storage keyword before `ram`: `"ROM 256GB RAM 12GB"`
/// 5. loose scan over all `<num><unit>` tokens for an adjacent plausible pair
///
/// A `TB` unit scales by 1024 before range validation (RAM 1–48, storage
/// 16–4096, and storage ≥ RAM for the loose scan). Titles carrying a single
/// capacity token (e.g. `"iPhone 15 128GB"`) yield `None`; single-capacity
/// listings are not matched by this extractor.
#[must_use]
pub fn extract_ram_rom(title: &str) -> Option<RamRomMatch> {
    let t = normalize_title(title);
    let attempts: [(TitlePattern, fn(&str) -> Option<RamStorage>); 5] = [
        (TitlePattern::CompactPair, compact_pair),
        (TitlePattern::UnitPair, unit_pair),
        (TitlePattern::RamFirst, ram_first),
        (TitlePattern::StorageFirst, storage_first),
        (TitlePattern::LooseScan, loose_scan),
    ];
    for (pattern, extract) in attempts {
        if let Some(pair) = extract(&t) {
            return Some(RamRomMatch { pair, pattern });
        }
    }
    None
}

/// Matches a listing title against the product's variant set.
///
/// Capacity must match exactly. When several variants share the extracted
/// capacity, the first variant whose color string appears in the title
/// wins; with no color mention the configured [`ColorFallback`] policy
/// decides between "first variant in input order" and "no match".
#[must_use]
pub fn match_variant<'a>(
    title: &str,
    variants: &'a [VariantSpec],
    color_fallback: ColorFallback,
) -> MatchOutcome<'a> {
    let Some(extracted) = extract_ram_rom(title) else {
        return MatchOutcome {
            extracted: None,
            variant: None,
        };
    };

    let candidates: Vec<&VariantSpec> = variants
        .iter()
        .filter(|v| v.ram_gb == extracted.pair.ram_gb && v.storage_gb == extracted.pair.storage_gb)
        .collect();

    let variant = match candidates.as_slice() {
        [] => None,
        [only] => Some(*only),
        several => {
            let normalized = normalize_title(title);
            let by_color = several.iter().find(|v| {
                v.color
                    .as_deref()
                    .is_some_and(|c| !c.is_empty() && normalized.contains(&c.to_lowercase()))
            });
            match by_color {
                Some(v) => Some(*v),
                None => match color_fallback {
                    ColorFallback::FirstVariant => Some(several[0]),
                    ColorFallback::NoMatch => None,
                },
            }
        }
    };

    MatchOutcome {
        extracted: Some(extracted),
        variant,
    }
}

// ---------------------------------------------------------------------------
// Pattern implementations (input is pre-normalized)
// ---------------------------------------------------------------------------

fn apply_unit(value: i32, unit: Option<&str>) -> i32 {
    match unit {
        Some("tb") => value.saturating_mul(1024),
        _ => value,
    }
}

fn compact_pair(t: &str) -> Option<RamStorage> {
    let re = Regex::new(r"\b(\d{1,2})\s*[/x+-]\s*(\d{2,4})\b").expect("valid regex");
    for caps in re.captures_iter(t) {
        let pair = RamStorage {
            ram_gb: caps[1].parse().ok()?,
            storage_gb: caps[2].parse().ok()?,
        };
        if pair.is_plausible() {
            return Some(pair);
        }
    }
    None
}

fn unit_pair(t: &str) -> Option<RamStorage> {
    let re = Regex::new(r"\b(\d{1,4})\s*(tb|gb)?\s*[/x+-]\s*(\d{1,4})\s*(tb|gb)?\b")
        .expect("valid regex");
    for caps in re.captures_iter(t) {
        // At least one explicit unit; the unit-less form belongs to pattern 1.
        if caps.get(2).is_none() && caps.get(4).is_none() {
            continue;
        }
        let pair = RamStorage {
            ram_gb: apply_unit(caps[1].parse().ok()?, caps.get(2).map(|m| m.as_str())),
            storage_gb: apply_unit(caps[3].parse().ok()?, caps.get(4).map(|m| m.as_str())),
        };
        if pair.is_plausible() {
            return Some(pair);
        }
    }
    None
}

fn ram_first(t: &str) -> Option<RamStorage> {
    let re = Regex::new(
        r"\bram\b[^0-9]{0,12}(\d{1,4})\s*(tb|gb)?.*?\b(?:rom|storage|memori|memory|internal)\b[^0-9]{0,12}(\d{1,4})\s*(tb|gb)?",
    )
    .expect("valid regex");
    for caps in re.captures_iter(t) {
        let pair = RamStorage {
            ram_gb: apply_unit(caps[1].parse().ok()?, caps.get(2).map(|m| m.as_str())),
            storage_gb: apply_unit(caps[3].parse().ok()?, caps.get(4).map(|m| m.as_str())),
        };
        if pair.is_plausible() {
            return Some(pair);
        }
    }
    None
}

fn storage_first(t: &str) -> Option<RamStorage> {
    let re = Regex::new(
        r"\b(?:rom|storage|memori|memory|internal)\b[^0-9]{0,12}(\d{1,4})\s*(tb|gb)?.*?\bram\b[^0-9]{0,12}(\d{1,4})\s*(tb|gb)?",
    )
    .expect("valid regex");
    for caps in re.captures_iter(t) {
        let pair = RamStorage {
            ram_gb: apply_unit(caps[3].parse().ok()?, caps.get(4).map(|m| m.as_str())),
            storage_gb: apply_unit(caps[1].parse().ok()?, caps.get(2).map(|m| m.as_str())),
        };
        if pair.is_plausible() {
            return Some(pair);
        }
    }
    None
}

fn loose_scan(t: &str) -> Option<RamStorage> {
    let re = Regex::new(r"(\d{1,4})\s*(tb|gb)\b").expect("valid regex");
    let values: Vec<i32> = re
        .captures_iter(t)
        .filter_map(|caps| {
            let v: i32 = caps[1].parse().ok()?;
            Some(apply_unit(v, Some(&caps[2])))
        })
        .collect();

    for window in values.windows(2) {
        let pair = RamStorage {
            ram_gb: window[0],
            storage_gb: window[1],
        };
        if pair.is_plausible() && pair.storage_gb >= pair.ram_gb {
            return Some(pair);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(ram_gb: i32, storage_gb: i32) -> RamStorage {
        RamStorage { ram_gb, storage_gb }
    }

    fn make_variant(id: i64, ram: i32, storage: i32, color: Option<&str>) -> VariantSpec {
        VariantSpec {
            variant_id: id,
            ram_gb: ram,
            storage_gb: storage,
            color: color.map(str::to_string),
            label: None,
        }
    }

    // -----------------------------------------------------------------------
    // normalize_title
    // -----------------------------------------------------------------------

    #[test]
    fn normalize_lowercases_and_replaces_brackets() {
        assert_eq!(
            normalize_title("[PROMO] Redmi Note 13 | 8/256_Hitam"),
            "promo redmi note 13 8/256 hitam"
        );
    }

    #[test]
    fn normalize_keeps_capacity_separators() {
        assert_eq!(normalize_title("8/256 8-256 8+256 8x256"), "8/256 8-256 8+256 8x256");
    }

    // -----------------------------------------------------------------------
    // extract_ram_rom: ordered patterns
    // -----------------------------------------------------------------------

    #[test]
    fn compact_pair_no_units() {
        let m = extract_ram_rom("Redmi Note 13 8/256 Hitam").expect("should match");
        assert_eq!(m.pair, pair(8, 256));
        assert_eq!(m.pattern, TitlePattern::CompactPair);
    }

    #[test]
    fn compact_pair_with_dash_separator() {
        let m = extract_ram_rom("Samsung Galaxy A54 8-128 Awesome Lime").expect("should match");
        assert_eq!(m.pair, pair(8, 128));
    }

    #[test]
    fn compact_pair_skips_implausible_match() {
        // "12-12" fails the storage range; the real pair later in the title wins.
        let m = extract_ram_rom("Promo 12-12 Redmi 8/256").expect("should match");
        assert_eq!(m.pair, pair(8, 256));
    }

    #[test]
    fn unit_pair_both_sides() {
        let m = extract_ram_rom("POCO X6 Pro 12GB/512GB").expect("should match");
        assert_eq!(m.pair, pair(12, 512));
        assert_eq!(m.pattern, TitlePattern::UnitPair);
    }

    #[test]
    fn unit_pair_terabyte_storage() {
        let m = extract_ram_rom("Galaxy S24 Ultra 12GB/1TB Titanium").expect("should match");
        assert_eq!(m.pair, pair(12, 1024));
    }

    #[test]
    fn ram_keyword_before_storage_keyword() {
        let m = extract_ram_rom("RAM 12GB ROM 256GB").expect("should match");
        assert_eq!(m.pair, pair(12, 256));
        assert_eq!(m.pattern, TitlePattern::RamFirst);
    }

    #[test]
    fn ram_keyword_with_indonesian_storage_keyword() {
        let m = extract_ram_rom("HP Murah RAM 8 GB Memori Internal 128 GB").expect("should match");
        assert_eq!(m.pair, pair(8, 128));
    }

    #[test]
    fn storage_keyword_before_ram_keyword() {
        let m = extract_ram_rom("Internal 256GB RAM 8GB Garansi Resmi").expect("should match");
        assert_eq!(m.pair, pair(8, 256));
        assert_eq!(m.pattern, TitlePattern::StorageFirst);
    }

    #[test]
    fn loose_scan_adjacent_tokens() {
        let m = extract_ram_rom("Samsung A15 8GB 256GB 5000mAh").expect("should match");
        assert_eq!(m.pair, pair(8, 256));
        assert_eq!(m.pattern, TitlePattern::LooseScan);
    }

    #[test]
    fn loose_scan_requires_storage_at_least_ram() {
        // 256GB then 8GB is not an adjacent (RAM, storage) pair in order.
        assert!(extract_ram_rom("Case for 256GB 8GB models").is_none());
    }

    #[test]
    fn single_capacity_title_yields_none() {
        assert!(extract_ram_rom("iPhone 15 128GB").is_none());
    }

    #[test]
    fn no_capacity_tokens_yields_none() {
        assert!(extract_ram_rom("Charger 33W Original").is_none());
    }

    #[test]
    fn battery_tokens_do_not_form_a_pair() {
        assert!(extract_ram_rom("Powerbank 10000mAh 22.5W").is_none());
    }

    // -----------------------------------------------------------------------
    // match_variant
    // -----------------------------------------------------------------------

    #[test]
    fn exact_capacity_single_candidate() {
        let variants = vec![
            make_variant(1, 8, 256, Some("Hitam")),
            make_variant(2, 12, 512, Some("Biru")),
        ];
        let outcome = match_variant(
            "Redmi Note 13 8/256 Garansi",
            &variants,
            ColorFallback::FirstVariant,
        );
        assert_eq!(outcome.variant.expect("should match").variant_id, 1);
    }

    #[test]
    fn zero_candidates_is_no_match_with_extraction() {
        let variants = vec![make_variant(1, 12, 512, None)];
        let outcome = match_variant("Redmi Note 13 8/256", &variants, ColorFallback::FirstVariant);
        assert!(outcome.variant.is_none());
        assert_eq!(outcome.extracted.expect("pair extracted").pair, pair(8, 256));
    }

    #[test]
    fn color_mention_disambiguates() {
        let variants = vec![
            make_variant(1, 8, 256, Some("Hitam")),
            make_variant(2, 8, 256, Some("Biru")),
        ];
        let outcome = match_variant(
            "Redmi Note 13 8/256 Biru Laut",
            &variants,
            ColorFallback::FirstVariant,
        );
        assert_eq!(outcome.variant.expect("should match").variant_id, 2);
    }

    #[test]
    fn no_color_mention_first_variant_policy() {
        let variants = vec![
            make_variant(1, 8, 256, Some("Hitam")),
            make_variant(2, 8, 256, Some("Biru")),
        ];
        let outcome = match_variant("Redmi Note 13 8/256", &variants, ColorFallback::FirstVariant);
        assert_eq!(outcome.variant.expect("should match").variant_id, 1);
    }

    #[test]
    fn no_color_mention_no_match_policy() {
        let variants = vec![
            make_variant(1, 8, 256, Some("Hitam")),
            make_variant(2, 8, 256, Some("Biru")),
        ];
        let outcome = match_variant("Redmi Note 13 8/256", &variants, ColorFallback::NoMatch);
        assert!(outcome.variant.is_none());
        assert!(outcome.extracted.is_some());
    }

    #[test]
    fn variant_without_color_never_matches_by_color() {
        let variants = vec![
            make_variant(1, 8, 256, None),
            make_variant(2, 8, 256, Some("Biru")),
        ];
        let outcome = match_variant(
            "Redmi Note 13 8/256 Biru",
            &variants,
            ColorFallback::FirstVariant,
        );
        assert_eq!(outcome.variant.expect("should match").variant_id, 2);
    }

    #[test]
    fn unextractable_title_has_no_pair_and_no_variant() {
        let variants = vec![make_variant(1, 8, 256, None)];
        let outcome = match_variant("iPhone 15 128GB", &variants, ColorFallback::FirstVariant);
        assert!(outcome.extracted.is_none());
        assert!(outcome.variant.is_none());
    }
}
