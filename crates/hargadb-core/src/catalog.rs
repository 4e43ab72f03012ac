use serde::{Deserialize, Serialize};

/// An extracted (RAM, storage) capacity pair, both in gigabytes.
///
/// Terabyte tokens are converted to gigabytes before construction, so a
/// `"1TB"` storage reading arrives here as `1024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RamStorage {
    pub ram_gb: i32,
    pub storage_gb: i32,
}

impl RamStorage {
    pub const RAM_MIN: i32 = 1;
    pub const RAM_MAX: i32 = 48;
    pub const STORAGE_MIN: i32 = 16;
    pub const STORAGE_MAX: i32 = 4096;

    /// Returns `true` if both capacities fall inside the plausible ranges
    /// for a phone (RAM 1–48 GB, storage 16–4096 GB).
    #[must_use]
    pub fn is_plausible(self) -> bool {
        (Self::RAM_MIN..=Self::RAM_MAX).contains(&self.ram_gb)
            && (Self::STORAGE_MIN..=Self::STORAGE_MAX).contains(&self.storage_gb)
    }
}

impl std::fmt::Display for RamStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.ram_gb, self.storage_gb)
    }
}

/// A known variant of a catalog product, as seen by the title matcher.
///
/// Variant identity is ephemeral (the admin panel replaces a product's
/// variant set wholesale on every edit), so matching works on capacity and
/// color content, never on a remembered `variant_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantSpec {
    pub variant_id: i64,
    pub ram_gb: i32,
    pub storage_gb: i32,
    pub color: Option<String>,
    pub label: Option<String>,
}

impl VariantSpec {
    /// Human-readable label for logs and ingestion results: the explicit
    /// label when set, otherwise `"8/256 Hitam"`-style capacity + color.
    #[must_use]
    pub fn display_label(&self) -> String {
        if let Some(label) = &self.label {
            if !label.is_empty() {
                return label.clone();
            }
        }
        let capacity = RamStorage {
            ram_gb: self.ram_gb,
            storage_gb: self.storage_gb,
        };
        match &self.color {
            Some(color) if !color.is_empty() => format!("{capacity} {color}"),
            _ => capacity.to_string(),
        }
    }
}

/// Policy for picking among same-capacity variants when no color token
/// appears in the listing title.
///
/// `FirstVariant` reproduces the long-observed behavior (first variant in
/// input order wins); `NoMatch` refuses to guess and routes the listing to
/// the unmapped queue instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorFallback {
    #[default]
    FirstVariant,
    NoMatch,
}

impl ColorFallback {
    /// Parses the `HARGADB_COLOR_FALLBACK` setting.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first-variant" => Some(Self::FirstVariant),
            "no-match" => Some(Self::NoMatch),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstVariant => "first-variant",
            Self::NoMatch => "no-match",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // RamStorage
    // -----------------------------------------------------------------------

    #[test]
    fn plausible_accepts_common_pair() {
        assert!(RamStorage {
            ram_gb: 8,
            storage_gb: 256
        }
        .is_plausible());
    }

    #[test]
    fn plausible_accepts_terabyte_storage() {
        assert!(RamStorage {
            ram_gb: 16,
            storage_gb: 1024
        }
        .is_plausible());
    }

    #[test]
    fn plausible_rejects_zero_ram() {
        assert!(!RamStorage {
            ram_gb: 0,
            storage_gb: 128
        }
        .is_plausible());
    }

    #[test]
    fn plausible_rejects_tiny_storage() {
        assert!(!RamStorage {
            ram_gb: 8,
            storage_gb: 12
        }
        .is_plausible());
    }

    #[test]
    fn plausible_rejects_oversized_ram() {
        assert!(!RamStorage {
            ram_gb: 64,
            storage_gb: 512
        }
        .is_plausible());
    }

    #[test]
    fn display_formats_as_slash_pair() {
        let pair = RamStorage {
            ram_gb: 12,
            storage_gb: 512,
        };
        assert_eq!(pair.to_string(), "12/512");
    }

    // -----------------------------------------------------------------------
    // VariantSpec
    // -----------------------------------------------------------------------

    fn make_variant(color: Option<&str>, label: Option<&str>) -> VariantSpec {
        VariantSpec {
            variant_id: 1,
            ram_gb: 8,
            storage_gb: 256,
            color: color.map(str::to_string),
            label: label.map(str::to_string),
        }
    }

    #[test]
    fn display_label_prefers_explicit_label() {
        let v = make_variant(Some("Hitam"), Some("8GB/256GB Midnight Black"));
        assert_eq!(v.display_label(), "8GB/256GB Midnight Black");
    }

    #[test]
    fn display_label_falls_back_to_capacity_and_color() {
        let v = make_variant(Some("Hitam"), None);
        assert_eq!(v.display_label(), "8/256 Hitam");
    }

    #[test]
    fn display_label_without_color_is_capacity_only() {
        let v = make_variant(None, None);
        assert_eq!(v.display_label(), "8/256");
    }

    #[test]
    fn display_label_ignores_empty_label() {
        let v = make_variant(None, Some(""));
        assert_eq!(v.display_label(), "8/256");
    }

    // -----------------------------------------------------------------------
    // ColorFallback
    // -----------------------------------------------------------------------

    #[test]
    fn color_fallback_parses_known_values() {
        assert_eq!(
            ColorFallback::parse("first-variant"),
            Some(ColorFallback::FirstVariant)
        );
        assert_eq!(ColorFallback::parse("no-match"), Some(ColorFallback::NoMatch));
    }

    #[test]
    fn color_fallback_rejects_unknown_value() {
        assert_eq!(ColorFallback::parse("guess"), None);
    }

    #[test]
    fn color_fallback_default_is_first_variant() {
        assert_eq!(ColorFallback::default(), ColorFallback::FirstVariant);
    }
}
