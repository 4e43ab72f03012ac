//! Extraction logic for marketplace listing pages and device spec pages:
//! text flattening, price normalization, the price strategy cascade, the
//! specification table extractor, and the title-to-variant matcher. All
//! parsing here is pure and synchronous; only [`fetch`] touches the network.

pub mod error;
pub mod fetch;
pub mod money;
pub mod price;
pub mod specs;
pub mod text;
pub mod variant;

pub use error::ExtractError;
pub use fetch::{build_client, fetch_html};
pub use money::{normalize_scaled, parse_price_text};
pub use price::{extract_price, PriceFound, PriceStrategy};
pub use specs::{extract_specs, PhoneSpecs, SpecPage};
pub use text::{normalize_fragment, page_title};
pub use variant::{extract_ram_rom, match_variant, MatchOutcome, RamRomMatch, TitlePattern};
