//! Specification-page extraction.
//!
//! Spec pages expose the same datum two ways: a machine-readable
//! `data-spec` attribute on the value cell, and a human label cell in the
//! same table row. Both indexes are built once per page; each field then
//! resolves through a prioritized key list, attributes before labels,
//! first hit wins.

use std::collections::HashMap;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::text::normalize_fragment;

/// The two per-page indexes a spec page is reduced to before field
/// resolution.
#[derive(Debug, Clone, Default)]
pub struct SpecPage {
    attrs: HashMap<String, String>,
    labels: HashMap<String, String>,
}

impl SpecPage {
    /// Builds both indexes in one pass over the document.
    ///
    /// Attribute index: every element carrying `data-spec`, keyed by the
    /// attribute value; first occurrence wins. Label index: every table row
    /// with at least a label cell and a value cell, keyed by the lower-cased
    /// label text; empty labels are skipped, first occurrence wins.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let attr_sel = Selector::parse("[data-spec]").expect("valid selector");
        let row_sel = Selector::parse("tr").expect("valid selector");
        let cell_sel = Selector::parse("td, th").expect("valid selector");

        let mut attrs = HashMap::new();
        for el in doc.select(&attr_sel) {
            if let Some(key) = el.value().attr("data-spec") {
                attrs
                    .entry(key.to_string())
                    .or_insert_with(|| normalize_fragment(&el.inner_html()));
            }
        }

        let mut labels = HashMap::new();
        for row in doc.select(&row_sel) {
            let cells: Vec<_> = row.select(&cell_sel).collect();
            if cells.len() < 2 {
                continue;
            }
            let label = normalize_fragment(&cells[0].inner_html()).to_lowercase();
            if label.is_empty() {
                continue;
            }
            labels
                .entry(label)
                .or_insert_with(|| normalize_fragment(&cells[1].inner_html()));
        }

        Self { attrs, labels }
    }

    /// Resolves a field: attribute keys in priority order, then label keys.
    /// Empty captured values count as absent.
    #[must_use]
    pub fn resolve(&self, attr_keys: &[&str], label_keys: &[&str]) -> Option<&str> {
        for key in attr_keys {
            if let Some(v) = self.attrs.get(*key) {
                if !v.is_empty() {
                    return Some(v);
                }
            }
        }
        for key in label_keys {
            if let Some(v) = self.labels.get(*key) {
                if !v.is_empty() {
                    return Some(v);
                }
            }
        }
        None
    }
}

/// The fixed field set produced by [`extract_specs`]. Every field is
/// optional; an unresolvable or unparsable field is `None`, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhoneSpecs {
    pub network_tech: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub release_year: Option<i32>,
    pub dimensions: Option<String>,
    pub weight: Option<String>,
    pub ip_rating: Option<String>,
    pub display_type: Option<String>,
    pub display_size_in: Option<f64>,
    pub display_resolution: Option<String>,
    pub display_protection: Option<String>,
    pub os: Option<String>,
    pub chipset: Option<String>,
    pub memory_card_slot: Option<bool>,
    pub internal_memory: Option<String>,
    pub main_camera_mp: Option<u32>,
    pub main_camera_specs: Option<String>,
    pub main_camera_video: Option<String>,
    pub selfie_camera_mp: Option<u32>,
    pub selfie_camera_specs: Option<String>,
    pub selfie_camera_video: Option<String>,
    pub nfc: Option<bool>,
    pub audio_jack: Option<bool>,
    pub battery_mah: Option<u32>,
    pub charging: Option<String>,
    pub sensors: Option<String>,
    pub speaker: Option<String>,
    pub wlan: Option<String>,
    pub bluetooth: Option<String>,
    pub gps: Option<String>,
    pub usb: Option<String>,
}

/// Extracts the full fixed field set from a specification page.
#[must_use]
pub fn extract_specs(html: &str) -> PhoneSpecs {
    let page = SpecPage::parse(html);
    let owned = |v: Option<&str>| v.map(str::to_string);

    let release_raw = page.resolve(&["released-hl", "year"], &["announced", "released", "release date"]);
    let (release_date, release_year) = release_raw.map_or((None, None), parse_release);

    let main_camera_specs = owned(page.resolve(&["cam1modules"], &["main camera"]));
    let selfie_camera_specs = owned(page.resolve(&["cam2modules"], &["selfie camera", "front camera"]));

    let ip_rating = find_ip_rating(&[
        page.resolve(&["build"], &["build"]),
        page.resolve(&["body-other"], &["body"]),
        page.resolve(&["displayprotection"], &["protection"]),
    ]);

    PhoneSpecs {
        network_tech: owned(page.resolve(&["nettech"], &["technology", "network technology"])),
        release_date,
        release_year,
        dimensions: owned(page.resolve(&["dimensions"], &["dimensions"])),
        weight: owned(page.resolve(&["weight"], &["weight"])),
        ip_rating,
        display_type: owned(page.resolve(&["displaytype"], &["display type"])),
        display_size_in: page
            .resolve(&["displaysize"], &["size", "display size"])
            .and_then(parse_inches),
        display_resolution: owned(page.resolve(&["displayresolution"], &["resolution"])),
        display_protection: owned(page.resolve(&["displayprotection"], &["protection"])),
        os: owned(page.resolve(&["os"], &["os"])),
        chipset: owned(page.resolve(&["chipset"], &["chipset"])),
        memory_card_slot: page
            .resolve(&["memoryslot"], &["card slot"])
            .map(parse_card_slot),
        internal_memory: owned(page.resolve(&["internalmemory"], &["internal", "internal memory"])),
        main_camera_mp: main_camera_specs.as_deref().and_then(parse_megapixels),
        main_camera_video: owned(page.resolve(&["cam1video"], &["video"])),
        main_camera_specs,
        selfie_camera_mp: selfie_camera_specs.as_deref().and_then(parse_megapixels),
        selfie_camera_video: owned(page.resolve(&["cam2video"], &["selfie video"])),
        selfie_camera_specs,
        nfc: page.resolve(&["nfc"], &["nfc"]).map(parse_yes_no),
        audio_jack: page
            .resolve(&["audiojack", "headsetjack"], &["3.5mm jack", "audio jack"])
            .map(parse_yes_no),
        battery_mah: page
            .resolve(&["batdescription1"], &["battery", "battery type", "capacity"])
            .and_then(parse_battery_mah),
        charging: owned(page.resolve(&["batchargedetails", "charging"], &["charging"])),
        sensors: owned(page.resolve(&["sensors"], &["sensors"])),
        speaker: owned(page.resolve(&["speaker"], &["loudspeaker", "speaker"])),
        wlan: owned(page.resolve(&["wlan"], &["wlan", "wifi"])),
        bluetooth: owned(page.resolve(&["bluetooth"], &["bluetooth"])),
        gps: owned(page.resolve(&["gps"], &["positioning", "gps"])),
        usb: owned(page.resolve(&["usb"], &["usb"])),
    }
}

// ---------------------------------------------------------------------------
// Typed sub-parsers
// ---------------------------------------------------------------------------

fn parse_megapixels(text: &str) -> Option<u32> {
    let re = Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*MP\b").expect("valid regex");
    let value: f64 = re.captures(text)?[1].parse().ok()?;
    Some(value.round() as u32)
}

fn parse_battery_mah(text: &str) -> Option<u32> {
    let re = Regex::new(r"(?i)(\d{3,5})\s*mAh\b").expect("valid regex");
    re.captures(text)?[1].parse().ok()
}

fn parse_inches(text: &str) -> Option<f64> {
    let re = Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*inches\b").expect("valid regex");
    re.captures(text)?[1].parse().ok()
}

/// "Yes, with ..." → true, "No" → false, anything else → false (unknown
/// support is treated as unsupported).
fn parse_yes_no(text: &str) -> bool {
    let lower = text.to_lowercase();
    if lower.contains("yes") {
        return true;
    }
    false
}

/// Card-slot cells name the card family ("microSDXC (dedicated slot)")
/// rather than saying "yes"; only an explicit "No" means absent.
fn parse_card_slot(text: &str) -> bool {
    !text.trim().to_lowercase().starts_with("no")
}

fn find_ip_rating(candidates: &[Option<&str>]) -> Option<String> {
    let re = Regex::new(r"IP\d{2}[A-Z]*").expect("valid regex");
    for text in candidates.iter().flatten() {
        if let Some(m) = re.find(text) {
            return Some(m.as_str().to_string());
        }
    }
    None
}

/// Tries "2024, January 15" then "2024, January" then a bare year. A full
/// date parses to an ISO date; the year is best-effort in every branch.
fn parse_release(text: &str) -> (Option<NaiveDate>, Option<i32>) {
    let day_re =
        Regex::new(r"(\d{4}),\s*([A-Za-z]+)\s+(\d{1,2})").expect("valid regex");
    if let Some(caps) = day_re.captures(text) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        if let (Some(month), Ok(day)) = (month_number(&caps[2]), caps[3].parse::<u32>()) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return (Some(date), Some(year));
            }
        }
        if year > 0 {
            return (None, Some(year));
        }
    }

    let month_re = Regex::new(r"(\d{4}),\s*([A-Za-z]+)").expect("valid regex");
    if let Some(caps) = month_re.captures(text) {
        if let Ok(year) = caps[1].parse::<i32>() {
            return (None, Some(year));
        }
    }

    let year_re = Regex::new(r"\b((?:19|20)\d{2})\b").expect("valid regex");
    if let Some(caps) = year_re.captures(text) {
        if let Ok(year) = caps[1].parse::<i32>() {
            return (None, Some(year));
        }
    }

    (None, None)
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let n = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}
