//! Markup-to-text flattening shared by every extractor.
//!
//! All extractors resolve raw HTML fragments through [`normalize_fragment`]
//! so that entity handling and whitespace behavior stay uniform across the
//! spec table indexes, the CSS-selector price strategy, and title handling.

use regex::Regex;

/// Flattens a markup fragment into plain text.
///
/// - `<sup>…</sup>` footnote markers are removed together with their content
/// - `<br>`-family tags become `"; "` separators
/// - all remaining tags are stripped
/// - named and numeric (`&#123;` / `&#x7B;`) entities are decoded; unknown
///   named entities are dropped
/// - whitespace runs collapse to a single space and the result is trimmed
#[must_use]
pub fn normalize_fragment(raw: &str) -> String {
    let sup = Regex::new(r"(?is)<sup[^>]*>.*?</sup>").expect("valid regex");
    let br = Regex::new(r"(?i)<br\s*/?\s*>").expect("valid regex");
    let tag = Regex::new(r"(?s)<[^>]*>").expect("valid regex");

    let text = sup.replace_all(raw, "");
    let text = br.replace_all(&text, "; ");
    let text = tag.replace_all(&text, " ");
    let text = decode_entities(&text);

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts and flattens the page `<title>`, if present and non-empty.
#[must_use]
pub fn page_title(html: &str) -> Option<String> {
    let re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex");
    let raw = re.captures(html)?.get(1)?.as_str();
    let title = normalize_fragment(raw);
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Decodes HTML entities in a single pass.
///
/// Numeric references (decimal and hex) always decode; named entities come
/// from a fixed table and anything unrecognized is dropped rather than kept
/// as markup noise. A bare `&` that forms no entity stays literal.
fn decode_entities(s: &str) -> String {
    let re = Regex::new(r"&(#[xX]?[0-9a-fA-F]{1,8}|[a-zA-Z][a-zA-Z0-9]{1,9});").expect("valid regex");
    re.replace_all(s, |caps: &regex::Captures<'_>| {
        let body = &caps[1];
        if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
            u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        } else if let Some(dec) = body.strip_prefix('#') {
            dec.parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        } else {
            named_entity(body).map(String::from).unwrap_or_default()
        }
    })
    .into_owned()
}

fn named_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "deg" => "\u{b0}",
        "plusmn" => "\u{b1}",
        "micro" => "\u{b5}",
        "middot" => "\u{b7}",
        "times" => "\u{d7}",
        "frac12" => "\u{bd}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "bull" => "\u{2022}",
        "hellip" => "\u{2026}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        _ => return None,
    })
}
