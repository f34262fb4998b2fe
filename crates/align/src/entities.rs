//! HTML5 character reference decoding.
//!
//! Follows the WHATWG rules for references found in text:
//! - named references resolve through the full HTML5 table;
//! - the legacy Latin-1 names also resolve without a trailing `;`, including
//!   as a prefix (`&copyx;` becomes `©x;`);
//! - numeric references in 0x80..=0x9F map through Windows-1252;
//! - surrogates, zero and values past U+10FFFF become U+FFFD;
//! - noncharacters and most control code points are dropped.
//!
//! Anything that is not a reference is left as written.

use html_escape::NAMED_ENTITIES;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static CHARREF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\x0C <&#;]{1,32};?)")
        .expect("character reference pattern is valid")
});

/// Names that also resolve without a trailing semicolon.
const LEGACY_NAMES: [&str; 106] = [
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Windows-1252 readings of the C1 range, indexed from 0x80.
const WINDOWS_1252: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Decodes every character reference in `text` in a single pass.
///
/// Decoded output is never re-scanned, so `&amp;amp;` becomes `&amp;`.
pub fn unescape_html(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    CHARREF_PATTERN.replace_all(text, |caps: &Captures| decode_reference(&caps[1]))
}

fn decode_reference(reference: &str) -> String {
    if let Some(number) = reference.strip_prefix('#') {
        return decode_numeric(number);
    }

    if let Some(name) = reference.strip_suffix(';') {
        if let Some(value) = named_entity(name) {
            return value.to_string();
        }
    } else if let Some(value) = legacy_entity(reference) {
        return value.to_string();
    }

    // Longest legacy name that prefixes the reference; the rest stays literal.
    for end in (2..reference.len()).rev() {
        if !reference.is_char_boundary(end) {
            continue;
        }
        if let Some(value) = legacy_entity(&reference[..end]) {
            return format!("{value}{}", &reference[end..]);
        }
    }

    format!("&{reference}")
}

fn decode_numeric(number: &str) -> String {
    let digits = number.trim_end_matches(';');
    let parsed = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    };
    // Overflow is past U+10FFFF either way.
    let code = parsed.unwrap_or(u32::MAX);

    match code {
        0 => '\u{FFFD}'.to_string(),
        0x0D => '\r'.to_string(),
        0x80..=0x9F => WINDOWS_1252[(code - 0x80) as usize].to_string(),
        0xD800..=0xDFFF | 0x11_0000..=u32::MAX => '\u{FFFD}'.to_string(),
        c if is_dropped_code_point(c) => String::new(),
        c => char::from_u32(c).map_or_else(|| '\u{FFFD}'.to_string(), String::from),
    }
}

fn is_dropped_code_point(code: u32) -> bool {
    matches!(code, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F | 0xFDD0..=0xFDEF)
        || code & 0xFFFE == 0xFFFE
}

fn named_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES
        .binary_search_by(|(candidate, _)| candidate.cmp(&name.as_bytes()))
        .ok()
        .map(|index| NAMED_ENTITIES[index].1)
}

fn legacy_entity(name: &str) -> Option<&'static str> {
    LEGACY_NAMES
        .binary_search(&name)
        .ok()
        .and_then(|_| named_entity(name))
}
