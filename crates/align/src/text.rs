//! Headline text normalization.
//!
//! [`clean_headline`] runs up to eight stages in a fixed order. The order
//! matters:
//!
//! 1. HTML tags go first so markup can't hide entity text.
//! 2. Entities are decoded before URL and ticker removal, so an encoded
//!    `&#36;AAPL` or `https:&#47;&#47;` is matched in its decoded form.
//! 3. URLs are removed as whole tokens (path, query and port included).
//! 4. Tickers (`$` + 1-5 letters) are removed before special characters, so
//!    `$100` loses only its `$` and keeps the amount.
//! 5. NFKD, then emoji removal, then the allow-list: letters and numbers
//!    (general categories `L*` and `N*`), `_`, whitespace and
//!    [`ALLOWED_PUNCTUATION`]. Combining marks are dropped, so `café`
//!    becomes `cafe`.
//! 6. Whitespace runs collapse to one space.
//! 7. Trim.
//! 8. Lowercase (off by default).

use crate::emoji::is_emoji;
use crate::entities::unescape_html;
use news_align_core::CleanOptions;
use polars::prelude::AnyValue;
use regex::Regex;
use std::fmt::{Display, LowerExp};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// `http(s)://...` and bare `www....`, up to the next whitespace.
pub static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)https?://(?:[-\w.]|%[0-9a-f]{2})+\S*|www\.(?:[-\w.]|%[0-9a-f]{2})+\S*",
    )
    .expect("URL pattern is valid")
});

/// Cashtags such as `$AAPL` or `$aapl`.
pub static TICKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[A-Za-z]{1,5}\b").expect("ticker pattern is valid"));

pub static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

pub static HTML_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("HTML tag pattern is valid"));

/// Punctuation kept by the special-character stage.
pub const ALLOWED_PUNCTUATION: &str = ".,!?'\"-:;()[]{}/\\@#%&*+=<>|~`";

/// Anything outside letters, numbers, `_`, whitespace and [`ALLOWED_PUNCTUATION`].
pub static SPECIAL_CHAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"[^\p{{L}}\p{{N}}_\s{}]",
        regex::escape(ALLOWED_PUNCTUATION)
    ))
    .expect("special character pattern is valid")
});

/// A raw headline resolved at the pipeline boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlineValue {
    /// Null, NaN, or a value that stringifies to "nan".
    Missing,
    Text(String),
    /// A value with no meaningful text form (e.g. a list).
    Unstringifiable,
}

impl HeadlineValue {
    /// Stringifies a non-text value. A rendering of "nan" (any case) counts as missing.
    pub fn stringified(value: impl Display) -> Self {
        let text = value.to_string();
        if text.eq_ignore_ascii_case("nan") {
            Self::Missing
        } else {
            Self::Text(text)
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Missing | Self::Unstringifiable => None,
        }
    }
}

impl From<&str> for HeadlineValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for HeadlineValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for HeadlineValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for HeadlineValue {
    fn from(value: i64) -> Self {
        Self::stringified(value)
    }
}

impl From<f64> for HeadlineValue {
    fn from(value: f64) -> Self {
        Self::stringified(python_float_repr(value))
    }
}

impl From<bool> for HeadlineValue {
    fn from(value: bool) -> Self {
        Self::Text(if value { "True" } else { "False" }.to_string())
    }
}

impl<T: Into<HeadlineValue>> From<Option<T>> for HeadlineValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

impl From<&AnyValue<'_>> for HeadlineValue {
    fn from(value: &AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Self::Missing,
            AnyValue::String(s) => Self::Text((*s).to_string()),
            AnyValue::StringOwned(s) => Self::Text(s.to_string()),
            AnyValue::Boolean(b) => Self::from(*b),
            AnyValue::Float64(v) => Self::from(*v),
            AnyValue::Float32(v) => Self::stringified(python_float_repr(*v)),
            AnyValue::List(_) => Self::Unstringifiable,
            other => Self::stringified(other),
        }
    }
}

impl From<AnyValue<'_>> for HeadlineValue {
    fn from(value: AnyValue<'_>) -> Self {
        Self::from(&value)
    }
}

/// Renders a float the way Python's `repr` does.
///
/// Positional notation always carries a fractional part (`1.0`). Exponents
/// below -4 or at 16 and above switch to scientific form with a signed,
/// two-digit exponent (`1e+16`, `1.5e-07`).
pub fn python_float_repr<F: Display + LowerExp>(value: F) -> String {
    let positional = value.to_string();
    match positional.as_str() {
        "NaN" => return "nan".to_string(),
        "inf" | "-inf" => return positional,
        _ => {}
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .and_then(|(m, e)| e.parse::<i32>().ok().map(|e| (m, e)))
        .unwrap_or((positional.as_str(), 0));

    if (-4..16).contains(&exponent) {
        if positional.contains('.') {
            positional
        } else {
            format!("{positional}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}

/// Cleans one headline value.
///
/// Missing or unstringifiable values, and text that is empty or whitespace,
/// return `""` without running any stage. Text that becomes empty during
/// cleaning also returns `""`.
pub fn clean_headline(value: impl Into<HeadlineValue>, options: CleanOptions) -> String {
    match value.into() {
        HeadlineValue::Text(text) => clean_text(&text, options),
        HeadlineValue::Missing | HeadlineValue::Unstringifiable => String::new(),
    }
}

/// Runs the enabled cleaning stages over `text`.
#[must_use]
pub fn clean_text(text: &str, options: CleanOptions) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut result = text.to_string();

    if options.remove_html_tags {
        result = HTML_TAG_PATTERN.replace_all(&result, " ").into_owned();
    }

    if options.remove_html_entities {
        result = unescape_html(&result).into_owned();
    }

    if options.remove_urls {
        result = URL_PATTERN.replace_all(&result, "").into_owned();
    }

    if options.remove_tickers {
        result = TICKER_PATTERN.replace_all(&result, "").into_owned();
    }

    if options.remove_emojis || options.remove_special_chars {
        result = result
            .nfkd()
            .filter(|&c| !(options.remove_emojis && is_emoji(c)))
            .collect();
        if options.remove_special_chars {
            result = SPECIAL_CHAR_PATTERN.replace_all(&result, "").into_owned();
        }
    }

    if options.normalize_whitespace {
        result = WHITESPACE_PATTERN.replace_all(&result, " ").into_owned();
    }

    if options.strip_whitespace {
        result = result.trim().to_string();
    }

    if options.lowercase {
        result = result.to_lowercase();
    }

    result
}

/// Cleans each value in order and keeps the non-empty results.
pub fn clean_headlines_batch<I, V>(values: I, options: CleanOptions) -> Vec<String>
where
    I: IntoIterator<Item = V>,
    V: Into<HeadlineValue>,
{
    values
        .into_iter()
        .map(|v| clean_headline(v, options))
        .filter(|s| !s.is_empty())
        .collect()
}
