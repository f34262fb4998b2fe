use serde::{Deserialize, Serialize};

/// Top-level configuration for the alignment pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    pub clean: CleanOptions,
    pub align: AlignSettings,
}

/// Toggles for the headline cleaning stages.
///
/// Every stage is enabled by default except `lowercase`: the downstream
/// sentiment model is case-insensitive, so case is kept for readability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    /// Replace `<...>` tags with a space.
    pub remove_html_tags: bool,
    /// Decode `&amp;`, `&#39;` and friends.
    pub remove_html_entities: bool,
    /// Drop `http(s)://` and `www.` tokens.
    pub remove_urls: bool,
    /// Drop cashtags such as `$AAPL`.
    pub remove_tickers: bool,
    pub remove_emojis: bool,
    /// Drop everything outside letters, digits, whitespace and basic punctuation.
    pub remove_special_chars: bool,
    /// Collapse whitespace runs to a single space.
    pub normalize_whitespace: bool,
    pub strip_whitespace: bool,
    pub lowercase: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            remove_html_tags: true,
            remove_html_entities: true,
            remove_urls: true,
            remove_tickers: true,
            remove_emojis: true,
            remove_special_chars: true,
            normalize_whitespace: true,
            strip_whitespace: true,
            lowercase: false,
        }
    }
}

impl CleanOptions {
    /// Options with every stage disabled. Useful as a base for enabling a
    /// single stage in isolation.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            remove_html_tags: false,
            remove_html_entities: false,
            remove_urls: false,
            remove_tickers: false,
            remove_emojis: false,
            remove_special_chars: false,
            normalize_whitespace: false,
            strip_whitespace: false,
            lowercase: false,
        }
    }

    #[must_use]
    pub const fn with_lowercase(mut self, enabled: bool) -> Self {
        self.lowercase = enabled;
        self
    }

    #[must_use]
    pub const fn with_remove_urls(mut self, enabled: bool) -> Self {
        self.remove_urls = enabled;
        self
    }

    #[must_use]
    pub const fn with_remove_tickers(mut self, enabled: bool) -> Self {
        self.remove_tickers = enabled;
        self
    }

    #[must_use]
    pub const fn with_remove_emojis(mut self, enabled: bool) -> Self {
        self.remove_emojis = enabled;
        self
    }

    #[must_use]
    pub const fn with_remove_special_chars(mut self, enabled: bool) -> Self {
        self.remove_special_chars = enabled;
        self
    }

    #[must_use]
    pub const fn with_remove_html_tags(mut self, enabled: bool) -> Self {
        self.remove_html_tags = enabled;
        self
    }

    #[must_use]
    pub const fn with_remove_html_entities(mut self, enabled: bool) -> Self {
        self.remove_html_entities = enabled;
        self
    }

    #[must_use]
    pub const fn with_normalize_whitespace(mut self, enabled: bool) -> Self {
        self.normalize_whitespace = enabled;
        self
    }

    #[must_use]
    pub const fn with_strip_whitespace(mut self, enabled: bool) -> Self {
        self.strip_whitespace = enabled;
        self
    }
}

/// Column names and validation policy for a merge run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignSettings {
    /// Date column, shared by the price and news tables.
    pub date_column: String,
    /// Headline column in the news table.
    pub headline_column: String,
    /// Ticker column in the price table.
    pub ticker_column: String,
    pub validate_inputs: bool,
    pub validate_outputs: bool,
}

impl Default for AlignSettings {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            headline_column: "headline".to_string(),
            ticker_column: "ticker".to_string(),
            validate_inputs: true,
            validate_outputs: true,
        }
    }
}
