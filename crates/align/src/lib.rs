//! News headline cleaning and daily news/price alignment.
//!
//! This crate provides:
//! - A configurable headline normalizer (HTML, URLs, tickers, emoji, punctuation)
//! - Date normalization to zone-naive calendar days
//! - Shape checks for the price and news frames and the merged table
//! - The polars left join of daily headline groups onto daily price bars
//!
//! # Example
//!
//! ```
//! use news_align::{align, AlignOptions};
//! use news_align_data::sample::sample_tables;
//!
//! let (price, news) = sample_tables().unwrap();
//! let merged = align(Some(&price), Some(&news), &AlignOptions::default()).unwrap();
//! assert_eq!(merged.len(), 3);
//! assert_eq!(merged.total_headlines(), 3);
//! ```

pub mod aligner;
pub mod dates;
pub mod emoji;
pub mod entities;
pub mod schema;
pub mod text;

pub use aligner::{aggregate_news, align, align_records, AlignOptions};
pub use dates::{normalize_date, normalize_date_str, normalize_dates, DateErrorMode};
pub use emoji::{is_emoji, is_emoji_str, EMOJI_RANGES};
pub use entities::unescape_html;
pub use schema::{
    validate_merged_table, validate_news_table, validate_news_table_with, validate_price_table,
    validate_price_table_with, NewsSchema, PriceSchema, SchemaCheck,
};
pub use text::{
    clean_headline, clean_headlines_batch, clean_text, python_float_repr, HeadlineValue,
};

// Re-export the shared types callers need alongside the pipeline
pub use news_align_core::{AlignConfig, AlignError, AlignResult, CleanOptions, ConfigLoader};
pub use news_align_data::{MergedRow, MergedTable, NewsRow, PriceRow};
