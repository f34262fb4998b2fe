//! Data model for news/price alignment.
//!
//! This crate provides:
//! - Polars frame helpers shared by the pipeline
//! - Typed price, news and merged records with frame conversions
//! - CSV import/export for upstream exports and merged output
//! - Sample frames for demos and tests

pub mod csv_storage;
pub mod frame;
pub mod models;
pub mod sample;

// Re-export commonly used types
pub use csv_storage::CsvStorage;
pub use frame::{column_names, frame_error, has_column, require_column};

// Re-export models
pub use models::{
    DailyNewsAggregate, MergedRow, MergedTable, NewsRow, PriceRow, HEADLINES_COLUMN,
    HEADLINE_COUNT_COLUMN, NEWS_COLUMNS, PRICE_COLUMNS,
};
