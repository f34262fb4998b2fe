//! Typed records for the alignment pipeline.
//!
//! Price and news rows mirror the upstream fetcher schemas; merged rows are
//! the pipeline output.

pub mod merged;
pub mod news;
pub mod price;

pub use merged::{MergedRow, MergedTable, HEADLINES_COLUMN, HEADLINE_COUNT_COLUMN};
pub use news::{DailyNewsAggregate, NewsRow, NEWS_COLUMNS};
pub use price::{PriceRow, PRICE_COLUMNS};
