//! News headline data models.
//!
//! A [`NewsRow`] is one raw headline as delivered by a feed. A
//! [`DailyNewsAggregate`] is the per-day grouping of cleaned headlines that
//! gets joined onto the price table.

use chrono::NaiveDate;
use polars::df;
use polars::prelude::{DataFrame, PolarsResult};
use serde::{Deserialize, Serialize};

/// Required news table columns.
pub const NEWS_COLUMNS: [&str; 2] = ["date", "headline"];

/// A raw headline from a news feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRow {
    /// Publication day
    pub date: NaiveDate,
    /// Raw headline text, untrusted and possibly absent
    pub headline: Option<String>,
    /// Publisher name (e.g., "Reuters")
    pub source: Option<String>,
    /// Ticker the feed associated with the headline
    pub ticker: Option<String>,
}

impl NewsRow {
    /// Creates a news row with a headline.
    pub fn new(date: NaiveDate, headline: impl Into<String>) -> Self {
        Self {
            date,
            headline: Some(headline.into()),
            source: None,
            ticker: None,
        }
    }

    /// Builder method to add the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Builder method to add the ticker.
    #[must_use]
    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// Builds a frame with `date, headline, source, ticker` columns.
    ///
    /// # Errors
    /// Returns an error if polars rejects a column.
    pub fn to_frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        let [date, headline] = NEWS_COLUMNS;
        df!(
            date => rows.iter().map(|r| r.date).collect::<Vec<_>>(),
            headline => rows.iter().map(|r| r.headline.as_deref()).collect::<Vec<_>>(),
            "source" => rows.iter().map(|r| r.source.as_deref()).collect::<Vec<_>>(),
            "ticker" => rows.iter().map(|r| r.ticker.as_deref()).collect::<Vec<_>>(),
        )
    }
}

/// Cleaned headlines for one calendar day.
///
/// `headlines` keeps the original row order and duplicates; `headline_count`
/// always equals its length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyNewsAggregate {
    pub date: NaiveDate,
    pub headlines: Vec<String>,
    pub headline_count: i64,
}

impl DailyNewsAggregate {
    /// Creates an aggregate with no headlines.
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            headlines: Vec::new(),
            headline_count: 0,
        }
    }

    /// Appends a cleaned headline, keeping the count in step.
    pub fn push(&mut self, headline: String) {
        self.headlines.push(headline);
        self.headline_count += 1;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
    }
}
