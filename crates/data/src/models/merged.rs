//! Merged price/news output model.

use crate::models::news::DailyNewsAggregate;
use crate::models::price::PriceRow;
use chrono::NaiveDate;
use polars::df;
use polars::prelude::{DataFrame, NamedFrom, PolarsResult, Series};
use serde::{Deserialize, Serialize};

/// Output column holding each day's cleaned headlines.
pub const HEADLINES_COLUMN: &str = "headlines";

/// Output column holding the number of headlines per day.
pub const HEADLINE_COUNT_COLUMN: &str = "headline_count";

/// One trading day with the cleaned headlines published on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    pub date: NaiveDate,
    pub ticker: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    /// Cleaned headlines in original feed order; empty on days without news
    pub headlines: Vec<String>,
    /// Always equal to `headlines.len()`
    pub headline_count: i64,
}

impl MergedRow {
    /// Attaches a day's aggregate to a price bar.
    #[must_use]
    pub fn from_parts(price: PriceRow, news: DailyNewsAggregate) -> Self {
        Self {
            date: price.date,
            ticker: price.ticker,
            open: price.open,
            high: price.high,
            low: price.low,
            close: price.close,
            volume: price.volume,
            headlines: news.headlines,
            headline_count: news.headline_count,
        }
    }

    /// Returns true if the day had at least one headline.
    #[must_use]
    pub fn has_news(&self) -> bool {
        !self.headlines.is_empty()
    }
}

/// Output of the alignment pipeline: one row per surviving price bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedTable {
    rows: Vec<MergedRow>,
}

impl MergedTable {
    /// Output column order.
    pub const COLUMNS: [&'static str; 9] = [
        "date",
        "ticker",
        "open",
        "high",
        "low",
        "close",
        "volume",
        HEADLINES_COLUMN,
        HEADLINE_COUNT_COLUMN,
    ];

    /// A table with the output schema and no rows.
    #[must_use]
    pub const fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    #[must_use]
    pub const fn from_rows(rows: Vec<MergedRow>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&'static str> {
        Self::COLUMNS.to_vec()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[MergedRow] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<MergedRow> {
        self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MergedRow> {
        self.rows.iter()
    }

    /// Rows for a given trading day (several when multiple tickers share a date).
    pub fn rows_for_date(&self, date: NaiveDate) -> impl Iterator<Item = &MergedRow> {
        self.rows.iter().filter(move |r| r.date == date)
    }

    /// First row for a given trading day.
    #[must_use]
    pub fn row_for_date(&self, date: NaiveDate) -> Option<&MergedRow> {
        self.rows_for_date(date).next()
    }

    /// Total headlines attached across all rows.
    #[must_use]
    pub fn total_headlines(&self) -> i64 {
        self.rows.iter().map(|r| r.headline_count).sum()
    }

    /// Converts to a frame in output column order; `headlines` is a list column.
    ///
    /// # Errors
    /// Returns an error if polars rejects a column.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let rows = &self.rows;
        let headlines: Vec<Series> = rows
            .iter()
            .map(|r| Series::new("".into(), r.headlines.as_slice()))
            .collect();

        df!(
            "date" => rows.iter().map(|r| r.date).collect::<Vec<_>>(),
            "ticker" => rows.iter().map(|r| r.ticker.as_str()).collect::<Vec<_>>(),
            "open" => rows.iter().map(|r| r.open).collect::<Vec<_>>(),
            "high" => rows.iter().map(|r| r.high).collect::<Vec<_>>(),
            "low" => rows.iter().map(|r| r.low).collect::<Vec<_>>(),
            "close" => rows.iter().map(|r| r.close).collect::<Vec<_>>(),
            "volume" => rows.iter().map(|r| r.volume).collect::<Vec<_>>(),
            HEADLINES_COLUMN => headlines,
            HEADLINE_COUNT_COLUMN => rows.iter().map(|r| r.headline_count).collect::<Vec<_>>(),
        )
    }

    /// Serializes rows as newline-delimited JSON, one object per trading day.
    ///
    /// # Errors
    /// Returns an error if a row cannot be serialized.
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&serde_json::to_string(row)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl<'a> IntoIterator for &'a MergedTable {
    type Item = &'a MergedRow;
    type IntoIter = std::slice::Iter<'a, MergedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
