//! Daily OHLCV bar data model.

use chrono::NaiveDate;
use polars::df;
use polars::prelude::{DataFrame, PolarsResult};
use serde::{Deserialize, Serialize};

/// Required price table columns, in upstream order.
pub const PRICE_COLUMNS: [&str; 7] = ["date", "ticker", "open", "high", "low", "close", "volume"];

/// One daily bar for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    /// Trading day
    pub date: NaiveDate,
    /// Instrument symbol (e.g., "AAPL")
    pub ticker: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Shares traded
    pub volume: i64,
}

impl PriceRow {
    /// Creates a new price row.
    pub fn new(
        date: NaiveDate,
        ticker: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: i64,
    ) -> Self {
        Self {
            date,
            ticker: ticker.into(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Builds a frame with the standard price columns from typed rows.
    ///
    /// # Errors
    /// Returns an error if polars rejects a column.
    pub fn to_frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        let [date, ticker, open, high, low, close, volume] = PRICE_COLUMNS;
        df!(
            date => rows.iter().map(|r| r.date).collect::<Vec<_>>(),
            ticker => rows.iter().map(|r| r.ticker.as_str()).collect::<Vec<_>>(),
            open => rows.iter().map(|r| r.open).collect::<Vec<_>>(),
            high => rows.iter().map(|r| r.high).collect::<Vec<_>>(),
            low => rows.iter().map(|r| r.low).collect::<Vec<_>>(),
            close => rows.iter().map(|r| r.close).collect::<Vec<_>>(),
            volume => rows.iter().map(|r| r.volume).collect::<Vec<_>>(),
        )
    }
}
