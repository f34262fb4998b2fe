//! Shape checks for the price, news and merged tables.
//!
//! Input checks run before any row is touched and reject a whole table; they
//! never inspect individual headlines or date formats.

use news_align_core::{AlignError, AlignResult, AlignSettings};
use news_align_data::{has_column, MergedTable, NEWS_COLUMNS, PRICE_COLUMNS};
use polars::prelude::{DataFrame, Series};
use serde::Serialize;

/// Outcome of a schema check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaCheck {
    pub is_valid: bool,
    /// Why the check failed; `None` when valid
    pub diagnostic: Option<String>,
}

impl SchemaCheck {
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            is_valid: true,
            diagnostic: None,
        }
    }

    pub fn invalid(diagnostic: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Converts a failed check into an error built by `make_error`.
    ///
    /// # Errors
    /// Returns the error from `make_error` if the check failed.
    pub fn into_result(self, make_error: impl FnOnce(String) -> AlignError) -> AlignResult<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(make_error(self.diagnostic.unwrap_or_default()))
        }
    }
}

/// Column names of a price table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSchema {
    pub date: String,
    pub ticker: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl Default for PriceSchema {
    fn default() -> Self {
        let [date, ticker, open, high, low, close, volume] = PRICE_COLUMNS.map(String::from);
        Self {
            date,
            ticker,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl PriceSchema {
    /// Required columns in upstream order.
    #[must_use]
    pub fn required(&self) -> [&str; 7] {
        [
            self.date.as_str(),
            self.ticker.as_str(),
            self.open.as_str(),
            self.high.as_str(),
            self.low.as_str(),
            self.close.as_str(),
            self.volume.as_str(),
        ]
    }
}

impl From<&AlignSettings> for PriceSchema {
    fn from(settings: &AlignSettings) -> Self {
        Self {
            date: settings.date_column.clone(),
            ticker: settings.ticker_column.clone(),
            ..Self::default()
        }
    }
}

/// Column names of a news table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsSchema {
    pub date: String,
    pub headline: String,
}

impl Default for NewsSchema {
    fn default() -> Self {
        let [date, headline] = NEWS_COLUMNS.map(String::from);
        Self { date, headline }
    }
}

impl NewsSchema {
    #[must_use]
    pub fn required(&self) -> [&str; 2] {
        [self.date.as_str(), self.headline.as_str()]
    }
}

impl From<&AlignSettings> for NewsSchema {
    fn from(settings: &AlignSettings) -> Self {
        Self {
            date: settings.date_column.clone(),
            headline: settings.headline_column.clone(),
        }
    }
}

/// Checks a price table against the default column names.
#[must_use]
pub fn validate_price_table(table: Option<&DataFrame>) -> SchemaCheck {
    validate_price_table_with(table, &PriceSchema::default())
}

/// Checks a price table: present, all OHLCV columns, no nulls in date or ticker.
///
/// An empty table is valid.
#[must_use]
pub fn validate_price_table_with(table: Option<&DataFrame>, schema: &PriceSchema) -> SchemaCheck {
    let Some(table) = table else {
        return SchemaCheck::invalid("price table is missing");
    };
    if table.height() == 0 {
        return SchemaCheck::valid();
    }

    if let Some(check) = missing_columns(table, &schema.required()) {
        return check;
    }

    for name in [&schema.date, &schema.ticker] {
        if table.column(name).is_ok_and(has_missing) {
            return SchemaCheck::invalid(format!("Null values found in column '{name}'"));
        }
    }

    SchemaCheck::valid()
}

/// Checks a news table against the default column names.
#[must_use]
pub fn validate_news_table(table: Option<&DataFrame>) -> SchemaCheck {
    validate_news_table_with(table, &NewsSchema::default())
}

/// Checks a news table: present, with date and headline columns.
///
/// An empty table is valid. Null headlines are allowed; they are dropped later.
#[must_use]
pub fn validate_news_table_with(table: Option<&DataFrame>, schema: &NewsSchema) -> SchemaCheck {
    let Some(table) = table else {
        return SchemaCheck::invalid("news table is missing");
    };
    if table.height() == 0 {
        return SchemaCheck::valid();
    }

    missing_columns(table, &schema.required()).unwrap_or_else(SchemaCheck::valid)
}

/// Checks the output invariants of a merged table.
#[must_use]
pub fn validate_merged_table(table: &MergedTable) -> SchemaCheck {
    for (i, row) in table.iter().enumerate() {
        let prices = [
            ("open", row.open),
            ("high", row.high),
            ("low", row.low),
            ("close", row.close),
        ];
        if let Some((name, _)) = prices.iter().find(|(_, v)| v.is_nan()) {
            return SchemaCheck::invalid(format!("NaN in column '{name}' at row {i}"));
        }
        if row.headline_count < 0 {
            return SchemaCheck::invalid(format!(
                "negative headline_count {} at row {i}",
                row.headline_count
            ));
        }
        if usize::try_from(row.headline_count).ok() != Some(row.headlines.len()) {
            return SchemaCheck::invalid(format!(
                "headline_count {} does not match {} headlines at row {i}",
                row.headline_count,
                row.headlines.len()
            ));
        }
    }
    SchemaCheck::valid()
}

/// Null, or NaN in a float column.
fn has_missing(series: &Series) -> bool {
    series.null_count() > 0
        || series
            .f64()
            .is_ok_and(|values| values.into_iter().flatten().any(f64::is_nan))
}

fn missing_columns(table: &DataFrame, required: &[&str]) -> Option<SchemaCheck> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !has_column(table, name))
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(SchemaCheck::invalid(format!(
            "Missing required columns: {missing:?}"
        )))
    }
}
