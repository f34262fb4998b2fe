//! Daily news/price alignment.
//!
//! The price frame drives the output: every price row whose date can be
//! normalized produces exactly one [`MergedRow`], carrying the cleaned
//! headlines published on that calendar day. News on days without a price bar
//! is discarded.
//!
//! Grouping and the join run as a polars lazy query. Typed rows are read back
//! out of the joined frame at the end.

use crate::dates::{normalize_dates, DateErrorMode};
use crate::schema::{
    validate_merged_table, validate_news_table_with, validate_price_table_with, NewsSchema,
    PriceSchema,
};
use crate::text::clean_headline;
use news_align_core::{AlignConfig, AlignError, AlignResult, CleanOptions};
use news_align_data::{
    frame_error, has_column, require_column, DailyNewsAggregate, MergedRow, MergedTable, NewsRow,
    PriceRow, HEADLINES_COLUMN, HEADLINE_COUNT_COLUMN,
};
use polars::prelude::*;
use tracing::{debug, info};

/// Row index of the caller's price frame, carried through the join.
const SOURCE_ROW_COLUMN: &str = "__source_row";

/// Options for one [`align`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignOptions {
    /// Date column in both tables
    pub date_column: String,
    /// Headline column in the news table
    pub headline_column: String,
    /// Ticker column in the price table
    pub ticker_column: String,
    pub clean: CleanOptions,
    /// Reject malformed input tables before processing
    pub validate_inputs: bool,
    /// Reject output that breaks its invariants instead of returning it
    pub validate_outputs: bool,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self::from(&AlignConfig::default())
    }
}

impl From<&AlignConfig> for AlignOptions {
    fn from(config: &AlignConfig) -> Self {
        Self {
            date_column: config.align.date_column.clone(),
            headline_column: config.align.headline_column.clone(),
            ticker_column: config.align.ticker_column.clone(),
            clean: config.clean,
            validate_inputs: config.align.validate_inputs,
            validate_outputs: config.align.validate_outputs,
        }
    }
}

impl From<AlignConfig> for AlignOptions {
    fn from(config: AlignConfig) -> Self {
        Self::from(&config)
    }
}

impl AlignOptions {
    /// Builder method to set the cleaning options.
    #[must_use]
    pub fn with_clean(mut self, clean: CleanOptions) -> Self {
        self.clean = clean;
        self
    }

    /// Builder method to rename the date, headline and ticker columns.
    #[must_use]
    pub fn with_columns(
        mut self,
        date: impl Into<String>,
        headline: impl Into<String>,
        ticker: impl Into<String>,
    ) -> Self {
        self.date_column = date.into();
        self.headline_column = headline.into();
        self.ticker_column = ticker.into();
        self
    }

    #[must_use]
    pub fn with_validate_inputs(mut self, enabled: bool) -> Self {
        self.validate_inputs = enabled;
        self
    }

    #[must_use]
    pub fn with_validate_outputs(mut self, enabled: bool) -> Self {
        self.validate_outputs = enabled;
        self
    }

    /// Price column names under these options.
    #[must_use]
    pub fn price_schema(&self) -> PriceSchema {
        PriceSchema {
            date: self.date_column.clone(),
            ticker: self.ticker_column.clone(),
            ..PriceSchema::default()
        }
    }

    /// News column names under these options.
    #[must_use]
    pub fn news_schema(&self) -> NewsSchema {
        NewsSchema {
            date: self.date_column.clone(),
            headline: self.headline_column.clone(),
        }
    }
}

/// Aligns daily news headlines to daily price bars.
///
/// A missing news frame is treated as empty once input validation is off.
/// A missing or empty price frame yields [`MergedTable::empty`]. Caller
/// frames are never modified.
///
/// # Errors
/// - [`AlignError::InvalidPriceTable`] / [`AlignError::InvalidNewsTable`] when
///   input validation is on and a frame fails its shape check
/// - [`AlignError::MissingColumn`] when a needed column is absent and input
///   validation is off
/// - [`AlignError::Coercion`] when a volume or price value has no numeric value
/// - [`AlignError::OutputInvariant`] when output validation is on and the
///   merged table breaks an invariant (e.g. NaN prices)
/// - [`AlignError::Frame`] if polars fails to run the query
pub fn align(
    price: Option<&DataFrame>,
    news: Option<&DataFrame>,
    options: &AlignOptions,
) -> AlignResult<MergedTable> {
    if options.validate_inputs {
        validate_price_table_with(price, &options.price_schema())
            .into_result(AlignError::InvalidPriceTable)?;
        validate_news_table_with(news, &options.news_schema())
            .into_result(AlignError::InvalidNewsTable)?;
    }

    let Some(price) = price.filter(|frame| frame.height() > 0) else {
        debug!("Price table is empty, nothing to align");
        return Ok(MergedTable::empty());
    };

    let schema = options.price_schema();
    let date = schema.date.as_str();

    let dates = normalize_dates(require_column(price, date)?, DateErrorMode::Coerce)?;
    let mut prices = price.clone();
    prices
        .with_column(Series::new(date.into(), dates))
        .map_err(frame_error)?;
    let prices = prices
        .lazy()
        .with_row_index(SOURCE_ROW_COLUMN, None)
        .filter(col(date).is_not_null());

    let daily = match news.filter(|frame| frame.height() > 0) {
        Some(news) => Some(aggregate_news(news, options)?),
        None => None,
    };
    let news_days = daily.as_ref().map_or(0, DataFrame::height);

    let joined = match daily {
        Some(daily) => prices.join(
            daily.lazy(),
            [col(date)],
            [col(date)],
            JoinArgs {
                how: JoinType::Left,
                ..Default::default()
            },
        ),
        None => prices,
    };
    let joined = joined
        .sort([SOURCE_ROW_COLUMN], SortMultipleOptions::default())
        .collect()
        .map_err(frame_error)?;
    debug!(
        input = price.height(),
        kept = joined.height(),
        dropped = price.height() - joined.height(),
        "Normalized price dates"
    );

    let merged = MergedTable::from_rows(merged_rows(&joined, &schema)?);

    if options.validate_outputs {
        validate_merged_table(&merged).into_result(AlignError::OutputInvariant)?;
    }

    info!(
        rows = merged.len(),
        news_days,
        headlines = merged.total_headlines(),
        "Aligned news to prices"
    );
    Ok(merged)
}

/// Aligns typed records. Record dates are already canonical.
///
/// # Errors
/// - [`AlignError::OutputInvariant`] if a price row carries NaN prices
/// - [`AlignError::Frame`] if the records can't be built into frames
pub fn align_records(
    prices: &[PriceRow],
    news: &[NewsRow],
    clean: CleanOptions,
) -> AlignResult<MergedTable> {
    let price_frame = PriceRow::to_frame(prices).map_err(frame_error)?;
    let news_frame = NewsRow::to_frame(news).map_err(frame_error)?;
    let options = AlignOptions::default().with_clean(clean);

    let merged = align(Some(&price_frame), Some(&news_frame), &options)?;
    debug!(
        rows = merged.len(),
        headlines = merged.total_headlines(),
        "Aligned news records to price records"
    );
    Ok(merged)
}

/// Normalizes news dates, cleans headlines and groups survivors by day.
///
/// Returns one row per calendar day with the date column, a `headlines` list
/// and a `headline_count`. Days appear in order of first appearance, and
/// within a day headlines keep frame order and duplicates. Rows with an
/// unparseable date or a headline that cleans to nothing are dropped.
///
/// # Errors
/// - [`AlignError::MissingColumn`] if the date or headline column is absent
/// - [`AlignError::Frame`] if polars fails to run the grouping
pub fn aggregate_news(news: &DataFrame, options: &AlignOptions) -> AlignResult<DataFrame> {
    let date = options.date_column.as_str();
    let dates = normalize_dates(require_column(news, date)?, DateErrorMode::Coerce)?;
    let headlines = clean_column(
        require_column(news, &options.headline_column)?,
        options.clean,
    )?;

    let input = news.height();
    let bad_dates = dates.iter().filter(|d| d.is_none()).count();
    let kept = dates
        .iter()
        .zip(&headlines)
        .filter(|(d, h)| d.is_some() && !h.is_empty())
        .count();

    let daily = df!(
        date => dates,
        HEADLINES_COLUMN => headlines,
    )
    .map_err(frame_error)?
    .lazy()
    .filter(
        col(date)
            .is_not_null()
            .and(col(HEADLINES_COLUMN).neq(lit(""))),
    )
    .group_by_stable([col(date)])
    .agg([
        col(HEADLINES_COLUMN),
        col(HEADLINES_COLUMN)
            .len()
            .cast(DataType::Int64)
            .alias(HEADLINE_COUNT_COLUMN),
    ])
    .collect()
    .map_err(frame_error)?;

    debug!(
        input,
        kept,
        bad_dates,
        empty_headlines = input - kept - bad_dates,
        days = daily.height(),
        "Cleaned and grouped news"
    );
    Ok(daily)
}

fn clean_column(series: &Series, options: CleanOptions) -> AlignResult<Vec<String>> {
    if let Ok(values) = series.str() {
        return Ok(values
            .into_iter()
            .map(|value| clean_headline(value, options))
            .collect());
    }
    (0..series.len())
        .map(|i| {
            series
                .get(i)
                .map(|value| clean_headline(&value, options))
                .map_err(frame_error)
        })
        .collect()
}

/// Reads typed rows out of the joined frame.
fn merged_rows(joined: &DataFrame, schema: &PriceSchema) -> AlignResult<Vec<MergedRow>> {
    let source_rows = source_rows(joined)?;
    let dates = normalize_dates(require_column(joined, &schema.date)?, DateErrorMode::Coerce)?;
    let mut tickers = text_values(require_column(joined, &schema.ticker)?)?;
    let open = coerce_prices(require_column(joined, &schema.open)?, &source_rows)?;
    let high = coerce_prices(require_column(joined, &schema.high)?, &source_rows)?;
    let low = coerce_prices(require_column(joined, &schema.low)?, &source_rows)?;
    let close = coerce_prices(require_column(joined, &schema.close)?, &source_rows)?;
    let volume = coerce_volumes(require_column(joined, &schema.volume)?, &source_rows)?;
    let mut news = daily_headlines(joined)?;

    let mut rows = Vec::with_capacity(joined.height());
    for (i, date) in dates.into_iter().enumerate() {
        let Some(date) = date else {
            continue;
        };
        let price = PriceRow::new(
            date,
            std::mem::take(&mut tickers[i]),
            open[i],
            high[i],
            low[i],
            close[i],
            volume[i],
        );
        let (headlines, headline_count) = std::mem::take(&mut news[i]);
        rows.push(MergedRow::from_parts(
            price,
            DailyNewsAggregate {
                date,
                headlines,
                headline_count,
            },
        ));
    }
    Ok(rows)
}

fn source_rows(frame: &DataFrame) -> AlignResult<Vec<usize>> {
    let rows = require_column(frame, SOURCE_ROW_COLUMN)?
        .cast(&DataType::UInt64)
        .map_err(frame_error)?;
    Ok(rows
        .u64()
        .map_err(frame_error)?
        .into_iter()
        .map(|row| row.unwrap_or_default() as usize)
        .collect())
}

fn text_values(series: &Series) -> AlignResult<Vec<String>> {
    let text = series.cast(&DataType::String).map_err(frame_error)?;
    Ok(text
        .str()
        .map_err(frame_error)?
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect())
}

/// Headline lists and counts per row. Rows without news get an empty list.
fn daily_headlines(frame: &DataFrame) -> AlignResult<Vec<(Vec<String>, i64)>> {
    if !has_column(frame, HEADLINES_COLUMN) {
        return Ok(vec![(Vec::new(), 0); frame.height()]);
    }
    let lists = require_column(frame, HEADLINES_COLUMN)?
        .list()
        .map_err(frame_error)?;
    let counts = require_column(frame, HEADLINE_COUNT_COLUMN)?
        .i64()
        .map_err(frame_error)?;

    (0..frame.height())
        .map(|i| {
            let headlines = match lists.get_as_series(i) {
                Some(list) => list
                    .str()
                    .map_err(frame_error)?
                    .into_iter()
                    .flatten()
                    .map(str::to_string)
                    .collect(),
                None => Vec::new(),
            };
            Ok((headlines, counts.get(i).unwrap_or(0)))
        })
        .collect()
}

/// Numeric columns widen to f64, numeric text parses, null becomes NaN.
fn coerce_prices(series: &Series, source_rows: &[usize]) -> AlignResult<Vec<f64>> {
    match series.dtype() {
        DataType::String => series
            .str()
            .map_err(frame_error)?
            .into_iter()
            .zip(source_rows)
            .map(|(value, &row)| match value {
                None => Ok(f64::NAN),
                Some(text) => text
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| coercion_error(series, row, text)),
            })
            .collect(),
        DataType::Null => Ok(vec![f64::NAN; series.len()]),
        dtype if dtype.is_float() || dtype.is_integer() => {
            let values = series.cast(&DataType::Float64).map_err(frame_error)?;
            Ok(values
                .f64()
                .map_err(frame_error)?
                .into_iter()
                .map(|value| value.unwrap_or(f64::NAN))
                .collect())
        }
        _ => Err(unsupported_column(series, source_rows)),
    }
}

/// Floats truncate toward zero, numeric text parses; null is an error.
fn coerce_volumes(series: &Series, source_rows: &[usize]) -> AlignResult<Vec<i64>> {
    match series.dtype() {
        DataType::String => series
            .str()
            .map_err(frame_error)?
            .into_iter()
            .zip(source_rows)
            .map(|(value, &row)| {
                let text = value.ok_or_else(|| coercion_error(series, row, "null"))?.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| {
                        text.parse::<f64>()
                            .ok()
                            .filter(|v| v.is_finite())
                            .map(|v| v.trunc() as i64)
                    })
                    .ok_or_else(|| coercion_error(series, row, text))
            })
            .collect(),
        dtype if dtype.is_integer() => {
            let values = series.cast(&DataType::Int64).map_err(frame_error)?;
            values
                .i64()
                .map_err(frame_error)?
                .into_iter()
                .zip(source_rows)
                .map(|(value, &row)| value.ok_or_else(|| coercion_error(series, row, "null")))
                .collect()
        }
        dtype if dtype.is_float() => {
            let values = series.cast(&DataType::Float64).map_err(frame_error)?;
            values
                .f64()
                .map_err(frame_error)?
                .into_iter()
                .zip(source_rows)
                .map(|(value, &row)| match value {
                    None => Err(coercion_error(series, row, "null")),
                    Some(v) if v.is_finite() => Ok(v.trunc() as i64),
                    Some(v) => Err(coercion_error(series, row, v)),
                })
                .collect()
        }
        DataType::Null => Err(coercion_error(
            series,
            source_rows.first().copied().unwrap_or_default(),
            "null",
        )),
        _ => Err(unsupported_column(series, source_rows)),
    }
}

fn coercion_error(series: &Series, row: usize, value: impl ToString) -> AlignError {
    AlignError::Coercion {
        column: series.name().to_string(),
        row,
        value: value.to_string(),
    }
}

/// Reports the first value of a column whose dtype has no numeric reading.
fn unsupported_column(series: &Series, source_rows: &[usize]) -> AlignError {
    let value = series
        .get(0)
        .map_or_else(|_| series.dtype().to_string(), |v| v.to_string());
    coercion_error(series, source_rows.first().copied().unwrap_or_default(), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn prices(days: &[u32]) -> DataFrame {
        let rows: Vec<PriceRow> = days
            .iter()
            .map(|&d| PriceRow::new(day(d), "AAPL", 185.0, 186.5, 184.5, 186.0, 1_000_000))
            .collect();
        PriceRow::to_frame(&rows).unwrap()
    }

    fn news(items: &[(&str, Option<&str>)]) -> DataFrame {
        df!(
            "date" => items.iter().map(|(d, _)| *d).collect::<Vec<_>>(),
            "headline" => items.iter().map(|(_, h)| *h).collect::<Vec<_>>(),
        )
        .unwrap()
    }

    fn list_at(frame: &DataFrame, row: usize) -> Vec<String> {
        frame
            .column(HEADLINES_COLUMN)
            .unwrap()
            .list()
            .unwrap()
            .get_as_series(row)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_options_default_matches_config_default() {
        let options = AlignOptions::default();
        assert_eq!(options.date_column, "date");
        assert_eq!(options.headline_column, "headline");
        assert_eq!(options.ticker_column, "ticker");
        assert_eq!(options.clean, CleanOptions::default());
        assert!(options.validate_inputs);
        assert!(options.validate_outputs);
    }

    #[test]
    fn test_options_from_config() {
        let mut config = AlignConfig::default();
        config.clean.lowercase = true;
        config.align.date_column = "published".to_string();
        config.align.validate_outputs = false;

        let options = AlignOptions::from(config);
        assert!(options.clean.lowercase);
        assert_eq!(options.date_column, "published");
        assert_eq!(options.price_schema().date, "published");
        assert_eq!(options.news_schema().headline, "headline");
        assert!(!options.validate_outputs);
    }

    #[test]
    fn test_left_join_attaches_headlines() {
        let price = prices(&[2, 3, 4]);
        let news = news(&[
            ("2024-01-02", Some("Apple announces new iPhone")),
            ("2024-01-02", Some("Tech stocks rally")),
            ("2024-01-04", Some("Market volatility increases")),
        ]);

        let merged = align(Some(&price), Some(&news), &AlignOptions::default()).unwrap();
        assert_eq!(merged.len(), 3);

        let first = merged.row_for_date(day(2)).unwrap();
        assert_eq!(first.headlines, vec!["Apple announces new iPhone", "Tech stocks rally"]);
        assert_eq!(first.headline_count, 2);

        let quiet = merged.row_for_date(day(3)).unwrap();
        assert!(quiet.headlines.is_empty());
        assert_eq!(quiet.headline_count, 0);
        assert_eq!(merged.total_headlines(), 3);
    }

    #[test]
    fn test_join_keeps_price_order() {
        let price = prices(&[4, 2, 3, 2]);
        let news = news(&[("2024-01-02", Some("Early")), ("2024-01-04", Some("Late"))]);

        let merged = align(Some(&price), Some(&news), &AlignOptions::default()).unwrap();
        let dates: Vec<NaiveDate> = merged.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(4), day(2), day(3), day(2)]);
        assert_eq!(merged.rows()[0].headlines, vec!["Late"]);
        assert_eq!(merged.rows()[3].headlines, vec!["Early"]);
    }

    #[test]
    fn test_news_only_dates_are_dropped() {
        let price = prices(&[2]);
        let news = news(&[("2024-01-05", Some("Weekend news"))]);
        let merged = align(Some(&price), Some(&news), &AlignOptions::default()).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.total_headlines(), 0);
        assert!(merged.row_for_date(day(5)).is_none());
    }

    #[test]
    fn test_empty_price_returns_empty_schema() {
        let news = news(&[("2024-01-02", Some("Headline"))]);
        let merged =
            align(Some(&DataFrame::empty()), Some(&news), &AlignOptions::default()).unwrap();
        assert!(merged.is_empty());
        assert_eq!(merged.column_names(), MergedTable::COLUMNS.to_vec());
    }

    #[test]
    fn test_missing_tables() {
        let err = align(None, None, &AlignOptions::default()).unwrap_err();
        assert!(matches!(err, AlignError::InvalidPriceTable(_)));

        let price = prices(&[2]);
        let err = align(Some(&price), None, &AlignOptions::default()).unwrap_err();
        assert!(matches!(err, AlignError::InvalidNewsTable(_)));

        let lenient = AlignOptions::default().with_validate_inputs(false);
        let merged = align(Some(&price), None, &lenient).unwrap();
        assert_eq!(merged.len(), 1);
        assert!(align(None, None, &lenient).unwrap().is_empty());
    }

    #[test]
    fn test_bad_dates_and_empty_headlines_are_dropped() {
        let price = prices(&[2]);
        let news = news(&[
            ("not-a-date", Some("Valid headline")),
            ("2024-01-02", None),
            ("2024-01-02", Some("$AAPL 📈")),
            ("2024-01-02", Some("Kept headline")),
        ]);
        let daily = aggregate_news(&news, &AlignOptions::default()).unwrap();
        assert_eq!(daily.height(), 1);
        assert_eq!(list_at(&daily, 0), vec!["Kept headline"]);
        assert_eq!(
            daily.column(HEADLINE_COUNT_COLUMN).unwrap().i64().unwrap().get(0),
            Some(1)
        );

        let merged = align(Some(&price), Some(&news), &AlignOptions::default()).unwrap();
        assert_eq!(merged.rows()[0].headline_count, 1);
    }

    #[test]
    fn test_aggregate_keeps_first_appearance_order() {
        let news = news(&[
            ("2024-01-03", Some("First on the 3rd")),
            ("2024-01-02", Some("Only on the 2nd")),
            ("2024-01-03", Some("First on the 3rd")),
        ]);
        let daily = aggregate_news(&news, &AlignOptions::default()).unwrap();

        let days = normalize_dates(daily.column("date").unwrap(), DateErrorMode::Raise).unwrap();
        assert_eq!(days, vec![Some(day(3)), Some(day(2))]);
        assert_eq!(list_at(&daily, 0), vec!["First on the 3rd", "First on the 3rd"]);
        assert_eq!(list_at(&daily, 1), vec!["Only on the 2nd"]);
    }

    #[test]
    fn test_non_text_headline_column() {
        let news = df!(
            "date" => ["2024-01-02", "2024-01-02"],
            "headline" => [1.0, 2.5],
        )
        .unwrap();
        let daily = aggregate_news(&news, &AlignOptions::default()).unwrap();
        assert_eq!(list_at(&daily, 0), vec!["1.0", "2.5"]);
    }

    #[test]
    fn test_unparseable_price_dates_are_dropped() {
        let mut price = prices(&[2, 3]);
        price
            .with_column(Series::new("date".into(), &["2024-01-02", "garbage"]))
            .unwrap();
        let merged = align(Some(&price), None, &AlignOptions::default().with_validate_inputs(false))
            .unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.rows()[0].date, day(2));
    }

    #[test]
    fn test_coercion_rules() {
        let price = df!(
            "date" => ["2024-01-02", "2024-01-03"],
            "ticker" => ["AAPL", "AAPL"],
            "open" => ["185", "186.25"],
            "high" => [186.5, 187.0],
            "low" => [184_i64, 185],
            "close" => [186.0, 184.5],
            "volume" => [1_000_000.9, 1_200_000.0],
        )
        .unwrap();

        let merged =
            align(Some(&price), Some(&DataFrame::empty()), &AlignOptions::default()).unwrap();
        assert_eq!(merged.rows()[0].open, 185.0);
        assert_eq!(merged.rows()[1].open, 186.25);
        assert_eq!(merged.rows()[0].low, 184.0);
        assert_eq!(merged.rows()[0].volume, 1_000_000);
        assert_eq!(merged.rows()[1].volume, 1_200_000);

        let mut text_volume = price.clone();
        text_volume
            .with_column(Series::new("volume".into(), &["1000000", "1.2e6"]))
            .unwrap();
        let merged =
            align(Some(&text_volume), Some(&DataFrame::empty()), &AlignOptions::default())
                .unwrap();
        assert_eq!(merged.rows()[1].volume, 1_200_000);
    }

    #[test]
    fn test_unparseable_price_text_is_a_coercion_error() {
        let mut price = prices(&[2, 3]);
        price
            .with_column(Series::new("open".into(), &["185.0", "n/a"]))
            .unwrap();
        let err =
            align(Some(&price), Some(&DataFrame::empty()), &AlignOptions::default()).unwrap_err();
        assert_eq!(
            err,
            AlignError::Coercion {
                column: "open".to_string(),
                row: 1,
                value: "n/a".to_string(),
            }
        );
    }

    #[test]
    fn test_null_volume_is_a_coercion_error() {
        let mut price = prices(&[2, 3]);
        price
            .with_column(Series::new("volume".into(), &[Some(1_i64), None]))
            .unwrap();
        let err =
            align(Some(&price), Some(&DataFrame::empty()), &AlignOptions::default()).unwrap_err();
        assert_eq!(
            err,
            AlignError::Coercion {
                column: "volume".to_string(),
                row: 1,
                value: "null".to_string(),
            }
        );
    }

    #[test]
    fn test_coercion_error_reports_caller_row() {
        let mut price = prices(&[2, 3, 4]);
        price
            .with_column(Series::new("date".into(), &["garbage", "2024-01-03", "2024-01-04"]))
            .unwrap();
        price
            .with_column(Series::new("volume".into(), &[Some(1_i64), Some(2), None]))
            .unwrap();
        let lenient = AlignOptions::default().with_validate_inputs(false);
        let err = align(Some(&price), None, &lenient).unwrap_err();
        assert!(matches!(err, AlignError::Coercion { row: 2, .. }));
    }

    #[test]
    fn test_nan_price_fails_output_validation() {
        let mut price = prices(&[2]);
        price
            .with_column(Series::new("close".into(), &[f64::NAN]))
            .unwrap();

        let err =
            align(Some(&price), Some(&DataFrame::empty()), &AlignOptions::default()).unwrap_err();
        assert!(matches!(err, AlignError::OutputInvariant(_)));

        let lenient = AlignOptions::default().with_validate_outputs(false);
        let merged = align(Some(&price), Some(&DataFrame::empty()), &lenient).unwrap();
        assert!(merged.rows()[0].close.is_nan());
    }

    #[test]
    fn test_caller_frames_are_unchanged() {
        let price = prices(&[2]);
        let news = news(&[("2024-01-02", Some("<b>Bold</b> move"))]);
        let before = (price.clone(), news.clone());

        align(Some(&price), Some(&news), &AlignOptions::default()).unwrap();
        assert!(price.equals_missing(&before.0));
        assert!(news.equals_missing(&before.1));
    }

    #[test]
    fn test_align_records() {
        let prices = vec![
            PriceRow::new(day(2), "AAPL", 185.0, 186.5, 184.5, 186.0, 1_000_000),
            PriceRow::new(day(3), "AAPL", 186.0, 187.0, 185.0, 184.5, 1_200_000),
        ];
        let news = vec![
            NewsRow::new(day(2), "<b>Apple</b> beats &amp; raises"),
            NewsRow {
                headline: None,
                ..NewsRow::new(day(2), "")
            },
            NewsRow::new(day(3), "📈🚀"),
        ];

        let merged = align_records(&prices, &news, CleanOptions::default()).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.rows()[0].headlines, vec!["Apple beats & raises"]);
        assert_eq!(merged.rows()[1].headline_count, 0);
    }
}
