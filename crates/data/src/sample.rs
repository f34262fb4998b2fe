//! Small fixed price/news frames for demos and smoke tests.

use chrono::NaiveDate;
use polars::df;
use polars::prelude::{DataFrame, PolarsResult};

/// Three AAPL trading days and three headlines.
///
/// Two headlines fall on 2024-01-02, one on 2024-01-04, none on 2024-01-03.
///
/// # Errors
/// Returns an error if polars rejects a column.
pub fn sample_tables() -> PolarsResult<(DataFrame, DataFrame)> {
    let days: Vec<NaiveDate> = [2, 3, 4]
        .into_iter()
        .filter_map(|d| NaiveDate::from_ymd_opt(2024, 1, d))
        .collect();

    let price = df!(
        "date" => days.clone(),
        "ticker" => ["AAPL", "AAPL", "AAPL"],
        "open" => [185.0, 186.0, 184.0],
        "high" => [186.5, 187.0, 185.5],
        "low" => [184.5, 185.0, 183.0],
        "close" => [186.0, 184.5, 185.0],
        "volume" => [1_000_000_i64, 1_200_000, 900_000],
    )?;

    let news = df!(
        "date" => [days[0], days[0], days[2]],
        "headline" => [
            "Apple announces new product line",
            "Tech stocks rally on strong earnings",
            "Market volatility increases amid uncertainty",
        ],
    )?;

    Ok((price, news))
}
