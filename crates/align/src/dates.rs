//! Date normalization to the canonical join key.
//!
//! Every price and news date is reduced to a zone-naive calendar day. Zoned
//! values keep their local wall-clock reading and are never shifted to UTC, so
//! `2024-01-02T23:30:00-05:00` lands on 2024-01-02. Polars datetimes carry a
//! UTC instant plus a zone, so the zone is applied to recover that reading.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use news_align_core::{AlignError, AlignResult};
use news_align_data::frame::frame_error;
use polars::prelude::{AnyValue, Series, TimeUnit};

/// Days from 0001-01-01 (CE day 1) to the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// What to do with a value that can't be read as a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateErrorMode {
    /// Return `None`; the caller drops the row.
    #[default]
    Coerce,
    /// Fail with [`AlignError::InvalidDate`].
    Raise,
}

const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%z",
];

const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
];

/// Normalizes one value to a calendar day.
///
/// Null and NaN values are `Ok(None)` in both modes. Integers are read as
/// compact `YYYYMMDD` dates, which is how CSV readers type them.
///
/// # Errors
/// In [`DateErrorMode::Raise`], returns [`AlignError::InvalidDate`] for a
/// value that is not a date, timestamp, compact integer date or parseable
/// date string.
pub fn normalize_date(value: &AnyValue<'_>, on_error: DateErrorMode) -> AlignResult<Option<NaiveDate>> {
    let parsed = match value {
        AnyValue::Null => return Ok(None),
        AnyValue::Float64(v) if v.is_nan() => return Ok(None),
        AnyValue::Float32(v) if v.is_nan() => return Ok(None),
        AnyValue::String(s) => return normalize_date_str(s, on_error),
        AnyValue::StringOwned(s) => return normalize_date_str(s.as_str(), on_error),
        AnyValue::Date(days) => days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt),
        AnyValue::Datetime(timestamp, unit, tz) => {
            let zone = tz.as_ref().map(|z| z.as_str());
            utc_timestamp(*timestamp, *unit)
                .and_then(|utc| wall_clock(utc, zone))
                .map(|ts| ts.date())
        }
        AnyValue::Int64(v) => parse_compact(&v.to_string()),
        AnyValue::Int32(v) => parse_compact(&v.to_string()),
        AnyValue::UInt64(v) => parse_compact(&v.to_string()),
        AnyValue::UInt32(v) => parse_compact(&v.to_string()),
        _ => None,
    };

    match (parsed, on_error) {
        (Some(date), _) => Ok(Some(date)),
        (None, DateErrorMode::Coerce) => Ok(None),
        (None, DateErrorMode::Raise) => Err(AlignError::invalid_date(value.to_string())),
    }
}

/// Normalizes every value of a column. See [`normalize_date`].
///
/// # Errors
/// Returns [`AlignError::InvalidDate`] in [`DateErrorMode::Raise`] for the
/// first value that can't be read.
pub fn normalize_dates(series: &Series, on_error: DateErrorMode) -> AlignResult<Vec<Option<NaiveDate>>> {
    if let Ok(text) = series.str() {
        return text
            .into_iter()
            .map(|value| value.map_or(Ok(None), |s| normalize_date_str(s, on_error)))
            .collect();
    }

    (0..series.len())
        .map(|i| {
            let value = series.get(i).map_err(frame_error)?;
            normalize_date(&value, on_error)
        })
        .collect()
}

/// Normalizes a date string. See [`normalize_date`].
///
/// # Errors
/// In [`DateErrorMode::Raise`], returns [`AlignError::InvalidDate`] if the
/// string matches no known format.
pub fn normalize_date_str(value: &str, on_error: DateErrorMode) -> AlignResult<Option<NaiveDate>> {
    match (parse_date_str(value), on_error) {
        (Some(date), _) => Ok(Some(date)),
        (None, DateErrorMode::Coerce) => Ok(None),
        (None, DateErrorMode::Raise) => Err(AlignError::invalid_date(value)),
    }
}

fn parse_date_str(value: &str) -> Option<NaiveDate> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_local().date());
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(s) {
        return Some(ts.naive_local().date());
    }

    OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .map(|ts| ts.naive_local().date())
        .or_else(|| {
            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|ts| ts.date())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
        .or_else(|| parse_compact(s))
}

/// Epoch offset in `unit` to a UTC timestamp.
fn utc_timestamp(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let utc = match unit {
        TimeUnit::Nanoseconds => {
            let nanos = u32::try_from(value.rem_euclid(1_000_000_000)).ok()?;
            DateTime::from_timestamp(value.div_euclid(1_000_000_000), nanos)
        }
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    };
    utc.map(|ts| ts.naive_utc())
}

/// Local reading of a UTC timestamp in a fixed offset (`+05:00`) or IANA zone.
fn wall_clock(utc: NaiveDateTime, zone: Option<&str>) -> Option<NaiveDateTime> {
    let Some(zone) = zone else {
        return Some(utc);
    };
    if let Ok(offset) = zone.parse::<FixedOffset>() {
        return Some(offset.from_utc_datetime(&utc).naive_local());
    }
    zone.parse::<Tz>()
        .ok()
        .map(|tz| tz.from_utc_datetime(&utc).naive_local())
}

/// `YYYYMMDD` with no separators.
fn parse_compact(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use polars::prelude::{DataType, NamedFrom};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn coerce(s: &str) -> Option<NaiveDate> {
        normalize_date_str(s, DateErrorMode::Coerce).unwrap()
    }

    #[test]
    fn test_calendar_formats() {
        let expected = Some(day(2024, 1, 15));
        assert_eq!(coerce("2024-01-15"), expected);
        assert_eq!(coerce("2024/01/15"), expected);
        assert_eq!(coerce("01/15/2024"), expected);
        assert_eq!(coerce("20240115"), expected);
        assert_eq!(coerce("Jan 15, 2024"), expected);
        assert_eq!(coerce("January 15, 2024"), expected);
        assert_eq!(coerce("15 Jan 2024"), expected);
        assert_eq!(coerce("  2024-01-15  "), expected);
    }

    #[test]
    fn test_datetime_strings_truncate_to_day() {
        let expected = Some(day(2024, 1, 15));
        assert_eq!(coerce("2024-01-15T10:30:00"), expected);
        assert_eq!(coerce("2024-01-15 10:30:00"), expected);
        assert_eq!(coerce("2024-01-15 23:59:59.999"), expected);
        assert_eq!(coerce("2024-01-15T10:30"), expected);
    }

    #[test]
    fn test_zoned_strings_keep_wall_clock_day() {
        assert_eq!(coerce("2024-01-02T23:30:00-05:00"), Some(day(2024, 1, 2)));
        assert_eq!(coerce("2024-01-02T01:00:00+09:00"), Some(day(2024, 1, 2)));
        assert_eq!(coerce("2024-01-15T10:30:00Z"), Some(day(2024, 1, 15)));
        assert_eq!(coerce("Tue, 2 Jan 2024 23:30:00 -0500"), Some(day(2024, 1, 2)));
    }

    #[test]
    fn test_temporal_values() {
        let mode = DateErrorMode::Coerce;
        let days = day(2024, 1, 2).num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE;
        assert_eq!(normalize_date(&AnyValue::Date(days), mode).unwrap(), Some(day(2024, 1, 2)));

        let stamps = Series::new(
            "date".into(),
            &[day(2024, 1, 2).and_hms_opt(15, 45, 0).unwrap()],
        );
        assert!(matches!(stamps.dtype(), DataType::Datetime(_, None)));
        assert_eq!(normalize_dates(&stamps, mode).unwrap(), vec![Some(day(2024, 1, 2))]);
        assert_eq!(
            normalize_date(&AnyValue::String("2024-01-02"), mode).unwrap(),
            Some(day(2024, 1, 2))
        );
    }

    #[test]
    fn test_zoned_timestamps_keep_wall_clock_day() {
        // 2024-01-03 04:30 UTC is 2024-01-02 23:30 in New York.
        let utc = day(2024, 1, 3).and_hms_opt(4, 30, 0).unwrap();
        assert_eq!(wall_clock(utc, Some("America/New_York")).map(|t| t.date()), Some(day(2024, 1, 2)));
        assert_eq!(wall_clock(utc, Some("-05:00")).map(|t| t.date()), Some(day(2024, 1, 2)));
        assert_eq!(wall_clock(utc, Some("UTC")).map(|t| t.date()), Some(day(2024, 1, 3)));
        assert_eq!(wall_clock(utc, None), Some(utc));
        assert_eq!(wall_clock(utc, Some("Not/AZone")), None);

        let millis = utc.and_utc().timestamp_millis();
        assert_eq!(utc_timestamp(millis, TimeUnit::Milliseconds), Some(utc));
        assert_eq!(utc_timestamp(millis * 1_000_000, TimeUnit::Nanoseconds), Some(utc));
    }

    #[test]
    fn test_compact_integer_dates() {
        let mode = DateErrorMode::Coerce;
        assert_eq!(normalize_date(&AnyValue::Int64(20_240_102), mode).unwrap(), Some(day(2024, 1, 2)));
        assert_eq!(normalize_date(&AnyValue::Int32(20_240_102), mode).unwrap(), Some(day(2024, 1, 2)));
        assert_eq!(normalize_date(&AnyValue::Int64(20_241_345), mode).unwrap(), None);
        assert_eq!(normalize_date(&AnyValue::Int64(1_704_153_600), mode).unwrap(), None);
    }

    #[test]
    fn test_null_is_none_in_both_modes() {
        for mode in [DateErrorMode::Coerce, DateErrorMode::Raise] {
            assert_eq!(normalize_date(&AnyValue::Null, mode).unwrap(), None);
            assert_eq!(normalize_date(&AnyValue::Float64(f64::NAN), mode).unwrap(), None);
        }
    }

    #[test]
    fn test_invalid_coerces_to_none() {
        let mode = DateErrorMode::Coerce;
        assert_eq!(normalize_date(&AnyValue::String("not a date"), mode).unwrap(), None);
        assert_eq!(normalize_date(&AnyValue::String("2024-13-45"), mode).unwrap(), None);
        assert_eq!(normalize_date(&AnyValue::String(""), mode).unwrap(), None);
        assert_eq!(normalize_date(&AnyValue::String("20241345"), mode).unwrap(), None);
        assert_eq!(normalize_date(&AnyValue::Boolean(true), mode).unwrap(), None);
        assert_eq!(normalize_date(&AnyValue::Float64(1.5), mode).unwrap(), None);
    }

    #[test]
    fn test_invalid_raises() {
        let err = normalize_date(&AnyValue::String("not a date"), DateErrorMode::Raise).unwrap_err();
        assert_eq!(err, AlignError::invalid_date("not a date"));
        assert_eq!(err.to_string(), "cannot normalize date: not a date");

        let err = normalize_date_str("2024-02-30", DateErrorMode::Raise).unwrap_err();
        assert!(matches!(err, AlignError::InvalidDate { .. }));
    }

    #[test]
    fn test_column_normalization() {
        let text = Series::new("date".into(), &[Some("2024-01-02"), None, Some("garbage")]);
        assert_eq!(
            normalize_dates(&text, DateErrorMode::Coerce).unwrap(),
            vec![Some(day(2024, 1, 2)), None, None]
        );
        assert!(normalize_dates(&text, DateErrorMode::Raise).is_err());

        let compact = Series::new("date".into(), &[20_240_102_i64, 20_240_103]);
        assert_eq!(
            normalize_dates(&compact, DateErrorMode::Coerce).unwrap(),
            vec![Some(day(2024, 1, 2)), Some(day(2024, 1, 3))]
        );

        let dates = Series::new("date".into(), &[day(2024, 1, 2)]);
        assert_eq!(dates.dtype(), &DataType::Date);
        assert_eq!(
            normalize_dates(&dates, DateErrorMode::Raise).unwrap(),
            vec![Some(day(2024, 1, 2))]
        );
    }

    #[test]
    fn test_default_mode_is_coerce() {
        assert_eq!(DateErrorMode::default(), DateErrorMode::Coerce);
    }
}
