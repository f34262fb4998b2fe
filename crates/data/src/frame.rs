//! Shared helpers for working with polars frames.

use news_align_core::{AlignError, AlignResult};
use polars::prelude::{DataFrame, PolarsError, Series};

/// Wraps a polars failure in the pipeline error type.
pub fn frame_error(err: PolarsError) -> AlignError {
    AlignError::Frame(err.to_string())
}

#[must_use]
pub fn has_column(frame: &DataFrame, name: &str) -> bool {
    frame.get_column_index(name).is_some()
}

/// Looks up a column the pipeline can't do without.
///
/// # Errors
/// Returns [`AlignError::MissingColumn`] if `name` is absent.
pub fn require_column<'a>(frame: &'a DataFrame, name: &str) -> AlignResult<&'a Series> {
    frame
        .column(name)
        .map_err(|_| AlignError::missing_column(name))
}

/// Column names in frame order.
#[must_use]
pub fn column_names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_columns()
        .iter()
        .map(|series| series.name().to_string())
        .collect()
}
