//! Error taxonomy for the alignment pipeline.
//!
//! Only fatal conditions are modelled here. Row-level defects (an
//! unparseable date, a headline that cleans to nothing) are dropped
//! silently and never reach the caller as errors.

use thiserror::Error;

/// Fatal errors raised by the alignment pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignError {
    /// The price table failed its shape contract.
    #[error("invalid price table: {0}")]
    InvalidPriceTable(String),

    /// The news table failed its shape contract.
    #[error("invalid news table: {0}")]
    InvalidNewsTable(String),

    /// A column needed for processing is absent.
    #[error("missing column: {column}")]
    MissingColumn {
        /// Name of the absent column.
        column: String,
    },

    /// A date could not be parsed and the caller asked for a hard failure.
    #[error("cannot normalize date: {value}")]
    InvalidDate {
        /// Rendering of the offending value.
        value: String,
    },

    /// A cell could not be coerced to the output type of its column.
    #[error("cannot coerce {value} in column '{column}' at row {row}")]
    Coercion {
        /// Output column being produced.
        column: String,
        /// Zero-based row index in the price table.
        row: usize,
        /// Rendering of the offending value.
        value: String,
    },

    /// The merged output broke one of its invariants.
    #[error("output invariant violated: {0}")]
    OutputInvariant(String),

    /// A dataframe operation failed.
    #[error("dataframe operation failed: {0}")]
    Frame(String),
}

impl AlignError {
    /// Creates a missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }

    /// Returns true for errors raised before any row was processed.
    #[must_use]
    pub const fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPriceTable(_)
                | Self::InvalidNewsTable(_)
                | Self::MissingColumn { .. }
        )
    }
}
