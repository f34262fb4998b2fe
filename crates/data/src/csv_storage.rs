//! CSV import of upstream exports and export of merged output.

use crate::models::MergedTable;
use anyhow::{Context, Result};
use csv::Writer;
use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

/// Separator used to flatten the `headlines` list into one CSV field.
pub const HEADLINE_SEPARATOR: &str = " | ";

pub struct CsvStorage;

impl CsvStorage {
    /// Reads a CSV export (price or news) into a frame.
    ///
    /// Every column is read as text and empty fields become null. Dates,
    /// headlines and prices are typed later by the pipeline, so a compact
    /// date such as `20240102` or a headline reading `Infinity` keeps its
    /// exact text.
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or is not valid CSV
    pub fn read_frame(path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
        Self::read_frame_from(file)
            .with_context(|| format!("Failed to read CSV file: {}", path.display()))
    }

    /// Reads CSV from any reader. See [`CsvStorage::read_frame`].
    ///
    /// # Errors
    /// Returns error if the input is not valid CSV or rows have uneven lengths
    pub fn read_frame_from<R: Read>(mut reader: R) -> Result<DataFrame> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        tracing::debug!(
            rows = frame.height(),
            columns = frame.width(),
            "Loaded CSV frame"
        );
        Ok(frame)
    }

    /// Writes merged rows to a CSV file.
    ///
    /// Format: date,ticker,open,high,low,close,volume,headlines,headline_count
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_merged(path: impl AsRef<Path>, table: &MergedTable) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        Self::write_merged_to(file, table)
    }

    /// Writes merged rows as CSV to any writer. See [`CsvStorage::write_merged`].
    ///
    /// # Errors
    /// Returns error if writing fails
    pub fn write_merged_to<W: Write>(writer: W, table: &MergedTable) -> Result<()> {
        let mut writer = Writer::from_writer(writer);

        writer.write_record(MergedTable::COLUMNS)?;

        for row in table {
            writer.write_record(&[
                row.date.format("%Y-%m-%d").to_string(),
                row.ticker.clone(),
                row.open.to_string(),
                row.high.to_string(),
                row.low.to_string(),
                row.close.to_string(),
                row.volume.to_string(),
                row.headlines.join(HEADLINE_SEPARATOR),
                row.headline_count.to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}
