//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tabula_core::Position;
use tracing::debug;

use super::error::{CsvError, CsvResult};
use super::options::CsvReadOptions;
use crate::Sheet;

/// CSV reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a sheet
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Sheet> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into a sheet
    ///
    /// Fields are applied in row-major order. Empty fields leave their cell unset.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Sheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut sheet = Sheet::new();
        let records = csv_reader
            .records()
            .skip(usize::from(options.has_header));

        for (row_idx, result) in records.enumerate() {
            let record = result?;

            for (col_idx, field) in record.iter().enumerate() {
                if field.is_empty() {
                    continue;
                }

                let position = match (i32::try_from(row_idx), i32::try_from(col_idx)) {
                    (Ok(row), Ok(col)) => Position::new(row, col),
                    _ => {
                        return Err(CsvError::OutOfRange {
                            row: row_idx,
                            column: col_idx,
                        })
                    }
                };
                if !position.is_valid() {
                    return Err(CsvError::OutOfRange {
                        row: row_idx,
                        column: col_idx,
                    });
                }

                sheet
                    .set_cell(position, field)
                    .map_err(|source| CsvError::Cell { position, source })?;
            }
        }

        debug!(cells = sheet.cell_count(), "csv loaded");
        Ok(sheet)
    }
}
