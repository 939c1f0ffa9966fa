//! CSV error types

use tabula_core::Position;
use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur during CSV operations
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A field was rejected as cell input
    #[error("Cell {position}: {source}")]
    Cell {
        position: Position,
        #[source]
        source: crate::Error,
    },

    /// The input does not fit in a sheet
    #[error("CSV input exceeds the sheet at row {row}, column {column}")]
    OutOfRange { row: usize, column: usize },
}
