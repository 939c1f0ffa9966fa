//! Error types for sheet edits

use tabula_core::Position;
use tabula_formula::FormulaError;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned when an edit is rejected
///
/// Every variant is produced before anything is committed: a rejected edit leaves the
/// sheet exactly as it was.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Position outside the sheet
    #[error("Invalid position: {0:?}")]
    InvalidPosition(Position),

    /// Content that cannot be stored as given
    #[error("Invalid cell content: {0}")]
    Content(String),

    /// The edit would make a cell depend on itself
    #[error("Circular dependency detected involving cell {0}")]
    CircularDependency(Position),

    /// Formula text that does not parse
    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),

    /// Malformed A1 address
    #[error(transparent)]
    Address(#[from] tabula_core::Error),
}
