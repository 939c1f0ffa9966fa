//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while turning formula text into an expression
///
/// Failures during execution are not errors of this kind: they are
/// [`CellError`](tabula_core::CellError) values returned by [`execute`](crate::execute).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),
}
