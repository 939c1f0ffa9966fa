//! Error types for tabula-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tabula-core
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Text that is not shaped like an A1 cell reference
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),
}
