//! Convenient re-exports for common usage
//!
//! ```rust
//! use tabula::prelude::*;
//! ```

pub use crate::{
    Cell, CellContent, CellError, Error, Position, PrintOptions, Result, Sheet, SheetStats,
    Size, Value,
};

#[cfg(feature = "csv")]
pub use crate::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
