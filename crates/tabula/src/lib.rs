//! # tabula
//!
//! The computation core of a spreadsheet: cells holding empty content, text or formulas, the
//! dependency graph formed by formula references, cycle rejection before an edit is
//! committed, memoized formula values and their invalidation when an upstream cell changes.
//!
//! ## Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set("A1", "1").unwrap();
//! sheet.set("B1", "=A1+1").unwrap();
//! sheet.set("C1", "=B1+1").unwrap();
//!
//! let c1 = Position::parse("C1").unwrap();
//! assert_eq!(sheet.value(c1), Value::Number(3.0));
//!
//! sheet.set("A1", "5").unwrap();
//! assert_eq!(sheet.value(c1), Value::Number(7.0));
//!
//! // A formula may not reach back to its own cell
//! let err = sheet.set("A1", "=C1").unwrap_err();
//! assert!(matches!(err, Error::CircularDependency(_)));
//! ```

pub mod cell;
pub mod content;
pub mod error;
mod graph;
pub mod io;
pub mod options;
pub mod prelude;
pub mod sheet;

pub use cell::Cell;
pub use content::CellContent;
pub use error::{Error, Result};
pub use options::PrintOptions;
pub use sheet::{Sheet, SheetStats};

// Re-export core types
pub use tabula_core::{
    CellError, Position, Size, Value, ESCAPE_SIGN, FORMULA_SIGN, MAX_COLS, MAX_ROWS,
};

// Re-export formula types
pub use tabula_formula::{parse_formula, Formula, FormulaError, FormulaExpr, FormulaResult};

// Re-export I/O types
#[cfg(feature = "csv")]
pub use io::csv::{
    CsvContents, CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter, LineTerminator,
};
