//! # tabula-core
//!
//! Core data types shared by the tabula crates:
//! - [`Position`] and [`Size`] - cell coordinates and printable extents
//! - [`Value`] - the result of reading a cell (number, text or error)
//! - [`CellError`] - the error values a formula can produce
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{CellError, Position, Value};
//!
//! let pos = Position::parse("B3").unwrap();
//! assert_eq!(pos, Position::new(2, 1));
//! assert_eq!(pos.to_string(), "B3");
//!
//! let value = Value::from(CellError::Div0);
//! assert_eq!(value.to_string(), "#DIV/0!");
//! ```

pub mod error;
pub mod position;
pub mod value;

pub use error::{Error, Result};
pub use position::{Position, Size};
pub use value::{CellError, Value};

/// Maximum number of rows addressable by a [`Position`]
pub const MAX_ROWS: i32 = 16_384;

/// Maximum number of columns addressable by a [`Position`]
pub const MAX_COLS: i32 = 16_384;

/// Leading character that marks cell input as a formula
pub const FORMULA_SIGN: char = '=';

/// Leading character that marks cell input as literal text
pub const ESCAPE_SIGN: char = '\'';
