//! CSV reader and writer
//!
//! Each CSV field holds the raw input of one cell, so a field such as `=A1+1` is loaded as a
//! formula. Writing produces either the computed values or the texts of the printable area.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvContents, CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;
