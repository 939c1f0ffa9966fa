//! Import and export of sheets

#[cfg(feature = "csv")]
pub mod csv;
