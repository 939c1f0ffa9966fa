//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tabula_core::Position;

use super::error::CsvResult;
use super::options::{CsvContents, CsvWriteOptions, LineTerminator};
use crate::Sheet;

/// CSV writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a sheet to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        sheet: &Sheet,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(sheet, file, options)
    }

    /// Write the printable area of a sheet
    pub fn write<W: Write>(sheet: &Sheet, writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .flexible(true)
            .from_writer(writer);

        let size = sheet.printable_size();
        for row in 0..size.rows {
            let mut record = Vec::with_capacity(size.cols as usize);

            for col in 0..size.cols {
                let field = match sheet.get_cell(Position::new(row, col)) {
                    Some(cell) => match options.contents {
                        CsvContents::Values => cell.value(sheet).to_string(),
                        CsvContents::Texts => cell.text(),
                    },
                    None => String::new(),
                };
                record.push(field);
            }

            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(sheet: &Sheet, options: &CsvWriteOptions) -> String {
        let mut out = Vec::new();
        CsvWriter::write(sheet, &mut out, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample() -> Sheet {
        let mut sheet = Sheet::new();
        sheet.set("A1", "1.5").unwrap();
        sheet.set("B1", "=A1*2").unwrap();
        sheet.set("B2", "a,b").unwrap();
        sheet
    }

    #[test]
    fn test_write_values() {
        assert_eq!(write(&sample(), &CsvWriteOptions::default()), "1.5,3\n,\"a,b\"\n");
    }

    #[test]
    fn test_write_texts_crlf() {
        let options = CsvWriteOptions {
            contents: CsvContents::Texts,
            line_terminator: LineTerminator::CRLF,
            ..Default::default()
        };
        assert_eq!(write(&sample(), &options), "1.5,=A1*2\r\n,\"a,b\"\r\n");
    }

    #[test]
    fn test_write_empty_sheet() {
        assert_eq!(write(&Sheet::new(), &CsvWriteOptions::default()), "");
    }
}
