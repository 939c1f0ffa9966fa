//! Line-oriented sheet scripts
//!
//! ```text
//! # comments and blank lines are ignored
//! set A1 10
//! set B1 =A1*2
//! get B1
//! print values
//! ```

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use tabula::prelude::*;
use tracing::warn;

/// A single script command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Set a cell from raw input (the rest of the line)
    Set(Position, String),
    Clear(Position),
    /// Print the value of a cell
    Get(Position),
    /// Print the text of a cell
    Text(Position),
    PrintValues,
    PrintTexts,
    /// Print the printable area as `rows cols`
    Size,
}

impl Command {
    /// Parse one script line; blank lines and comments yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = split_word(line);
        let command = match word {
            "set" => {
                let (address, text) = split_word(rest);
                Command::Set(parse_position(address)?, text.to_string())
            }
            "clear" => Command::Clear(parse_position(rest.trim())?),
            "get" => Command::Get(parse_position(rest.trim())?),
            "text" => Command::Text(parse_position(rest.trim())?),
            "print" => match rest.trim() {
                "values" => Command::PrintValues,
                "texts" => Command::PrintTexts,
                other => bail!("expected 'values' or 'texts' after print, got {:?}", other),
            },
            "size" => Command::Size,
            other => bail!("unknown command {:?}", other),
        };
        Ok(Some(command))
    }
}

/// Split off the first whitespace-delimited word; the remainder keeps its inner spacing
fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (s, ""),
    }
}

fn parse_position(address: &str) -> Result<Position> {
    if address.is_empty() {
        bail!("missing cell address");
    }
    Position::parse(address).with_context(|| format!("bad cell address {:?}", address))
}

/// Execute a script against `sheet`
///
/// Output of `get`, `text`, `print` and `size` goes to `out`. Lines that fail are reported to
/// `err` with their line number and execution continues. Returns the number of failed lines.
pub fn run<R, W, E>(sheet: &mut Sheet, input: R, out: &mut W, err: &mut E) -> Result<usize>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut failures = 0;

    for (index, line) in input.lines().enumerate() {
        let line = line.context("failed to read script")?;
        let line_no = index + 1;

        let outcome = Command::parse(&line).and_then(|command| match command {
            Some(command) => execute(sheet, command, out),
            None => Ok(()),
        });

        if let Err(e) = outcome {
            failures += 1;
            warn!(line = line_no, error = %e, "script line failed");
            writeln!(err, "line {}: {:#}", line_no, e)?;
        }
    }

    Ok(failures)
}

fn execute<W: Write>(sheet: &mut Sheet, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Set(pos, text) => sheet
            .set_cell(pos, &text)
            .with_context(|| format!("cannot set {}", pos))?,
        Command::Clear(pos) => sheet
            .clear_cell(pos)
            .with_context(|| format!("cannot clear {}", pos))?,
        Command::Get(pos) => writeln!(out, "{}", sheet.value(pos))?,
        Command::Text(pos) => writeln!(out, "{}", sheet.text(pos))?,
        Command::PrintValues => sheet.print_values(out)?,
        Command::PrintTexts => sheet.print_texts(out)?,
        Command::Size => {
            let size = sheet.printable_size();
            writeln!(out, "{} {}", size.rows, size.cols)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run_str(script: &str) -> (String, String, usize) {
        let mut sheet = Sheet::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let failures = run(&mut sheet, script.as_bytes(), &mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
            failures,
        )
    }

    #[test]
    fn test_parse_commands() {
        let a1 = Position::new(0, 0);
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("# note").unwrap(), None);
        assert_eq!(
            Command::parse("set A1 hello  world").unwrap(),
            Some(Command::Set(a1, "hello  world".into()))
        );
        assert_eq!(
            Command::parse("set a1").unwrap(),
            Some(Command::Set(a1, String::new()))
        );
        assert_eq!(Command::parse("get A1").unwrap(), Some(Command::Get(a1)));
        assert_eq!(Command::parse("print texts").unwrap(), Some(Command::PrintTexts));
        assert!(Command::parse("print nothing").is_err());
        assert!(Command::parse("frobnicate").is_err());
        assert!(Command::parse("get").is_err());
    }

    #[test]
    fn test_run_chain() {
        let (out, err, failures) = run_str(
            "set A1 1\nset B1 =A1+1\nset C1 =B1+1\nget C1\nset A1 5\nget C1\ntext B1\nsize\n",
        );
        assert_eq!(out, "3\n7\n=A1+1\n1 3\n");
        assert_eq!(err, "");
        assert_eq!(failures, 0);
    }

    #[test]
    fn test_failed_edits_are_reported_and_skipped() {
        let (out, err, failures) = run_str("set A1 =B1\nset B1 =A1\nset C1 =1+\nget A1\n");
        assert_eq!(out, "0\n");
        assert_eq!(failures, 2);
        assert!(err.starts_with("line 2: cannot set B1"));
        assert!(err.contains("line 3: cannot set C1"));
    }

    #[test]
    fn test_print() {
        let (out, _, _) = run_str("set A1 2\nset B2 =A1*A1\nprint values\nprint texts\n");
        assert_eq!(out, "2\t\n\t4\n2\t\n\t=A1*A1\n");
    }
}
