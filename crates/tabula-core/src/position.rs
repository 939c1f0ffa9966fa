//! Cell position and sheet size types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell position (e.g., "A1")
///
/// Rows and columns are 0-based internally and 1-based / lettered in A1 notation.
/// Coordinates are signed so that a reference outside the sheet (for instance one typed
/// into a formula) can still be represented; such a position reports `is_valid() == false`
/// and renders as `#REF!`.
///
/// Positions are ordered row-major: first by row, then by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Row index (0-based internally, 1-based in display)
    pub row: i32,
    /// Column index (0-based, A=0, B=1, ...)
    pub col: i32,
}

impl Position {
    /// Sentinel for a reference that does not point inside the sheet
    pub const NONE: Position = Position { row: -1, col: -1 };

    /// Create a new position
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Check whether the position lies inside the addressable sheet
    pub fn is_valid(&self) -> bool {
        (0..MAX_ROWS).contains(&self.row) && (0..MAX_COLS).contains(&self.col)
    }

    /// Parse a position from A1-style notation
    ///
    /// Text that is not shaped like a reference is an error. A well-formed reference that
    /// falls outside the sheet (`A0`, `ZZZZ1`) parses to [`Position::NONE`].
    ///
    /// # Examples
    /// ```
    /// use tabula_core::Position;
    ///
    /// let pos = Position::parse("A1").unwrap();
    /// assert_eq!(pos, Position::new(0, 0));
    ///
    /// let pos = Position::parse("ab12").unwrap();
    /// assert_eq!(pos, Position::new(11, 27));
    ///
    /// assert_eq!(Position::parse("A0").unwrap(), Position::NONE);
    /// assert!(Position::parse("1A").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(split);

        if letters.is_empty() {
            return Err(Error::InvalidAddress(format!("no column letters in '{}'", s)));
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }

        let col = match Self::letters_to_column(letters) {
            Some(col) => col,
            None => return Ok(Self::NONE),
        };
        let row = match digits.parse::<i32>() {
            Ok(row) if row >= 1 && row <= MAX_ROWS => row - 1,
            _ => return Ok(Self::NONE),
        };

        Ok(Self::new(row, col))
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: i32) -> String {
        let mut result = String::new();
        let mut n = col as i64 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to an index (A = 0, Z = 25, AA = 26, etc.)
    ///
    /// Returns `None` for an empty string, a non-letter, or a column past the sheet limit.
    pub fn letters_to_column(letters: &str) -> Option<i32> {
        if letters.is_empty() {
            return None;
        }

        let mut col: i32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return None;
            }
            let digit = (c.to_ascii_uppercase() as u8 - b'A') as i32 + 1;
            col = col.checked_mul(26)?.checked_add(digit)?;
            if col > MAX_COLS {
                return None;
            }
        }

        Some(col - 1)
    }

    /// Format as A1-style string, or `#REF!` for an invalid position
    pub fn to_a1_string(&self) -> String {
        if !self.is_valid() {
            return "#REF!".to_string();
        }
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Extent of a rectangular area anchored at A1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Size {
    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }

    /// Smallest size that contains both `self` and the given position
    pub fn including(self, pos: Position) -> Self {
        Self {
            rows: self.rows.max(pos.row + 1),
            cols: self.cols.max(pos.col + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(Position::column_to_letters(0), "A");
        assert_eq!(Position::column_to_letters(25), "Z");
        assert_eq!(Position::column_to_letters(26), "AA");
        assert_eq!(Position::column_to_letters(701), "ZZ");
        assert_eq!(Position::column_to_letters(702), "AAA");
        assert_eq!(Position::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(Position::letters_to_column("A"), Some(0));
        assert_eq!(Position::letters_to_column("AB"), Some(27));
        assert_eq!(Position::letters_to_column("xfd"), Some(16383));
        assert_eq!(Position::letters_to_column("XFE"), None);
        assert_eq!(Position::letters_to_column("ZZZZZZZZZZZZ"), None);
        assert_eq!(Position::letters_to_column(""), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Position::parse("A1").unwrap(), Position::new(0, 0));
        assert_eq!(Position::parse("C100").unwrap(), Position::new(99, 2));
        assert_eq!(Position::parse("XFD16384").unwrap(), Position::new(16383, 16383));

        // Well-formed but outside the sheet
        assert_eq!(Position::parse("A0").unwrap(), Position::NONE);
        assert_eq!(Position::parse("A16385").unwrap(), Position::NONE);
        assert_eq!(Position::parse("XFE1").unwrap(), Position::NONE);
        assert_eq!(Position::parse("A99999999999").unwrap(), Position::NONE);

        assert!(Position::parse("").is_err());
        assert!(Position::parse("A").is_err());
        assert!(Position::parse("12").is_err());
        assert!(Position::parse("A1B").is_err());
        assert!(Position::parse("A-1").is_err());
    }

    #[test]
    fn test_validity_and_display() {
        assert!(Position::new(0, 0).is_valid());
        assert!(!Position::new(-1, 0).is_valid());
        assert!(!Position::new(0, 16384).is_valid());
        assert!(!Position::NONE.is_valid());

        assert_eq!(Position::new(1, 1).to_string(), "B2");
        assert_eq!(Position::NONE.to_string(), "#REF!");
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut positions = vec![
            Position::new(1, 0),
            Position::new(0, 5),
            Position::new(0, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(0, 5), Position::new(1, 0)]
        );
    }

    #[test]
    fn test_size_including() {
        let size = Size::default()
            .including(Position::new(2, 0))
            .including(Position::new(0, 3));
        assert_eq!(size, Size::new(3, 4));
    }
}
