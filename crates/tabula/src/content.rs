//! Cell content variants
//!
//! A cell stores exactly one [`CellContent`]. Content is never edited in place: every edit
//! builds a fresh value with [`CellContent::from_input`] and replaces the old one.

use std::cell::OnceCell;

use tabula_core::{CellError, Position, Value, ESCAPE_SIGN, FORMULA_SIGN};
use tabula_formula::{parse_formula, Formula};

use crate::error::{Error, Result};

/// The content stored in a cell
#[derive(Debug, Clone, Default)]
pub enum CellContent {
    /// Nothing stored; reads as the empty string
    #[default]
    Empty,

    /// Literal text, stored exactly as typed (never empty)
    Text(String),

    /// Parsed formula with its memoized value
    Formula(FormulaContent),
}

/// A formula together with its cleaned reference list and memoized value
#[derive(Debug, Clone)]
pub struct FormulaContent {
    formula: Formula,
    /// Valid, sorted, duplicate-free
    references: Vec<Position>,
    cache: OnceCell<Value>,
}

impl CellContent {
    /// Interpret raw user input
    ///
    /// - `""` → [`CellContent::Empty`]
    /// - `=` followed by at least one character → [`CellContent::Formula`]
    /// - anything else, including a lone `=` → [`CellContent::Text`]
    pub fn from_input(input: &str) -> Result<Self> {
        if input.is_empty() {
            Ok(CellContent::Empty)
        } else if input.len() > 1 && input.starts_with(FORMULA_SIGN) {
            Self::formula(input)
        } else {
            Self::text(input)
        }
    }

    /// Create text content; `raw` must not be empty
    pub fn text<S: Into<String>>(raw: S) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(Error::Content("text content cannot be empty".into()));
        }
        Ok(CellContent::Text(raw))
    }

    /// Create formula content from input that starts with `=`
    pub fn formula(raw: &str) -> Result<Self> {
        let expression = raw.strip_prefix(FORMULA_SIGN).ok_or_else(|| {
            Error::Content(format!("formula must start with '{}': {:?}", FORMULA_SIGN, raw))
        })?;
        let formula = parse_formula(expression)?;
        Ok(CellContent::Formula(FormulaContent::new(formula)))
    }

    /// Current value, evaluating (and memoizing) a formula on a cache miss
    ///
    /// `resolver` turns a referenced position into a number or the error that aborts the
    /// evaluation; it is only called on a cache miss.
    pub fn value<F>(&self, resolver: F) -> Value
    where
        F: Fn(Position) -> std::result::Result<f64, CellError>,
    {
        match self {
            CellContent::Empty => Value::empty(),
            CellContent::Text(raw) => match raw.strip_prefix(ESCAPE_SIGN) {
                Some(stripped) => Value::text(stripped),
                None => Value::text(raw.as_str()),
            },
            CellContent::Formula(content) => content
                .cache
                .get_or_init(|| Value::from(content.formula.execute(resolver)))
                .clone(),
        }
    }

    /// Text that reproduces this content when entered again
    pub fn text_repr(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(raw) => raw.clone(),
            CellContent::Formula(content) => {
                format!("{}{}", FORMULA_SIGN, content.formula.expression())
            }
        }
    }

    /// Referenced positions: valid, ascending and duplicate-free
    pub fn referenced_positions(&self) -> &[Position] {
        match self {
            CellContent::Formula(content) => &content.references,
            CellContent::Empty | CellContent::Text(_) => &[],
        }
    }

    /// Drop the memoized value, if any
    pub fn invalidate(&mut self) {
        if let CellContent::Formula(content) = self {
            content.cache.take();
        }
    }

    /// Whether a memoized value is currently held
    pub fn has_cache(&self) -> bool {
        match self {
            CellContent::Formula(content) => content.cache.get().is_some(),
            CellContent::Empty | CellContent::Text(_) => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }
}

impl FormulaContent {
    fn new(formula: Formula) -> Self {
        let mut references: Vec<Position> = formula
            .referenced_positions()
            .into_iter()
            .filter(Position::is_valid)
            .collect();
        references.sort_unstable();
        references.dedup();

        Self {
            formula,
            references,
            cache: OnceCell::new(),
        }
    }
}
