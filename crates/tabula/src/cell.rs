//! Cell aggregate: one content variant plus its graph edges

use std::collections::BTreeSet;

use tabula_core::{Position, Value};

use crate::content::CellContent;
use crate::sheet::Sheet;

/// A single cell in a [`Sheet`]
///
/// `references` are the cells this one's formula reads; `dependents` are the cells that read
/// this one. Both are kept in sync by the sheet.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub(crate) content: CellContent,
    pub(crate) references: BTreeSet<Position>,
    pub(crate) dependents: BTreeSet<Position>,
}

impl Cell {
    /// Create an empty cell with no edges
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored content
    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Current value, evaluating against `sheet` on a cache miss
    pub fn value(&self, sheet: &Sheet) -> Value {
        sheet.evaluate(self)
    }

    /// Text that reproduces this cell's content
    pub fn text(&self) -> String {
        self.content.text_repr()
    }

    /// Valid positions referenced by the content, ascending and duplicate-free
    pub fn referenced_positions(&self) -> Vec<Position> {
        self.content.referenced_positions().to_vec()
    }

    /// Outgoing edges
    pub fn references(&self) -> &BTreeSet<Position> {
        &self.references
    }

    /// Incoming edges
    pub fn dependents(&self) -> &BTreeSet<Position> {
        &self.dependents
    }

    /// Whether any other cell reads this one
    pub fn is_referenced(&self) -> bool {
        !self.dependents.is_empty()
    }

    pub fn has_cache(&self) -> bool {
        self.content.has_cache()
    }
}
