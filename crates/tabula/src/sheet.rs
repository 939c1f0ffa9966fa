//! Sheet: the arena that owns every cell
//!
//! All edits go through [`Sheet::set_cell`] and [`Sheet::clear_cell`], each of which runs as a
//! single transaction: build the candidate content, reject it if it would close a cycle,
//! install it, rebuild the cell's outgoing edges and clear memoized values downstream.

use std::io::{self, Write};

use ahash::{AHashMap, AHashSet};
use tabula_core::{CellError, Position, Size, Value};
use tracing::{debug, trace};

use crate::cell::Cell;
use crate::content::CellContent;
use crate::error::{Error, Result};
use crate::options::PrintOptions;

/// Counters describing the work done by a sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetStats {
    /// Formula evaluations performed on a cache miss
    pub evaluations: usize,
    /// Memoized values cleared by edits
    pub invalidations: usize,
}

/// A sheet of cells keyed by [`Position`]
#[derive(Debug, Default)]
pub struct Sheet {
    pub(crate) cells: AHashMap<Position, Cell>,
    evaluations: std::cell::Cell<usize>,
    invalidations: std::cell::Cell<usize>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content of the cell at `pos` from raw input
    ///
    /// Empty input stores empty content, input starting with `=` is parsed as a formula and
    /// anything else is stored as text. A rejected edit leaves the sheet unchanged.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        if !pos.is_valid() {
            debug!(row = pos.row, col = pos.col, "rejected edit at invalid position");
            return Err(Error::InvalidPosition(pos));
        }

        let content = CellContent::from_input(text).map_err(|e| {
            debug!(cell = %pos, error = %e, "rejected content");
            e
        })?;

        self.check_circular_dependency(pos, content.referenced_positions())
            .map_err(|e| {
                debug!(cell = %pos, text, "rejected circular reference");
                e
            })?;

        self.replace_content(pos, content);
        debug!(cell = %pos, text, "cell set");
        Ok(())
    }

    /// Set a cell by A1 address
    ///
    /// # Example
    /// ```rust
    /// use tabula::prelude::*;
    ///
    /// let mut sheet = Sheet::new();
    /// sheet.set("A1", "20").unwrap();
    /// sheet.set("B1", "=A1*2+2").unwrap();
    /// assert_eq!(sheet.cell("B1").unwrap().unwrap().value(&sheet), Value::Number(42.0));
    /// ```
    pub fn set(&mut self, address: &str, text: &str) -> Result<()> {
        let pos = Position::parse(address)?;
        self.set_cell(pos, text)
    }

    /// Clear the cell at `pos`
    ///
    /// Outgoing edges are dropped and dependents lose their memos. The cell is removed
    /// unless other cells still reference it, in which case it stays as an empty
    /// placeholder.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        if !pos.is_valid() {
            return Err(Error::InvalidPosition(pos));
        }
        if !self.cells.contains_key(&pos) {
            return Ok(());
        }

        self.replace_content(pos, CellContent::Empty);

        if self.cells.get(&pos).map_or(false, |cell| !cell.is_referenced()) {
            self.cells.remove(&pos);
        }
        debug!(cell = %pos, "cell cleared");
        Ok(())
    }

    /// Clear a cell by A1 address
    pub fn clear(&mut self, address: &str) -> Result<()> {
        let pos = Position::parse(address)?;
        self.clear_cell(pos)
    }

    /// The cell at `pos`, if one exists
    pub fn get_cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    /// The cell at an A1 address, if one exists
    pub fn cell(&self, address: &str) -> Result<Option<&Cell>> {
        let pos = Position::parse(address)?;
        Ok(self.get_cell(pos))
    }

    /// Value of the cell at `pos`; a missing cell reads as empty text
    pub fn value(&self, pos: Position) -> Value {
        match self.get_cell(pos) {
            Some(cell) => cell.value(self),
            None => Value::empty(),
        }
    }

    /// Text of the cell at `pos`; a missing cell reads as `""`
    pub fn text(&self, pos: Position) -> String {
        self.get_cell(pos).map(Cell::text).unwrap_or_default()
    }

    /// Number of cells currently stored, placeholders included
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterate over stored cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        let mut positions: Vec<Position> = self.cells.keys().copied().collect();
        positions.sort_unstable();
        positions
            .into_iter()
            .filter_map(move |pos| self.cells.get(&pos).map(|cell| (pos, cell)))
    }

    /// Smallest area anchored at A1 that holds every cell with non-empty text
    pub fn printable_size(&self) -> Size {
        self.cells
            .iter()
            .filter(|(_, cell)| !cell.content.is_empty())
            .fold(Size::default(), |size, (pos, _)| size.including(*pos))
    }

    /// Print the values of the printable area
    pub fn print_values<W: Write>(&self, output: &mut W) -> io::Result<()> {
        self.print_values_with(output, &PrintOptions::default())
    }

    /// Print the texts of the printable area
    pub fn print_texts<W: Write>(&self, output: &mut W) -> io::Result<()> {
        self.print_texts_with(output, &PrintOptions::default())
    }

    pub fn print_values_with<W: Write>(
        &self,
        output: &mut W,
        options: &PrintOptions,
    ) -> io::Result<()> {
        self.print_area(output, options, |cell| cell.value(self).to_string())
    }

    pub fn print_texts_with<W: Write>(
        &self,
        output: &mut W,
        options: &PrintOptions,
    ) -> io::Result<()> {
        self.print_area(output, options, Cell::text)
    }

    fn print_area<W, F>(&self, output: &mut W, options: &PrintOptions, render: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&Cell) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    write!(output, "{}", options.delimiter)?;
                }
                if let Some(cell) = self.get_cell(Position::new(row, col)) {
                    write!(output, "{}", render(cell))?;
                }
            }
            write!(output, "{}", options.line_terminator)?;
        }
        Ok(())
    }

    /// Work counters since creation or the last [`Sheet::reset_stats`]
    pub fn stats(&self) -> SheetStats {
        SheetStats {
            evaluations: self.evaluations.get(),
            invalidations: self.invalidations.get(),
        }
    }

    pub fn reset_stats(&self) {
        self.evaluations.set(0);
        self.invalidations.set(0);
    }

    /// Get the cell at `pos`, creating an empty one if needed
    pub(crate) fn materialize(&mut self, pos: Position) -> &mut Cell {
        self.cells.entry(pos).or_insert_with(Cell::new)
    }

    /// Install already-checked content, then rebuild edges and invalidate dependents
    fn replace_content(&mut self, pos: Position, content: CellContent) {
        self.materialize(pos).content = content;
        self.rebuild_references(pos);

        let cleared = self.invalidate_dependents(pos);
        self.invalidations.set(self.invalidations.get() + cleared);
    }

    /// Value of `cell`, evaluating against this sheet on a cache miss
    ///
    /// Formulas upstream of `cell` that have no memo are evaluated first, deepest first, so
    /// every evaluation only reads values that are already computed.
    pub(crate) fn evaluate(&self, cell: &Cell) -> Value {
        if cell.content.is_formula() && !cell.content.has_cache() {
            for pos in self.stale_references(cell) {
                if let Some(upstream) = self.get_cell(pos) {
                    self.evaluate_content(&upstream.content);
                }
            }
        }
        self.evaluate_content(&cell.content)
    }

    /// Formula cells without a memo reachable from `cell`, in dependency order
    ///
    /// Post-order walk over `references` with an explicit stack. Cells holding a memo or no
    /// formula end the walk along their path.
    fn stale_references(&self, cell: &Cell) -> Vec<Position> {
        let mut order = Vec::new();
        let mut visited: AHashSet<Position> = AHashSet::new();
        let mut stack: Vec<(Position, bool)> =
            cell.references.iter().map(|pos| (*pos, false)).collect();

        while let Some((pos, expanded)) = stack.pop() {
            if expanded {
                order.push(pos);
                continue;
            }
            if !visited.insert(pos) {
                continue;
            }
            let Some(upstream) = self.get_cell(pos) else {
                continue;
            };
            if !upstream.content.is_formula() || upstream.content.has_cache() {
                continue;
            }

            stack.push((pos, true));
            stack.extend(
                upstream
                    .references
                    .iter()
                    .filter(|next| !visited.contains(*next))
                    .map(|next| (*next, false)),
            );
        }

        order
    }

    fn evaluate_content(&self, content: &CellContent) -> Value {
        if content.is_formula() && !content.has_cache() {
            self.evaluations.set(self.evaluations.get() + 1);
            trace!(formula = %content.text_repr(), "evaluating");
        }
        content.value(|pos| self.resolve(pos))
    }

    /// Number that a referenced position contributes to a formula
    fn resolve(&self, pos: Position) -> std::result::Result<f64, CellError> {
        if !pos.is_valid() {
            return Err(CellError::Ref);
        }
        let Some(cell) = self.get_cell(pos) else {
            return Ok(0.0);
        };

        match cell.value(self) {
            Value::Number(n) => Ok(n),
            Value::Text(text) => coerce_text(&text),
            Value::Error(e) => Err(e),
        }
    }
}

/// Interpret the whole of `text` as a finite number; empty text is zero
fn coerce_text(text: &str) -> std::result::Result<f64, CellError> {
    if text.is_empty() {
        return Ok(0.0);
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(CellError::Value),
    }
}
