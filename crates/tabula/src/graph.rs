//! Dependency graph maintenance
//!
//! Edges live on the cells themselves (`references` outgoing, `dependents` incoming) and are
//! keyed by [`Position`]. The functions here keep both directions symmetric, reject edits that
//! would close a cycle and clear memoized values downstream of a change.

use std::collections::BTreeSet;

use ahash::AHashSet;
use tabula_core::Position;
use tracing::trace;

use crate::error::{Error, Result};
use crate::sheet::Sheet;

impl Sheet {
    /// Check whether any of `candidates` can reach `target` by following references
    ///
    /// Runs before anything is committed. A position explored once is known not to reach
    /// `target` and is never walked again within the same check.
    pub(crate) fn check_circular_dependency(
        &self,
        target: Position,
        candidates: &[Position],
    ) -> Result<()> {
        let mut clean: AHashSet<Position> = AHashSet::new();
        let mut stack: Vec<Position> = candidates.to_vec();

        while let Some(pos) = stack.pop() {
            if pos == target {
                return Err(Error::CircularDependency(target));
            }
            if !clean.insert(pos) {
                continue;
            }
            if let Some(cell) = self.get_cell(pos) {
                stack.extend(
                    cell.references
                        .iter()
                        .filter(|next| !clean.contains(*next))
                        .copied(),
                );
            }
        }

        Ok(())
    }

    /// Replace the outgoing edges of the cell at `pos` with those of its current content
    ///
    /// Old edges are removed before new ones are added, so overlapping reference sets keep
    /// both directions consistent. Referenced positions without a cell get an empty
    /// placeholder.
    pub(crate) fn rebuild_references(&mut self, pos: Position) {
        let (old, new): (BTreeSet<Position>, Vec<Position>) = match self.cells.get_mut(&pos) {
            Some(cell) => (
                std::mem::take(&mut cell.references),
                cell.content.referenced_positions().to_vec(),
            ),
            None => return,
        };

        for referenced in old {
            if let Some(cell) = self.cells.get_mut(&referenced) {
                cell.dependents.remove(&pos);
            }
        }

        for referenced in &new {
            self.materialize(*referenced).dependents.insert(pos);
        }

        if let Some(cell) = self.cells.get_mut(&pos) {
            cell.references.extend(new);
        }
    }

    /// Drop memoized values of every cell that depends on `pos`
    ///
    /// A dependent without a memo ends the walk along that path. Returns the number of memos
    /// cleared.
    pub(crate) fn invalidate_dependents(&mut self, pos: Position) -> usize {
        let mut cleared = 0;
        let mut stack: Vec<Position> = match self.cells.get(&pos) {
            Some(cell) => cell.dependents.iter().copied().collect(),
            None => return 0,
        };

        while let Some(dependent) = stack.pop() {
            let Some(cell) = self.cells.get_mut(&dependent) else {
                continue;
            };
            if !cell.content.has_cache() {
                continue;
            }
            cell.content.invalidate();
            cleared += 1;
            trace!(cell = %dependent, "invalidated");
            stack.extend(cell.dependents.iter().copied());
        }

        cleared
    }

    /// Whether every edge has its dual and every edge endpoint exists
    pub fn edges_consistent(&self) -> bool {
        self.cells.iter().all(|(pos, cell)| {
            let references_match = cell
                .references
                .iter()
                .copied()
                .eq(cell.content.referenced_positions().iter().copied());

            let outgoing_ok = cell.references.iter().all(|r| {
                self.cells
                    .get(r)
                    .map_or(false, |target| target.dependents.contains(pos))
            });

            let incoming_ok = cell.dependents.iter().all(|d| {
                self.cells
                    .get(d)
                    .map_or(false, |source| source.references.contains(pos))
            });

            references_match && outgoing_ok && incoming_ok
        })
    }

    /// Whether the reference graph contains no cycle
    pub fn is_acyclic(&self) -> bool {
        self.cells.iter().all(|(pos, cell)| {
            let candidates: Vec<Position> = cell.references.iter().copied().collect();
            self.check_circular_dependency(*pos, &candidates).is_ok()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(a1: &str) -> Position {
        Position::parse(a1).unwrap()
    }

    #[test]
    fn test_cycle_check_with_no_candidates() {
        let sheet = Sheet::new();
        assert_eq!(sheet.check_circular_dependency(pos("A1"), &[]), Ok(()));
    }

    #[test]
    fn test_cycle_check_direct_and_transitive() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B1"), "=A1").unwrap();
        sheet.set_cell(pos("C1"), "=B1").unwrap();

        assert_eq!(
            sheet.check_circular_dependency(pos("A1"), &[pos("A1")]),
            Err(Error::CircularDependency(pos("A1")))
        );
        assert_eq!(
            sheet.check_circular_dependency(pos("A1"), &[pos("C1")]),
            Err(Error::CircularDependency(pos("A1")))
        );
        assert_eq!(sheet.check_circular_dependency(pos("D1"), &[pos("C1")]), Ok(()));
    }

    #[test]
    fn test_cycle_check_handles_diamonds() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B1"), "=A1").unwrap();
        sheet.set_cell(pos("B2"), "=A1").unwrap();
        sheet.set_cell(pos("C1"), "=B1+B2").unwrap();

        assert_eq!(sheet.check_circular_dependency(pos("D1"), &[pos("C1")]), Ok(()));
        assert_eq!(
            sheet.check_circular_dependency(pos("A1"), &[pos("C1")]),
            Err(Error::CircularDependency(pos("A1")))
        );
    }

    #[test]
    fn test_rebuild_creates_placeholders() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=B1+C3").unwrap();

        let b1 = sheet.get_cell(pos("B1")).unwrap();
        assert!(b1.content().is_empty());
        assert!(b1.dependents().contains(&pos("A1")));
        assert!(sheet.get_cell(pos("C3")).is_some());
        assert!(sheet.edges_consistent());
    }

    #[test]
    fn test_rebuild_with_overlapping_references() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=B1+C1").unwrap();
        sheet.set_cell(pos("A1"), "=C1+D1").unwrap();

        assert!(sheet.get_cell(pos("B1")).unwrap().dependents().is_empty());
        assert!(sheet.get_cell(pos("C1")).unwrap().dependents().contains(&pos("A1")));
        assert!(sheet.get_cell(pos("D1")).unwrap().dependents().contains(&pos("A1")));
        assert_eq!(
            sheet.get_cell(pos("A1")).unwrap().references().iter().copied().collect::<Vec<_>>(),
            vec![pos("C1"), pos("D1")]
        );
        assert!(sheet.edges_consistent());
    }

    #[test]
    fn test_invalidation_stops_at_cells_without_memo() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "1").unwrap();
        sheet.set_cell(pos("B1"), "=A1").unwrap();
        sheet.set_cell(pos("C1"), "=B1").unwrap();

        // Only C1 is evaluated; B1 gets its memo as a side effect
        sheet.value(pos("C1"));
        assert!(sheet.get_cell(pos("B1")).unwrap().has_cache());

        assert_eq!(sheet.invalidate_dependents(pos("A1")), 2);
        assert!(!sheet.get_cell(pos("B1")).unwrap().has_cache());
        assert!(!sheet.get_cell(pos("C1")).unwrap().has_cache());

        // Nothing left to clear
        assert_eq!(sheet.invalidate_dependents(pos("A1")), 0);
    }

    #[test]
    fn test_is_acyclic() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=B1").unwrap();
        sheet.set_cell(pos("B1"), "=C1").unwrap();
        assert!(sheet.is_acyclic());
    }
}
