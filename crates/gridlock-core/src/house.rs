//! Houses: rows, columns, and boxes of nine shared cells.
//!
//! A house aliases its cells rather than owning them; on a standard board
//! every cell is reachable from exactly three houses. The elimination pass
//! ([`House::update_allow_and_block_lists`]) is the unit of work an
//! orchestrator schedules once per house per round, up to 27 concurrently.
//! The pass relies entirely on per-cell locking and idempotent blocking, so
//! passes over overlapping houses race benignly.

use std::fmt::{self, Display};
use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::{Cell, DigitSet};

/// The three kinds of house on a standard board.
///
/// Houses of every kind behave identically; the kind exists for
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum HouseKind {
    /// A horizontal group of nine cells.
    #[display("row")]
    Row,
    /// A vertical group of nine cells.
    #[display("column")]
    Column,
    /// A 3×3 group of nine cells.
    #[display("box")]
    Box,
}

/// A named group of nine cells sharing the no-duplicate constraint.
///
/// Board assembly constructs 27 houses over 81 shared cells and must give
/// each cell exactly three memberships (row, column, box). Within one house
/// at most one cell may hold any given value once the puzzle is valid; the
/// elimination pass assumes this but does not verify it.
///
/// Cloning a house clones the nine shared references, which is how a house
/// is handed to its worker task.
#[derive(Debug, Clone)]
pub struct House {
    kind: HouseKind,
    index: u8,
    cells: [Arc<Cell>; 9],
}

impl House {
    /// Creates a house over nine shared cells.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in the range 0-8.
    #[must_use]
    pub fn new(kind: HouseKind, index: u8, cells: [Arc<Cell>; 9]) -> Self {
        assert!(index < 9, "house index must be between 0 and 8, got {index}");
        Self { kind, index, cells }
    }

    /// Returns the kind of this house.
    #[must_use]
    pub fn kind(&self) -> HouseKind {
        self.kind
    }

    /// Returns this house's position among houses of its kind.
    #[must_use]
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Returns the house's nine cells in board order.
    #[must_use]
    pub fn cells(&self) -> &[Arc<Cell>; 9] {
        &self.cells
    }

    /// Returns the cell at position `i` within the house.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not in the range 0-8.
    #[must_use]
    pub fn cell(&self, i: usize) -> &Arc<Cell> {
        assert!(i < 9, "cell index must be between 0 and 8, got {i}");
        &self.cells[i]
    }

    /// Returns the cells present in both this house and `other`.
    ///
    /// Cells are matched by reference identity, never by value, and are
    /// returned in this house's order. On a well-formed board two distinct
    /// houses share 0, 1, or 3 cells; a house intersected with itself
    /// returns all nine.
    #[must_use]
    pub fn common_cells(&self, other: &House) -> Vec<Arc<Cell>> {
        self.cells
            .iter()
            .filter(|cell| other.cells.iter().any(|c| Arc::ptr_eq(cell, c)))
            .cloned()
            .collect()
    }

    /// Runs one elimination pass and signals completion.
    ///
    /// The pass collects the values already fixed among the house's cells,
    /// then blocks each of them in every unset cell. Cells that hold a
    /// value have no candidate state and are skipped. After all nine cells
    /// have been processed, the number of candidates newly blocked is sent
    /// on `done` exactly once; a dropped receiver is ignored. A round in
    /// which every house reports 0 has reached the fixed point.
    ///
    /// The pass snapshots "which values are fixed here" at execution time
    /// and does not re-observe concurrent fixes; convergence across the
    /// board is the orchestrator's fixed-point iteration.
    pub fn update_allow_and_block_lists(&self, done: &Sender<usize>) {
        let fixed: DigitSet = self
            .cells
            .iter()
            .map(|cell| cell.value())
            .filter(|&value| value != 0)
            .collect();

        let mut blocked = 0;
        for cell in &self.cells {
            if cell.has_value() {
                continue;
            }
            for digit in fixed {
                if cell.block_candidate(digit) {
                    blocked += 1;
                }
            }
        }

        log::trace!("{self}: elimination pass blocked {blocked} candidate(s)");
        let _ = done.send(blocked);
    }

    /// Renders the house's nine values for diagnostics, `"0"` for unset.
    #[must_use]
    pub fn cells_string(&self) -> String {
        let values: Vec<String> = self.cells.iter().map(|cell| cell.value_string()).collect();
        values.join(" ")
    }
}

impl Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.index)
    }
}
