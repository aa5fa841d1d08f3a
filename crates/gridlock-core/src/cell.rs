//! The per-cell state machine: value, given flag, and candidate tracking.
//!
//! A [`Cell`] is the one mutable resource shared between houses: every cell
//! on a standard board is aliased by its row, its column, and its box, and
//! all three may recompute candidates for it at the same time. All state
//! lives behind a per-cell reader-writer lock, so callers never synchronize
//! externally.
//!
//! A cell starts empty with every digit allowed, transitions at most once to
//! holding a value (optionally as a given clue), and tears down its
//! candidate bookkeeping at that point. It is never reset.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::DigitSet;

/// The value of a cell that has not been decided yet.
const UNSET: u8 = 0;

/// Errors returned by cell value assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CellError {
    /// The assignment argument was outside the range 1-9.
    #[display("invalid cell value to set: {value}")]
    InvalidValue {
        /// The rejected value.
        value: u8,
    },
    /// The cell already holds a given (clue) value.
    #[display("cannot overwrite value of a given cell")]
    GivenCellImmutable,
}

/// Candidate bookkeeping for an undecided cell.
///
/// Digits are only ever removed from `allowed` (it starts full), so the
/// set's ascending iteration order is also its insertion order. Blocks
/// arrive in pass-dependent order, which `blocked_order` records.
#[derive(Debug)]
struct Candidates {
    allowed: DigitSet,
    blocked_order: Vec<u8>,
}

impl Candidates {
    fn new() -> Self {
        Self {
            allowed: DigitSet::FULL,
            blocked_order: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct CellState {
    given: bool,
    value: u8,
    candidates: Option<Candidates>,
}

/// A single Sudoku cell, shared between its row, column, and box.
///
/// All operations are internally synchronized: reads take a shared lock,
/// writes an exclusive one. Lock granularity is per cell, so houses mutating
/// different cells never contend, and houses mutating the same cell
/// serialize without any cross-house coordination.
///
/// # Examples
///
/// ```
/// use gridlock_core::Cell;
///
/// let cell = Cell::new();
/// assert_eq!(cell.allowed_count(), 9);
///
/// cell.block_candidate(4);
/// assert!(!cell.is_candidate_allowed(4));
/// assert_eq!(cell.allowed_count(), 8);
///
/// cell.set_value(7)?;
/// assert_eq!(cell.value(), 7);
/// assert_eq!(cell.allowed_count(), 0);
/// # Ok::<(), gridlock_core::CellError>(())
/// ```
#[derive(Debug)]
pub struct Cell {
    state: RwLock<CellState>,
}

impl Cell {
    /// Creates an empty cell with every digit still allowed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CellState {
                given: false,
                value: UNSET,
                candidates: Some(Candidates::new()),
            }),
        }
    }

    // Writers update all fields under one guard, so a poisoned lock still
    // holds coherent data.
    fn read(&self) -> RwLockReadGuard<'_, CellState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CellState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if the cell's value was supplied as a puzzle clue.
    #[must_use]
    pub fn is_given(&self) -> bool {
        self.read().given
    }

    /// Returns `true` if the cell holds a value.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.read().value != UNSET
    }

    /// Returns the cell's value, or 0 if unset.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.read().value
    }

    /// Renders the cell's value as a decimal string, `"0"` when unset.
    #[must_use]
    pub fn value_string(&self) -> String {
        self.value().to_string()
    }

    fn try_assign(&self, value: u8, given: bool) -> Result<(), CellError> {
        // Range is validated before the given check; a given cell rejects
        // an out-of-range argument as InvalidValue, not GivenCellImmutable.
        if !(1..=9).contains(&value) {
            return Err(CellError::InvalidValue { value });
        }
        let mut state = self.write();
        if state.given {
            return Err(CellError::GivenCellImmutable);
        }
        state.value = value;
        state.given = given;
        state.candidates = None;
        Ok(())
    }

    /// Assigns a solver-derived value and tears down candidate tracking.
    ///
    /// The cell is not marked as given; a later `set_value` may overwrite
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::InvalidValue`] if `value` is outside 1-9, and
    /// [`CellError::GivenCellImmutable`] if the cell holds a clue.
    pub fn set_value(&self, value: u8) -> Result<(), CellError> {
        self.try_assign(value, false)
    }

    /// Assigns a clue value and permanently fixes the cell.
    ///
    /// A cell that already holds a non-given value is promoted: the new
    /// value is assigned and the cell becomes immutable.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::InvalidValue`] if `value` is outside 1-9, and
    /// [`CellError::GivenCellImmutable`] if the cell already holds a clue.
    pub fn set_given(&self, value: u8) -> Result<(), CellError> {
        self.try_assign(value, true)
    }

    /// Returns `true` if `digit` is still allowed for this cell.
    ///
    /// Once the cell has a value there are no candidates left, so this
    /// returns `false` for every argument, out-of-range ones included.
    #[must_use]
    pub fn is_candidate_allowed(&self, digit: u8) -> bool {
        if !(1..=9).contains(&digit) {
            return false;
        }
        self.read()
            .candidates
            .as_ref()
            .is_some_and(|candidates| candidates.allowed.contains(digit))
    }

    /// Returns the number of digits still allowed, 0 once the cell has a
    /// value.
    #[must_use]
    pub fn allowed_count(&self) -> usize {
        self.read()
            .candidates
            .as_ref()
            .map_or(0, |candidates| candidates.allowed.len())
    }

    /// Returns a snapshot of the digits still allowed, in ascending order.
    #[must_use]
    pub fn allowed_candidates(&self) -> Vec<u8> {
        self.read()
            .candidates
            .as_ref()
            .map(|candidates| candidates.allowed.iter().collect())
            .unwrap_or_default()
    }

    /// Returns a snapshot of the eliminated digits, in the order they were
    /// blocked.
    #[must_use]
    pub fn blocked_candidates(&self) -> Vec<u8> {
        self.read()
            .candidates
            .as_ref()
            .map(|candidates| candidates.blocked_order.clone())
            .unwrap_or_default()
    }

    /// Moves `digit` from the allowed set to the blocked set.
    ///
    /// Returns `true` if the candidate sets changed. Out-of-range digits,
    /// digits already blocked, and cells past candidate tracking are
    /// silently absorbed; elimination is best-effort cleanup and never
    /// fails. Safe to call concurrently from every house that aliases this
    /// cell: concurrent calls for different digits all land, and a call
    /// racing an assignment resolves to one of the two self-consistent
    /// outcomes.
    pub fn block_candidate(&self, digit: u8) -> bool {
        if !(1..=9).contains(&digit) {
            return false;
        }
        let mut state = self.write();
        let Some(candidates) = state.candidates.as_mut() else {
            return false;
        };
        if !candidates.allowed.remove(digit) {
            return false;
        }
        candidates.blocked_order.push(digit);
        true
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_new_cell_defaults() {
        let cell = Cell::new();
        assert!(!cell.is_given());
        assert!(!cell.has_value());
        assert_eq!(cell.value(), 0);
        assert_eq!(cell.allowed_count(), 9);
        assert_eq!(cell.allowed_candidates(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(cell.blocked_candidates().is_empty());
        for digit in 1..=9 {
            assert!(cell.is_candidate_allowed(digit));
        }
    }

    #[test]
    fn test_set_value_accepts_every_digit() {
        for digit in 1..=9 {
            let cell = Cell::new();
            cell.set_value(digit).unwrap();
            assert_eq!(cell.value(), digit);
            assert!(cell.has_value());
            assert!(!cell.is_given());
            assert_eq!(cell.allowed_count(), 0);
            assert!(cell.allowed_candidates().is_empty());
            assert!(cell.blocked_candidates().is_empty());
            assert!(!cell.is_candidate_allowed(digit));
        }
    }

    #[test]
    fn test_set_value_rejects_out_of_range() {
        let cell = Cell::new();
        for value in [0, 10, 255] {
            assert_eq!(
                cell.set_value(value),
                Err(CellError::InvalidValue { value })
            );
        }
        assert!(!cell.has_value());
        assert_eq!(cell.allowed_count(), 9);
    }

    #[test]
    fn test_set_value_overwrites_non_given() {
        let cell = Cell::new();
        cell.set_value(5).unwrap();
        cell.set_value(7).unwrap();
        assert_eq!(cell.value(), 7);
        assert!(!cell.is_given());
    }

    #[test]
    fn test_set_given_fixes_the_cell() {
        let cell = Cell::new();
        cell.set_given(9).unwrap();
        assert!(cell.is_given());
        assert!(cell.has_value());
        assert_eq!(cell.value(), 9);
        assert_eq!(cell.allowed_count(), 0);
        assert!(cell.allowed_candidates().is_empty());
        assert!(cell.blocked_candidates().is_empty());

        // Range is validated before the given check.
        assert_eq!(
            cell.set_given(10),
            Err(CellError::InvalidValue { value: 10 })
        );
        assert_eq!(cell.set_given(5), Err(CellError::GivenCellImmutable));
        assert_eq!(cell.set_value(5), Err(CellError::GivenCellImmutable));
        assert_eq!(cell.value(), 9);
    }

    #[test]
    fn test_set_given_promotes_valued_cell() {
        let cell = Cell::new();
        cell.set_value(4).unwrap();
        cell.set_given(6).unwrap();
        assert!(cell.is_given());
        assert_eq!(cell.value(), 6);
        assert_eq!(cell.set_value(1), Err(CellError::GivenCellImmutable));
    }

    #[test]
    fn test_value_string() {
        let cell = Cell::new();
        assert_eq!(cell.value_string(), "0");
        cell.set_value(7).unwrap();
        assert_eq!(cell.value_string(), "7");
    }

    #[test]
    fn test_block_candidate_moves_digit() {
        let cell = Cell::new();
        for digit in [2, 4, 6, 8] {
            assert!(cell.block_candidate(digit));
        }
        for digit in 1..=9 {
            assert_eq!(cell.is_candidate_allowed(digit), digit % 2 != 0);
        }
        assert_eq!(cell.allowed_candidates(), vec![1, 3, 5, 7, 9]);
        assert_eq!(cell.blocked_candidates(), vec![2, 4, 6, 8]);
    }

    #[test]
    fn test_block_candidate_counts_down() {
        let cell = Cell::new();
        for (blocked, digit) in (1..=9).enumerate() {
            assert!(cell.block_candidate(digit));
            assert_eq!(cell.allowed_count(), 8 - blocked);
        }
        assert_eq!(cell.allowed_count(), 0);
    }

    #[test]
    fn test_block_candidate_is_idempotent() {
        let cell = Cell::new();
        assert!(cell.block_candidate(3));
        assert!(!cell.block_candidate(3));
        assert_eq!(cell.allowed_count(), 8);
        assert_eq!(cell.blocked_candidates(), vec![3]);
    }

    #[test]
    fn test_block_candidate_absorbs_out_of_range() {
        let cell = Cell::new();
        assert!(!cell.block_candidate(0));
        assert!(!cell.block_candidate(10));
        assert_eq!(cell.allowed_count(), 9);
    }

    #[test]
    fn test_block_candidate_after_value_is_noop() {
        let cell = Cell::new();
        cell.set_value(5).unwrap();
        assert!(!cell.block_candidate(1));
        assert_eq!(cell.allowed_count(), 0);
        assert!(!cell.is_candidate_allowed(1));
    }

    #[test]
    fn test_blocked_order_is_preserved() {
        let cell = Cell::new();
        for digit in [9, 1, 5] {
            assert!(cell.block_candidate(digit));
        }
        assert_eq!(cell.blocked_candidates(), vec![9, 1, 5]);
        assert_eq!(cell.allowed_candidates(), vec![2, 3, 4, 6, 7, 8]);
    }

    #[test]
    fn test_concurrent_blocks_all_land() {
        let cell = Arc::new(Cell::new());
        let handles: Vec<_> = (1..=9)
            .map(|digit| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || cell.block_candidate(digit))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(cell.allowed_count(), 0);
        let mut blocked = cell.blocked_candidates();
        blocked.sort_unstable();
        assert_eq!(blocked, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_block_racing_assignment_stays_consistent() {
        for _ in 0..32 {
            let cell = Arc::new(Cell::new());
            let blockers: Vec<_> = (1..=4)
                .map(|digit| {
                    let cell = Arc::clone(&cell);
                    thread::spawn(move || {
                        cell.block_candidate(digit);
                    })
                })
                .collect();
            let setter = {
                let cell = Arc::clone(&cell);
                thread::spawn(move || cell.set_value(9).unwrap())
            };
            for handle in blockers {
                handle.join().unwrap();
            }
            setter.join().unwrap();

            // Whichever order the race resolved in, the final state is the
            // assigned value with candidate tracking torn down.
            assert_eq!(cell.value(), 9);
            assert_eq!(cell.allowed_count(), 0);
            assert!(cell.allowed_candidates().is_empty());
            assert!(cell.blocked_candidates().is_empty());
        }
    }

    proptest! {
        #[test]
        fn candidate_partition_holds(digits in proptest::collection::vec(0u8..12, 0..40)) {
            let cell = Cell::new();
            for digit in digits {
                cell.block_candidate(digit);
            }
            let allowed = cell.allowed_candidates();
            let blocked = cell.blocked_candidates();
            prop_assert_eq!(allowed.len() + blocked.len(), 9);
            for digit in 1..=9u8 {
                prop_assert_ne!(allowed.contains(&digit), blocked.contains(&digit));
            }
        }

        #[test]
        fn teardown_is_permanent(
            value in 1u8..=9,
            digits in proptest::collection::vec(1u8..=9, 0..20),
        ) {
            let cell = Cell::new();
            cell.set_value(value).unwrap();
            for digit in digits {
                prop_assert!(!cell.block_candidate(digit));
            }
            prop_assert_eq!(cell.allowed_count(), 0);
            prop_assert_eq!(cell.value(), value);
        }
    }
}
