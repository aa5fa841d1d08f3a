//! Concurrency-safe candidate tracking for a 9×9 Sudoku board.
//!
//! This crate provides the two building blocks of constraint propagation:
//!
//! - [`Cell`]: an internally synchronized cell holding a value (0 while
//!   unset) and, until it is decided, the partition of digits 1-9 into an
//!   allowed set and a blocked set.
//! - [`House`]: a row, column, or box of nine shared cells, whose
//!   elimination pass is designed to run as an independently scheduled task
//!   and to report completion over a channel.
//!
//! Each cell on a standard board is aliased by exactly three houses, and
//! elimination passes over overlapping houses may run at the same time.
//! Per-cell reader-writer locking plus idempotent candidate blocking keep
//! those races benign; no cross-house coordination exists anywhere.
//!
//! Board assembly and the solving strategy live outside this crate: an
//! orchestrator creates 81 cells, wires them into 27 houses, applies the
//! puzzle clues with [`Cell::set_given`], and then runs concurrent
//! elimination rounds until no house blocks anything new.
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, mpsc};
//! use std::thread;
//!
//! use gridlock_core::{Cell, House, HouseKind};
//!
//! // One row with three clues.
//! let cells: [Arc<Cell>; 9] = std::array::from_fn(|_| Arc::new(Cell::new()));
//! cells[0].set_given(1)?;
//! cells[1].set_given(2)?;
//! cells[2].set_given(3)?;
//! let house = House::new(HouseKind::Row, 0, cells.clone());
//!
//! // Run the elimination pass as its own task and wait for the signal.
//! let (tx, rx) = mpsc::channel();
//! let task = {
//!     let house = house.clone();
//!     thread::spawn(move || house.update_allow_and_block_lists(&tx))
//! };
//! let newly_blocked = rx.recv()?;
//! task.join().unwrap();
//!
//! assert_eq!(newly_blocked, 18); // six unset cells × three fixed values
//! assert!(!cells[3].is_candidate_allowed(1));
//! assert_eq!(cells[3].allowed_count(), 6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cell;
pub mod digit_set;
pub mod house;

pub use self::{
    cell::{Cell, CellError},
    digit_set::DigitSet,
    house::{House, HouseKind},
};
