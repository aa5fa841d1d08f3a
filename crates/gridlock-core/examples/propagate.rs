//! Example demonstrating a full propagation run over a 9×9 board.
//!
//! This example plays the role the library leaves to its caller: it builds
//! 81 shared cells, wires them into 27 houses, applies the clues, then
//! repeatedly launches one elimination task per house and waits for every
//! completion signal. Between rounds it assigns naked singles (cells with a
//! single remaining candidate), stopping once a round neither blocks nor
//! assigns anything.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example propagate
//! ```
//!
//! Set `RUST_LOG=trace` to see each house's per-pass block counts.

use std::sync::{Arc, mpsc};
use std::thread;

use gridlock_core::{Cell, CellError, House, HouseKind};

/// Zero marks an unset cell.
const CLUES: [[u8; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

fn main() -> Result<(), CellError> {
    env_logger::init();

    let cells: Vec<Arc<Cell>> = (0..81).map(|_| Arc::new(Cell::new())).collect();
    for (y, row) in CLUES.iter().enumerate() {
        for (x, &clue) in row.iter().enumerate() {
            if clue != 0 {
                cells[y * 9 + x].set_given(clue)?;
            }
        }
    }
    let houses = assemble_houses(&cells);

    let mut round = 0;
    loop {
        round += 1;
        let blocked = run_elimination_round(&houses);
        let assigned = assign_naked_singles(&cells)?;
        println!("round {round}: blocked {blocked} candidate(s), assigned {assigned} single(s)");
        if blocked == 0 && assigned == 0 {
            break;
        }
    }

    println!();
    for house in houses.iter().filter(|house| house.kind() == HouseKind::Row) {
        println!("{house}: {}", house.cells_string());
    }
    let undecided = cells.iter().filter(|cell| !cell.has_value()).count();
    println!();
    println!("{undecided} cell(s) remain undecided");
    Ok(())
}

/// Wires shared cells into 9 rows, 9 columns, and 9 boxes.
fn assemble_houses(cells: &[Arc<Cell>]) -> Vec<House> {
    let mut houses = Vec::with_capacity(27);
    for i in 0..9u8 {
        let n = usize::from(i);
        houses.push(House::new(
            HouseKind::Row,
            i,
            std::array::from_fn(|x| Arc::clone(&cells[n * 9 + x])),
        ));
        houses.push(House::new(
            HouseKind::Column,
            i,
            std::array::from_fn(|y| Arc::clone(&cells[y * 9 + n])),
        ));
        houses.push(House::new(
            HouseKind::Box,
            i,
            std::array::from_fn(|j| {
                let y = n / 3 * 3 + j / 3;
                let x = n % 3 * 3 + j % 3;
                Arc::clone(&cells[y * 9 + x])
            }),
        ));
    }
    houses
}

/// Launches one elimination task per house and waits for all 27 signals.
fn run_elimination_round(houses: &[House]) -> usize {
    let (tx, rx) = mpsc::channel();
    let tasks: Vec<_> = houses
        .iter()
        .map(|house| {
            let house = house.clone();
            let tx = tx.clone();
            thread::spawn(move || house.update_allow_and_block_lists(&tx))
        })
        .collect();
    drop(tx);
    for task in tasks {
        let _ = task.join();
    }
    rx.iter().sum()
}

/// Assigns every cell whose candidate set has shrunk to a single digit.
fn assign_naked_singles(cells: &[Arc<Cell>]) -> Result<usize, CellError> {
    let mut assigned = 0;
    for cell in cells {
        if cell.has_value() {
            continue;
        }
        if let [digit] = cell.allowed_candidates()[..] {
            cell.set_value(digit)?;
            assigned += 1;
        }
    }
    Ok(assigned)
}
