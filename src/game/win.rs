//! Single-pass win-line detection.
//!
//! The grid is walked top to bottom, left to right, keeping four run-length
//! counters per cell. A counter is the length of the run of the queried
//! symbol that ends at this cell, extended from the neighbour one step back
//! along the direction. After every row the counters of that row are scanned
//! and the first one that reaches the win length is turned back into the list
//! of coordinates.

use super::board::{Board, Cell, Coordinate};

/// Direction families, in reporting priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Grows towards the top-right; the predecessor is at (r - 1, c + 1).
    DiagonalUpRight,
    /// Grows downward; the predecessor is at (r - 1, c).
    Vertical,
    /// Grows towards the top-left; the predecessor is at (r - 1, c - 1).
    DiagonalUpLeft,
    /// Grows rightward; the predecessor is at (r, c - 1).
    Horizontal,
}

impl Direction {
    pub const PRIORITY: [Direction; 4] = [
        Direction::DiagonalUpRight,
        Direction::Vertical,
        Direction::DiagonalUpLeft,
        Direction::Horizontal,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Step from a cell to its predecessor, as (row delta, col delta).
    fn back_step(self) -> (isize, isize) {
        match self {
            Direction::DiagonalUpRight => (-1, 1),
            Direction::Vertical => (-1, 0),
            Direction::DiagonalUpLeft => (-1, -1),
            Direction::Horizontal => (0, -1),
        }
    }
}

/// A winning run: exactly `win_length` coordinates, from the start of the run
/// to the cell that completed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningLine {
    pub direction: Direction,
    pub cells: Vec<Coordinate>,
}

impl WinningLine {
    pub fn contains(&self, coord: Coordinate) -> bool {
        self.cells.contains(&coord)
    }
}

/// Find the first winning run of `cell` in scan order, or `None`.
pub fn find_winning_line(board: &Board, cell: Cell) -> Option<WinningLine> {
    if cell == Cell::Empty {
        return None;
    }

    let rows = board.rows();
    let cols = board.cols();
    let target = board.win_length();
    let mut counters = vec![[0usize; 4]; rows * cols];

    let counter_at = |counters: &[[usize; 4]], row: isize, col: isize, dir: Direction| {
        if row < 0 || col < 0 || row as usize >= rows || col as usize >= cols {
            0
        } else {
            counters[row as usize * cols + col as usize][dir.index()]
        }
    };

    for row in 0..rows {
        for col in 0..cols {
            if board.get(row, col) != cell {
                continue;
            }
            for dir in Direction::PRIORITY {
                let (dr, dc) = dir.back_step();
                let prev = counter_at(&counters, row as isize + dr, col as isize + dc, dir);
                counters[row * cols + col][dir.index()] = prev + 1;
            }
        }

        for col in 0..cols {
            for dir in Direction::PRIORITY {
                if counters[row * cols + col][dir.index()] == target {
                    return Some(trace_line(row, col, dir, target));
                }
            }
        }
    }

    None
}

/// Whether `cell` has any winning run on the board.
pub fn has_won(board: &Board, cell: Cell) -> bool {
    find_winning_line(board, cell).is_some()
}

fn trace_line(row: usize, col: usize, dir: Direction, length: usize) -> WinningLine {
    let (dr, dc) = dir.back_step();
    let mut cells: Vec<Coordinate> = (0..length as isize)
        .map(|z| {
            Coordinate::new(
                (row as isize + dr * z) as usize,
                (col as isize + dc * z) as usize,
            )
        })
        .collect();
    cells.reverse();
    WinningLine {
        direction: dir,
        cells,
    }
}
