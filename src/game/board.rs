use std::fmt;

use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
pub const WIN_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    PlayerA,
    PlayerB,
}

/// A (row, col) position. Row 0 is the top, `rows - 1` the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Coordinate { row, col }
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Coordinate { row, col }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    win_length: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty 6x7 board with a win length of 4
    pub fn new() -> Self {
        Self::with_dimensions(ROWS, COLS, WIN_LENGTH)
    }

    /// Create an empty board of the given size. Both dimensions must be
    /// non-zero; `EngineConfig::validate` enforces this for configured boards.
    pub fn with_dimensions(rows: usize, cols: usize, win_length: usize) -> Self {
        Board {
            rows,
            cols,
            win_length,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.cols + col] = cell;
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.cols {
            return true;
        }
        self.get(0, col) != Cell::Empty
    }

    /// Drop a piece in a column, returning where it landed.
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<Coordinate, MoveError> {
        if col >= self.cols {
            return Err(MoveError::InvalidColumn {
                column: col,
                cols: self.cols,
            });
        }

        if self.is_column_full(col) {
            return Err(MoveError::ColumnFull { column: col });
        }

        // Pieces stack from the bottom, so the first empty cell scanning
        // upward is the landing spot.
        let row = (0..self.rows)
            .rev()
            .find(|&row| self.get(row, col) == Cell::Empty)
            .ok_or(MoveError::ColumnFull { column: col })?;
        self.set(row, col, cell);
        Ok(Coordinate::new(row, col))
    }

    /// Remove the topmost piece of a column. Only the search uses this, to
    /// revert its own drops.
    pub(crate) fn lift_piece(&mut self, col: usize) {
        if let Some(row) = (0..self.rows).find(|&row| self.get(row, col) != Cell::Empty) {
            self.set(row, col, Cell::Empty);
        }
    }

    /// Columns that still accept a piece, in ascending order.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.cols)
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| self.is_column_full(col))
    }

    /// Number of occupied cells.
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Rows of the grid, top first.
    pub fn grid(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.cols).map(<[Cell]>::to_vec).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let symbol = match self.get(row, col) {
                    Cell::Empty => '.',
                    Cell::PlayerA => 'X',
                    Cell::PlayerB => 'O',
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
        assert_eq!(board.legal_columns(), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_drop_piece() {
        let mut board = Board::new();

        let pos = board.drop_piece(3, Cell::PlayerA).unwrap();
        assert_eq!(pos, Coordinate::new(5, 3)); // Should land at bottom
        assert_eq!(board.get(5, 3), Cell::PlayerA);

        let pos = board.drop_piece(3, Cell::PlayerB).unwrap();
        assert_eq!(pos, Coordinate::new(4, 3)); // On top of the first piece
        assert_eq!(board.get(4, 3), Cell::PlayerB);
    }

    #[test]
    fn test_every_column_fills_bottom_up_then_rejects() {
        for col in 0..COLS {
            let mut board = Board::new();
            for expected_row in (0..ROWS).rev() {
                let pos = board.drop_piece(col, Cell::PlayerA).unwrap();
                assert_eq!(pos, Coordinate::new(expected_row, col));
            }

            assert!(board.is_column_full(col));
            let before = board.clone();
            assert_eq!(
                board.drop_piece(col, Cell::PlayerB),
                Err(MoveError::ColumnFull { column: col })
            );
            assert_eq!(board, before, "failed insert must not touch the board");
            assert!(!board.legal_columns().contains(&col));
        }
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert_eq!(
            board.drop_piece(7, Cell::PlayerA),
            Err(MoveError::InvalidColumn { column: 7, cols: 7 })
        );
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col, Cell::PlayerA).unwrap();
            }
        }
        assert!(board.is_full());
        assert!(board.legal_columns().is_empty());
        assert_eq!(board.piece_count(), ROWS * COLS);
    }

    #[test]
    fn test_lift_piece_reverts_last_drop() {
        let mut board = Board::new();
        board.drop_piece(2, Cell::PlayerA).unwrap();
        let before = board.clone();
        board.drop_piece(2, Cell::PlayerB).unwrap();
        board.lift_piece(2);
        assert_eq!(board, before);
    }

    #[test]
    fn test_custom_dimensions() {
        let mut board = Board::with_dimensions(3, 4, 3);
        assert_eq!(board.rows(), 3);
        assert_eq!(board.cols(), 4);
        assert_eq!(board.win_length(), 3);
        assert_eq!(board.drop_piece(3, Cell::PlayerB).unwrap(), Coordinate::new(2, 3));
        assert!(board.drop_piece(4, Cell::PlayerB).is_err());
    }

    #[test]
    fn test_display() {
        let mut board = Board::with_dimensions(2, 3, 2);
        board.drop_piece(0, Cell::PlayerA).unwrap();
        board.drop_piece(2, Cell::PlayerB).unwrap();
        assert_eq!(board.to_string(), "...\nX.O\n");
    }
}
