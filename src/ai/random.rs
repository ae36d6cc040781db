use rand::seq::IndexedRandom;
use rand::Rng;

use crate::game::Board;

/// Pick a legal column uniformly at random. `None` once the board is full.
pub fn random_legal_column<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    board.legal_columns().choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, COLS, ROWS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn selects_legal_columns_only() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::new();
        for _ in 0..ROWS {
            board.drop_piece(2, Cell::PlayerA).unwrap();
            board.drop_piece(5, Cell::PlayerB).unwrap();
        }

        for _ in 0..100 {
            let col = random_legal_column(&board, &mut rng).unwrap();
            assert!(col != 2 && col != 5, "column {col} is full");
        }
    }

    #[test]
    fn covers_every_legal_column() {
        let mut rng = StdRng::seed_from_u64(11);
        let board = Board::new();
        let mut seen = [false; COLS];
        for _ in 0..500 {
            seen[random_legal_column(&board, &mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn full_board_has_no_column() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col, Cell::PlayerA).unwrap();
            }
        }
        assert_eq!(random_legal_column(&board, &mut rng), None);
    }
}
