use rand::Rng;
use tracing::debug;

use crate::game::{has_won, Board, Cell, Side};

use super::difficulty::DifficultySettings;
use super::random::random_legal_column;

const WIN: i32 = 1;
const LOSS: i32 = -1;
const NEUTRAL: i32 = 0;

/// Depth-limited minimax with alpha-beta pruning and a configurable chance
/// of deliberately playing a random column.
///
/// Scores are flat: +1 when the engine's side has a line, -1 when the
/// opponent does, 0 otherwise. Faster wins are not preferred over slower
/// ones. Children are visited in ascending column order and only a strictly
/// better score replaces the current best, so ties go to the lowest column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchEngine {
    depth: usize,
    failure_chance: f64,
}

impl SearchEngine {
    pub fn new(depth: usize, failure_chance: f64) -> Self {
        SearchEngine {
            depth,
            failure_chance: failure_chance.clamp(0.0, 1.0),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn failure_chance(&self) -> f64 {
        self.failure_chance
    }

    /// The column minimax prefers for `side`, without the failure roll.
    /// `None` at depth 0 or when no column is legal.
    pub fn best_column(&self, board: &Board, side: Side) -> Option<usize> {
        if self.depth == 0 {
            return None;
        }
        let search = Search {
            max_cell: side.to_cell(),
            min_cell: side.other().to_cell(),
        };
        // One working copy, mutated and reverted in place during the walk.
        let mut work = board.clone();
        let (column, score) = search.minimax(&mut work, self.depth, true, i32::MIN, i32::MAX);
        debug!(?column, score, depth = self.depth, "minimax finished");
        column
    }

    /// Column to play for `side`. Falls back to a random legal column when
    /// the failure roll hits or the search has no answer. `None` only when
    /// the board is full.
    pub fn recommend<R: Rng + ?Sized>(&self, board: &Board, side: Side, rng: &mut R) -> Option<usize> {
        match self.best_column(board, side) {
            Some(column) if !rng.random_bool(self.failure_chance) => Some(column),
            best => {
                let fallback = random_legal_column(board, rng);
                debug!(?best, ?fallback, "playing a random column instead");
                fallback
            }
        }
    }
}

impl From<DifficultySettings> for SearchEngine {
    fn from(settings: DifficultySettings) -> Self {
        SearchEngine::new(settings.depth, settings.failure_chance)
    }
}

/// Convenience wrapper around [`SearchEngine::recommend`].
pub fn recommend<R: Rng + ?Sized>(
    board: &Board,
    side: Side,
    depth: usize,
    failure_chance: f64,
    rng: &mut R,
) -> Option<usize> {
    SearchEngine::new(depth, failure_chance).recommend(board, side, rng)
}

struct Search {
    max_cell: Cell,
    min_cell: Cell,
}

impl Search {
    fn minimax(
        &self,
        board: &mut Board,
        depth: usize,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> (Option<usize>, i32) {
        if has_won(board, self.max_cell) {
            return (None, WIN);
        }
        if has_won(board, self.min_cell) {
            return (None, LOSS);
        }
        let legal = board.legal_columns();
        if depth == 0 || legal.is_empty() {
            return (None, NEUTRAL);
        }

        let cell = if maximizing { self.max_cell } else { self.min_cell };
        let mut best_column = None;
        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };

        for column in legal {
            if board.drop_piece(column, cell).is_err() {
                continue;
            }
            let (_, score) = self.minimax(board, depth - 1, !maximizing, alpha, beta);
            board.lift_piece(column);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_column = Some(column);
                }
                if best_score >= beta {
                    break;
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_column = Some(column);
                }
                if best_score <= alpha {
                    break;
                }
                beta = beta.min(best_score);
            }
        }

        (best_column, best_score)
    }
}
