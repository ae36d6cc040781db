//! Computer opponent: difficulty tiers, the minimax search and the random
//! fallback it uses to play deliberately imperfect moves.

pub mod difficulty;
mod minimax;
mod random;

pub use difficulty::{Difficulty, DifficultySettings, DifficultyTable, ParseDifficultyError};
pub use minimax::{recommend, SearchEngine};
pub use random::random_legal_column;
