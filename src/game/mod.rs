//! Core Connect Four game logic: board representation, sides and
//! participants, win-line detection, and the turn state machine types.

mod board;
mod player;
mod state;
pub mod win;

pub use board::{Board, Cell, Coordinate, COLS, ROWS, WIN_LENGTH};
pub use player::{ActorId, Participant, Side};
pub use state::{GameOutcome, TurnState};
pub use win::{find_winning_line, has_won, Direction, WinningLine};
