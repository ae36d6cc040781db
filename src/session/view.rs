use crate::game::{ActorId, Cell, Coordinate, GameOutcome, Participant, Side, TurnState};

use super::{GameMode, SessionId};

/// Read-only snapshot of a session, handed to the presentation layer after
/// every call.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub session_id: SessionId,
    pub mode: GameMode,
    pub initiator: ActorId,
    /// Side B, once known.
    pub opponent: Option<Participant>,
    /// Rows of the board, top first.
    pub grid: Vec<Vec<Cell>>,
    pub state: TurnState,
    pub cursors: [usize; 2],
    pub last_move: Option<Coordinate>,
}

impl SessionView {
    /// `None` outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.grid.get(row)?.get(col).copied()
    }

    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn cols(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    pub fn participant(&self, side: Side) -> Option<Participant> {
        match side {
            Side::A => Some(Participant::Human(self.initiator)),
            Side::B => self.opponent,
        }
    }

    /// Side to move, or the side that would have moved once the game ended.
    pub fn side_to_move(&self) -> Option<Side> {
        self.state.side_to_move()
    }

    pub fn cursor(&self, side: Side) -> usize {
        self.cursors[side.index()]
    }

    pub fn outcome(&self) -> GameOutcome {
        self.state.outcome()
    }

    pub fn winning_line(&self) -> Option<Vec<Coordinate>> {
        self.outcome().winning_line().map(|line| line.cells.clone())
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Short status line, e.g. for a footer.
    pub fn status(&self) -> String {
        let name = |side: Side| match self.participant(side) {
            Some(p) => p.to_string(),
            None => "Waiting for player...".to_string(),
        };
        match &self.state {
            TurnState::AwaitingSecondPlayer => "Waiting for player...".to_string(),
            TurnState::TurnOf(side) => match self.participant(*side) {
                Some(Participant::Computer) => "Computer is thinking...".to_string(),
                _ => format!("{}'s turn", name(*side)),
            },
            TurnState::Finished {
                outcome: GameOutcome::Won { side, .. },
                ..
            } => format!("{} won!", name(*side)),
            TurnState::Finished { .. } => "Game Over! Nobody won".to_string(),
            TurnState::Cancelled => "Game cancelled".to_string(),
        }
    }
}
