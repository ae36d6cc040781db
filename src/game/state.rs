use super::win::WinningLine;
use super::Side;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    InProgress,
    Won { side: Side, line: WinningLine },
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            GameOutcome::Won { side, .. } => Some(*side),
            _ => None,
        }
    }

    pub fn winning_line(&self) -> Option<&WinningLine> {
        match self {
            GameOutcome::Won { line, .. } => Some(line),
            _ => None,
        }
    }
}

/// Where a session is in its turn cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnState {
    /// Human-vs-human game where side B is to move but nobody has claimed it.
    AwaitingSecondPlayer,
    TurnOf(Side),
    /// `next` is the side that would have moved had the game continued.
    Finished { outcome: GameOutcome, next: Side },
    /// Force-terminated by the initiator.
    Cancelled,
}

impl TurnState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Finished { .. } | TurnState::Cancelled)
    }

    /// The side whose move it is (or would be, once the game ended).
    pub fn side_to_move(&self) -> Option<Side> {
        match self {
            TurnState::AwaitingSecondPlayer => Some(Side::B),
            TurnState::TurnOf(side) => Some(*side),
            TurnState::Finished { next, .. } => Some(*next),
            TurnState::Cancelled => None,
        }
    }

    pub fn outcome(&self) -> GameOutcome {
        match self {
            TurnState::Finished { outcome, .. } => outcome.clone(),
            _ => GameOutcome::InProgress,
        }
    }
}
