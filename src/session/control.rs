use std::str::FromStr;

/// Cursor movement requested by a player before committing a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    LeftFull,
    LeftOne,
    RightOne,
    RightFull,
}

impl CursorMove {
    /// New cursor position, clamped to `0..cols`.
    pub fn apply(self, position: usize, cols: usize) -> usize {
        let last = cols.saturating_sub(1);
        match self {
            CursorMove::LeftFull => 0,
            CursorMove::LeftOne => position.saturating_sub(1),
            CursorMove::RightOne => (position + 1).min(last),
            CursorMove::RightFull => last,
        }
    }
}

/// One button press as delivered by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Cursor(CursorMove),
    /// Drop at the acting side's cursor.
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown control action '{0}'")]
pub struct ParseActionError(String);

impl FromStr for ControlAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "left_full" => ControlAction::Cursor(CursorMove::LeftFull),
            "left_one" => ControlAction::Cursor(CursorMove::LeftOne),
            "submit" => ControlAction::Submit,
            "right_one" => ControlAction::Cursor(CursorMove::RightOne),
            "right_full" => ControlAction::Cursor(CursorMove::RightFull),
            other => return Err(ParseActionError(other.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_moves_clamp_to_board() {
        assert_eq!(CursorMove::LeftFull.apply(4, 7), 0);
        assert_eq!(CursorMove::LeftOne.apply(0, 7), 0);
        assert_eq!(CursorMove::LeftOne.apply(3, 7), 2);
        assert_eq!(CursorMove::RightOne.apply(6, 7), 6);
        assert_eq!(CursorMove::RightOne.apply(3, 7), 4);
        assert_eq!(CursorMove::RightFull.apply(0, 7), 6);
    }

    #[test]
    fn parses_transport_action_names() {
        assert_eq!(
            "left_full".parse::<ControlAction>().unwrap(),
            ControlAction::Cursor(CursorMove::LeftFull)
        );
        assert_eq!("submit".parse::<ControlAction>().unwrap(), ControlAction::Submit);
        assert_eq!(
            "right_one".parse::<ControlAction>().unwrap(),
            ControlAction::Cursor(CursorMove::RightOne)
        );
        let err = "jump".parse::<ControlAction>().unwrap_err();
        assert_eq!(err.to_string(), "unknown control action 'jump'");
    }
}
