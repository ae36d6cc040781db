use std::fmt;
use std::sync::Weak;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::ai::SearchEngine;
use crate::error::SessionError;
use crate::game::{
    find_winning_line, ActorId, Board, Coordinate, GameOutcome, Participant, Side, TurnState,
};

use super::control::{ControlAction, CursorMove};
use super::view::SessionView;
use super::{GameMode, SessionId, SessionMap};

/// One game between the initiator (side A) and either the computer or a
/// second human (side B).
///
/// Every public operation takes the session lock for its whole duration,
/// including the computer's reply, so concurrent events for the same session
/// are applied one at a time.
pub struct GameSession {
    id: SessionId,
    initiator: ActorId,
    mode: GameMode,
    computer: Option<SearchEngine>,
    registry: Weak<SessionMap>,
    inner: Mutex<SessionInner>,
}

struct SessionInner {
    board: Board,
    state: TurnState,
    opponent: Option<Participant>,
    cursors: [usize; 2],
    last_move: Option<Coordinate>,
    rng: StdRng,
}

impl GameSession {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: SessionId,
        initiator: ActorId,
        mode: GameMode,
        computer: Option<SearchEngine>,
        board: Board,
        first: Side,
        rng: StdRng,
        registry: Weak<SessionMap>,
    ) -> Self {
        let opponent = computer.map(|_| Participant::Computer);
        let state = match (first, opponent) {
            (Side::B, None) => TurnState::AwaitingSecondPlayer,
            (side, _) => TurnState::TurnOf(side),
        };
        let middle = board.cols() / 2;
        GameSession {
            id,
            initiator,
            mode,
            computer,
            registry,
            inner: Mutex::new(SessionInner {
                board,
                state,
                opponent,
                cursors: [middle; 2],
                last_move: None,
                rng,
            }),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn initiator(&self) -> ActorId {
        self.initiator
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Current snapshot.
    pub async fn view(&self) -> SessionView {
        let inner = self.inner.lock().await;
        self.capture(&inner)
    }

    /// Move the acting side's cursor. Never touches the board.
    pub async fn adjust_cursor(
        &self,
        actor: ActorId,
        direction: CursorMove,
    ) -> Result<SessionView, SessionError> {
        let mut inner = self.inner.lock().await;
        let joining = inner.opponent.is_none();
        let side = self.claim_turn(&mut inner, actor)?;
        if joining && side == Side::B {
            info!(session = self.id, %actor, "second player joined");
        }
        let cols = inner.board.cols();
        let cursor = &mut inner.cursors[side.index()];
        *cursor = direction.apply(*cursor, cols);
        Ok(self.capture(&inner))
    }

    /// Drop a piece for `actor` into `column`, then let the computer answer
    /// if it is now its turn.
    pub async fn submit_move(
        &self,
        actor: ActorId,
        column: usize,
    ) -> Result<SessionView, SessionError> {
        self.submit(actor, Some(column)).await
    }

    /// Drop a piece at the acting side's cursor.
    pub async fn submit_cursor(&self, actor: ActorId) -> Result<SessionView, SessionError> {
        self.submit(actor, None).await
    }

    /// Dispatch a transport button press.
    pub async fn handle_action(
        &self,
        actor: ActorId,
        action: ControlAction,
    ) -> Result<SessionView, SessionError> {
        match action {
            ControlAction::Cursor(direction) => self.adjust_cursor(actor, direction).await,
            ControlAction::Submit => self.submit_cursor(actor).await,
        }
    }

    /// Force-terminate the game. Only the initiator may do this, and only
    /// while the game is still running.
    pub async fn delete_session(&self, actor: ActorId) -> Result<SessionView, SessionError> {
        let mut inner = self.inner.lock().await;
        if actor != self.initiator {
            warn!(session = self.id, %actor, "delete rejected: not the initiator");
            return Err(SessionError::NotInitiator);
        }
        if inner.state.is_terminal() {
            return Err(SessionError::GameOver);
        }
        inner.state = TurnState::Cancelled;
        self.unregister();
        info!(session = self.id, initiator = %self.initiator, "game cancelled");
        Ok(self.capture(&inner))
    }

    /// Let the computer open the game if the draw gave it the first move.
    pub(crate) async fn play_opening(&self) {
        let mut inner = self.inner.lock().await;
        self.play_computer_turns(&mut inner).await;
    }

    /// Resolve which side `actor` plays right now, binding a second human on
    /// their first interaction.
    fn claim_turn(&self, inner: &mut SessionInner, actor: ActorId) -> Result<Side, SessionError> {
        let claimed = match inner.state {
            TurnState::Finished { .. } | TurnState::Cancelled => Err(SessionError::GameOver),
            TurnState::TurnOf(Side::A) if actor == self.initiator => Ok(Side::A),
            TurnState::TurnOf(Side::A) => Err(SessionError::NotYourTurn),
            TurnState::TurnOf(Side::B) => match inner.opponent {
                Some(opponent) if opponent.is(actor) => Ok(Side::B),
                _ => Err(SessionError::NotYourTurn),
            },
            TurnState::AwaitingSecondPlayer if actor == self.initiator => {
                Err(SessionError::CannotPlaySelf)
            }
            TurnState::AwaitingSecondPlayer => {
                inner.opponent = Some(Participant::Human(actor));
                inner.state = TurnState::TurnOf(Side::B);
                Ok(Side::B)
            }
        };
        if let Err(err) = &claimed {
            warn!(session = self.id, %actor, %err, "action rejected");
        }
        claimed
    }

    async fn submit(
        &self,
        actor: ActorId,
        column: Option<usize>,
    ) -> Result<SessionView, SessionError> {
        let mut inner = self.inner.lock().await;
        let before = (inner.state.clone(), inner.opponent);
        let side = self.claim_turn(&mut inner, actor)?;
        let column = column.unwrap_or(inner.cursors[side.index()]);

        if let Err(err) = self.apply_move(&mut inner, side, column) {
            // A rejected drop must not leave a half-joined second player behind.
            (inner.state, inner.opponent) = before;
            warn!(session = self.id, %side, column, %err, "move rejected");
            return Err(err);
        }
        if before.1.is_none() && side == Side::B {
            info!(session = self.id, %actor, "second player joined");
        }
        self.play_computer_turns(&mut inner).await;
        Ok(self.capture(&inner))
    }

    /// Insert, detect the outcome and hand the turn over. The side to move
    /// flips even when the game ends.
    fn apply_move(
        &self,
        inner: &mut SessionInner,
        side: Side,
        column: usize,
    ) -> Result<(), SessionError> {
        let landed = inner.board.drop_piece(column, side.to_cell())?;
        inner.last_move = Some(landed);
        debug!(session = self.id, %side, %landed, "piece dropped");

        let outcome = match find_winning_line(&inner.board, side.to_cell()) {
            Some(line) => GameOutcome::Won { side, line },
            None if inner.board.legal_columns().is_empty() => GameOutcome::Draw,
            None => GameOutcome::InProgress,
        };

        let next = side.other();
        inner.state = if outcome.is_terminal() {
            TurnState::Finished { outcome, next }
        } else if next == Side::B && inner.opponent.is_none() {
            TurnState::AwaitingSecondPlayer
        } else {
            TurnState::TurnOf(next)
        };

        if let TurnState::Finished { outcome, .. } = &inner.state {
            info!(session = self.id, winner = ?outcome.winner(), "game finished");
            self.unregister();
        }
        Ok(())
    }

    /// Play the computer's moves while it is side B's turn. The search runs
    /// on the blocking pool and is awaited with the session lock held.
    async fn play_computer_turns(&self, inner: &mut SessionInner) {
        let Some(engine) = self.computer else {
            return;
        };
        while inner.state == TurnState::TurnOf(Side::B) {
            let board = inner.board.clone();
            let mut rng = StdRng::from_rng(&mut inner.rng);
            let search =
                tokio::task::spawn_blocking(move || engine.recommend(&board, Side::B, &mut rng));
            let column = match search.await {
                Ok(Some(column)) => column,
                Ok(None) => return,
                Err(err) => {
                    error!(session = self.id, %err, "search worker failed");
                    return;
                }
            };
            debug!(session = self.id, column, "computer chose a column");
            if let Err(err) = self.apply_move(inner, Side::B, column) {
                error!(session = self.id, column, %err, "computer move rejected");
                return;
            }
        }
    }

    fn unregister(&self) {
        if let Some(sessions) = self.registry.upgrade() {
            sessions.remove_if(&self.initiator, |_, session| session.id == self.id);
        }
    }

    fn capture(&self, inner: &SessionInner) -> SessionView {
        SessionView {
            session_id: self.id,
            mode: self.mode,
            initiator: self.initiator,
            opponent: inner.opponent,
            grid: inner.board.grid(),
            state: inner.state.clone(),
            cursors: inner.cursors,
            last_move: inner.last_move,
        }
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("initiator", &self.initiator)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl PartialEq for GameSession {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GameSession {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;
    use std::io;
    use std::sync::Arc;

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn session(first: Side, computer: Option<SearchEngine>) -> GameSession {
        let mode = match computer {
            Some(_) => GameMode::VsComputer(crate::ai::Difficulty::Impossible),
            None => GameMode::VsHuman,
        };
        GameSession::new(
            1,
            ActorId(1),
            mode,
            computer,
            Board::new(),
            first,
            StdRng::seed_from_u64(0),
            Weak::new(),
        )
    }

    #[tokio::test]
    async fn initial_state_follows_first_side_and_mode() {
        let s = session(Side::B, None);
        assert_eq!(s.view().await.state, TurnState::AwaitingSecondPlayer);

        let s = session(Side::A, None);
        assert_eq!(s.view().await.state, TurnState::TurnOf(Side::A));

        let s = session(Side::B, Some(SearchEngine::new(2, 0.0)));
        let view = s.view().await;
        assert_eq!(view.state, TurnState::TurnOf(Side::B));
        assert_eq!(view.opponent, Some(Participant::Computer));
        assert_eq!(view.cursors, [3, 3]);
    }

    #[tokio::test]
    async fn cursor_moves_without_touching_board() {
        let s = session(Side::A, None);
        let view = s.adjust_cursor(ActorId(1), CursorMove::RightFull).await.unwrap();
        assert_eq!(view.cursor(Side::A), 6);
        assert_eq!(view.cursor(Side::B), 3);
        assert!(view.grid.iter().flatten().all(|&c| c == Cell::Empty));
    }

    #[tokio::test]
    async fn submit_cursor_drops_at_cursor() {
        let s = session(Side::A, None);
        s.adjust_cursor(ActorId(1), CursorMove::LeftOne).await.unwrap();
        let view = s.submit_cursor(ActorId(1)).await.unwrap();
        assert_eq!(view.cell(5, 2), Some(Cell::PlayerA));
        assert_eq!(view.last_move, Some(Coordinate::new(5, 2)));
    }

    #[tokio::test]
    async fn opening_move_is_played_by_computer() {
        let s = session(Side::B, Some(SearchEngine::new(1, 0.0)));
        s.play_opening().await;
        let view = s.view().await;
        assert_eq!(view.state, TurnState::TurnOf(Side::A));
        assert_eq!(view.grid.iter().flatten().filter(|&&c| c == Cell::PlayerB).count(), 1);
    }

    #[tokio::test]
    async fn unregistered_session_still_finishes() {
        // A session without a registry behind it must not fail on teardown.
        let s = session(Side::A, None);
        s.delete_session(ActorId(1)).await.unwrap();
        assert_eq!(s.view().await.state, TurnState::Cancelled);
    }

    #[tokio::test]
    async fn join_is_logged_only_once_the_move_lands() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let s = session(Side::B, None);
        s.submit_move(ActorId(2), 9).await.unwrap_err();
        assert!(!logs.contents().contains("second player joined"));
        assert_eq!(s.view().await.opponent, None);

        s.submit_move(ActorId(2), 0).await.unwrap();
        assert!(logs.contents().contains("second player joined"));
    }

    #[tokio::test]
    async fn joining_by_cursor_binds_the_player() {
        let s = session(Side::B, None);
        let view = s.adjust_cursor(ActorId(2), CursorMove::LeftFull).await.unwrap();
        assert_eq!(view.opponent, Some(Participant::Human(ActorId(2))));
        assert_eq!(view.cursor(Side::B), 0);
    }
}
