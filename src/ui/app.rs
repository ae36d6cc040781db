use std::io;
use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tokio::runtime::Runtime;

use crate::error::SessionError;
use crate::game::{ActorId, GameOutcome, Side};
use crate::session::{
    ControlAction, CursorMove, GameMode, GameSession, SessionRegistry, SessionView,
};

/// The player at the keyboard.
pub const LOCAL_PLAYER: ActorId = ActorId(1);
/// The second player sharing the keyboard in human-vs-human games.
pub const LOCAL_OPPONENT: ActorId = ActorId(2);

pub struct App {
    runtime: Runtime,
    registry: SessionRegistry,
    mode: GameMode,
    session: Arc<GameSession>,
    view: SessionView,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(registry: SessionRegistry, mode: GameMode) -> io::Result<Self> {
        let runtime = Runtime::new()?;
        let (session, view) = runtime
            .block_on(start_session(&registry, mode))
            .map_err(io::Error::other)?;
        Ok(App {
            runtime,
            registry,
            mode,
            session,
            view,
            should_quit: false,
            message: None,
        })
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal
                .draw(|f| self.render(f))
                .map_err(|e| io::Error::other(e.to_string()))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => self.act(ControlAction::Cursor(CursorMove::LeftOne)),
            KeyCode::Right => self.act(ControlAction::Cursor(CursorMove::RightOne)),
            KeyCode::Home => self.act(ControlAction::Cursor(CursorMove::LeftFull)),
            KeyCode::End => self.act(ControlAction::Cursor(CursorMove::RightFull)),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => self.act(ControlAction::Submit),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let column = c as usize - '1' as usize;
                self.drop_at(column);
            }
            KeyCode::Char('r') => self.restart(),
            _ => {}
        }
    }

    /// Whoever is to move acts; both humans share the keyboard.
    fn current_actor(&self) -> ActorId {
        match (self.mode, self.view.side_to_move()) {
            (GameMode::VsHuman, Some(Side::B)) => LOCAL_OPPONENT,
            _ => LOCAL_PLAYER,
        }
    }

    fn act(&mut self, action: ControlAction) {
        let actor = self.current_actor();
        let result = self
            .runtime
            .block_on(self.session.handle_action(actor, action));
        self.apply(result);
    }

    fn drop_at(&mut self, column: usize) {
        let actor = self.current_actor();
        let result = self.runtime.block_on(self.session.submit_move(actor, column));
        self.apply(result);
    }

    fn apply(&mut self, result: Result<SessionView, SessionError>) {
        match result {
            Ok(view) => {
                if view.is_finished() {
                    self.message = Some(match view.outcome() {
                        GameOutcome::Won { .. } => format!("{} Press 'r' to play again.", view.status()),
                        _ => "It's a draw! Press 'r' to play again.".to_string(),
                    });
                }
                self.view = view;
            }
            Err(SessionError::GameOver) => {
                self.message = Some("Game over! Press 'r' to restart.".to_string());
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    fn restart(&mut self) {
        if !self.view.is_finished() {
            match self.runtime.block_on(self.session.delete_session(LOCAL_PLAYER)) {
                // Ended since the last snapshot; nothing left to cancel.
                Ok(_) | Err(SessionError::GameOver) => {}
                Err(err) => {
                    self.message = Some(format!("Could not end the current game: {err}"));
                    return;
                }
            }
        }
        match self.runtime.block_on(start_session(&self.registry, self.mode)) {
            Ok((session, view)) => {
                self.session = session;
                self.view = view;
                self.message = Some("New game started!".to_string());
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, &self.view, &self.message);
    }
}

async fn start_session(
    registry: &SessionRegistry,
    mode: GameMode,
) -> Result<(Arc<GameSession>, SessionView), SessionError> {
    let session = registry.create_session(LOCAL_PLAYER, mode).await?;
    let view = session.view().await;
    Ok((session, view))
}
