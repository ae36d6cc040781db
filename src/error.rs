use std::path::PathBuf;
use std::sync::Arc;

use crate::game::ActorId;
use crate::session::GameSession;

/// Errors from dropping a piece onto the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is already full")]
    ColumnFull { column: usize },

    #[error("column {column} is outside the board (0..{cols})")]
    InvalidColumn { column: usize, cols: usize },
}

/// Errors reported back to the actor driving a session. None of them leave
/// the session in a changed state.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("not your turn")]
    NotYourTurn,

    #[error("you cannot play against yourself")]
    CannotPlaySelf,

    #[error("actor {} already has a game in progress", .0.initiator())]
    SessionAlreadyExists(Arc<GameSession>),

    #[error("no game in progress for actor {0}; start a new one")]
    SessionNotFound(ActorId),

    #[error("the game is already over")]
    GameOver,

    #[error("only the player who started the game can end it")]
    NotInitiator,
}

impl SessionError {
    /// The live session an actor should be redirected to, if any.
    pub fn existing_session(&self) -> Option<&Arc<GameSession>> {
        match self {
            SessionError::SessionAlreadyExists(session) => Some(session),
            _ => None,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
