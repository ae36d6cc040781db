//! Game sessions: the turn state machine, the per-initiator registry, cursor
//! controls and the snapshots handed to the presentation layer.

mod control;
mod game;
mod registry;
mod view;

use dashmap::DashMap;
use std::sync::Arc;

use crate::ai::Difficulty;
use crate::game::ActorId;

pub use control::{ControlAction, CursorMove, ParseActionError};
pub use game::GameSession;
pub use registry::SessionRegistry;
pub use view::SessionView;

pub type SessionId = u64;

pub(crate) type SessionMap = DashMap<ActorId, Arc<GameSession>>;

/// Who side B is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    VsComputer(Difficulty),
    VsHuman,
}
