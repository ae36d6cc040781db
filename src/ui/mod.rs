//! Terminal UI: a ratatui front end that plays a session through the public
//! session API, sharing the keyboard between both local players.

mod app;
mod game_view;

pub use app::{App, LOCAL_OPPONENT, LOCAL_PLAYER};
