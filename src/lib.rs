//! # Connect Four
//!
//! A turn-based Connect Four engine: gravity board, single-pass win-line
//! detection, a minimax opponent with tunable (and deliberately fallible)
//! difficulty, and async game sessions that keep one live game per player.
//!
//! ## Modules
//!
//! - [`game`]: Board, sides and participants, win detection, turn states
//! - [`ai`]: Difficulty tiers and the minimax search engine
//! - [`session`]: Session state machine, registry, cursor controls, views
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types
//! - [`ui`]: Terminal front end built with Ratatui

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod ui;
