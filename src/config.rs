use std::path::Path;

use tracing::warn;

use crate::ai::{Difficulty, DifficultyTable};
use crate::error::ConfigError;
use crate::game::{Board, COLS, ROWS, WIN_LENGTH};

/// Board geometry shared by every session of a registry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    pub win_length: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            rows: ROWS,
            cols: COLS,
            win_length: WIN_LENGTH,
        }
    }
}

impl BoardConfig {
    pub fn new_board(&self) -> Board {
        Board::with_dimensions(self.rows, self.cols, self.win_length)
    }
}

/// Top-level engine configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board: BoardConfig,
    pub difficulty: DifficultyTable,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let board = &self.board;
        if board.rows == 0 {
            return Err(ConfigError::Validation("board.rows must be >= 1".into()));
        }
        if board.cols == 0 {
            return Err(ConfigError::Validation("board.cols must be >= 1".into()));
        }
        if board.win_length < 2 {
            return Err(ConfigError::Validation(
                "board.win_length must be >= 2".into(),
            ));
        }
        if board.win_length > board.rows.max(board.cols) {
            return Err(ConfigError::Validation(
                "board.win_length must fit on the board".into(),
            ));
        }

        for difficulty in Difficulty::ALL {
            let chance = self.difficulty.settings(difficulty).failure_chance;
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::Validation(format!(
                    "difficulty.{}.failure_chance must be in [0, 1]",
                    difficulty_key(difficulty)
                )));
            }
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&EngineConfig::default()).unwrap_or_default()
    }
}

fn difficulty_key(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::VeryEasy => "very_easy",
        Difficulty::Easy => "easy",
        Difficulty::Normal => "normal",
        Difficulty::Hard => "hard",
        Difficulty::VeryHard => "very_hard",
        Difficulty::Impossible => "impossible",
    }
}
