use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named difficulty tiers offered to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    #[default]
    Normal,
    Hard,
    VeryHard,
    Impossible,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::VeryHard,
        Difficulty::Impossible,
    ];

    /// Numeric level, which doubles as the default search depth.
    pub fn level(self) -> usize {
        match self {
            Difficulty::VeryEasy => 0,
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
            Difficulty::VeryHard => 5,
            Difficulty::Impossible => 7,
        }
    }

    pub fn from_level(level: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.level() == level)
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Very Easy",
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::VeryHard => "Very Hard",
            Difficulty::Impossible => "Impossible",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty '{0}'")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    /// Accepts tier names in any case with spaces, dashes or underscores
    /// ("very hard", "very-hard", "VERY_HARD") or the numeric level.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(level) = s.trim().parse::<usize>() {
            return Difficulty::from_level(level).ok_or_else(|| ParseDifficultyError(s.to_string()));
        }
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().replace(' ', "").to_lowercase() == normalized)
            .ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}

/// Search parameters for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Plies the minimax looks ahead. Zero disables the search entirely.
    pub depth: usize,
    /// Probability in [0, 1] of discarding the search result for a random
    /// legal column.
    pub failure_chance: f64,
}

/// Difficulty tier to search parameters. The failure chances are tuned by
/// hand, not derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub very_easy: DifficultySettings,
    pub easy: DifficultySettings,
    pub normal: DifficultySettings,
    pub hard: DifficultySettings,
    pub very_hard: DifficultySettings,
    pub impossible: DifficultySettings,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        let tier = |d: Difficulty, failure_chance| DifficultySettings {
            depth: d.level(),
            failure_chance,
        };
        DifficultyTable {
            very_easy: tier(Difficulty::VeryEasy, 0.0),
            easy: tier(Difficulty::Easy, 0.2),
            normal: tier(Difficulty::Normal, 0.15),
            hard: tier(Difficulty::Hard, 0.1),
            very_hard: tier(Difficulty::VeryHard, 0.0),
            impossible: tier(Difficulty::Impossible, 0.0),
        }
    }
}

impl DifficultyTable {
    pub fn settings(&self, difficulty: Difficulty) -> DifficultySettings {
        match difficulty {
            Difficulty::VeryEasy => self.very_easy,
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
            Difficulty::VeryHard => self.very_hard,
            Difficulty::Impossible => self.impossible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_tuned_thresholds() {
        let table = DifficultyTable::default();
        let expected = [
            (Difficulty::VeryEasy, 0, 0.0),
            (Difficulty::Easy, 1, 0.2),
            (Difficulty::Normal, 2, 0.15),
            (Difficulty::Hard, 3, 0.1),
            (Difficulty::VeryHard, 5, 0.0),
            (Difficulty::Impossible, 7, 0.0),
        ];
        for (difficulty, depth, chance) in expected {
            let settings = table.settings(difficulty);
            assert_eq!(settings.depth, depth, "{difficulty}");
            assert!((settings.failure_chance - chance).abs() < 1e-12, "{difficulty}");
        }
    }

    #[test]
    fn parses_names_and_levels() {
        assert_eq!("normal".parse::<Difficulty>().unwrap(), Difficulty::Normal);
        assert_eq!("Very Hard".parse::<Difficulty>().unwrap(), Difficulty::VeryHard);
        assert_eq!("very-easy".parse::<Difficulty>().unwrap(), Difficulty::VeryEasy);
        assert_eq!("IMPOSSIBLE".parse::<Difficulty>().unwrap(), Difficulty::Impossible);
        assert_eq!("5".parse::<Difficulty>().unwrap(), Difficulty::VeryHard);
        assert!("4".parse::<Difficulty>().is_err());
        assert!("brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(Difficulty::default(), Difficulty::Normal);
    }
}
