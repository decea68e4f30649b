//! The fixed set of games and their presentation metadata.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    MemoryMatrix,
    WordFlex,
    LogicRush,
    SpeedMatch,
}

impl GameId {
    pub fn all() -> &'static [GameId] {
        &[
            GameId::MemoryMatrix,
            GameId::WordFlex,
            GameId::LogicRush,
            GameId::SpeedMatch,
        ]
    }

    /// Storage key; also the wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            GameId::MemoryMatrix => "memory-matrix",
            GameId::WordFlex => "word-flex",
            GameId::LogicRush => "logic-rush",
            GameId::SpeedMatch => "speed-match",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|g| g.as_str() == key)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GameId::MemoryMatrix => "Memory Matrix",
            GameId::WordFlex => "Word Flex",
            GameId::LogicRush => "Logic Rush",
            GameId::SpeedMatch => "Speed Match",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GameId::MemoryMatrix => {
                "Memorize and repeat light-up patterns. Trains visual working memory."
            }
            GameId::WordFlex => "Unscramble the hidden word fast. Trains verbal fluency.",
            GameId::LogicRush => "Spot the rule in number sequences. Trains reasoning.",
            GameId::SpeedMatch => "Decide quickly if two symbols match. Trains focus & reflexes.",
        }
    }

    pub fn accent(self) -> &'static str {
        match self {
            GameId::MemoryMatrix => "sky",
            GameId::WordFlex => "fuchsia",
            GameId::LogicRush => "emerald",
            GameId::SpeedMatch => "amber",
        }
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameInfo {
    pub id: GameId,
    pub display_name: &'static str,
    pub description: &'static str,
    pub accent: &'static str,
}

pub fn list_games() -> Vec<GameInfo> {
    GameId::all()
        .iter()
        .map(|&id| GameInfo {
            id,
            display_name: id.display_name(),
            description: id.description(),
            accent: id.accent(),
        })
        .collect()
}
