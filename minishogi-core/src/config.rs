//! Game configuration

use serde::{Deserialize, Serialize};

/// Default ply ceiling before a game is declared a draw
pub const DEFAULT_MAX_PLIES: u32 = 400;

/// Per-game settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of applied plies after which an undecided game is drawn
    pub max_plies: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_plies: DEFAULT_MAX_PLIES,
        }
    }
}

impl GameConfig {
    /// Config with a custom ply ceiling
    pub fn with_max_plies(mut self, max_plies: u32) -> Self {
        self.max_plies = max_plies;
        self
    }
}
