//! Game records: a setup plus an ordered action list

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::game::{Action, GameResult, GameState};
use crate::setup::Setup;

/// Stored game, replayable from its setup
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub setup: Setup,
    #[serde(default)]
    pub config: GameConfig,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// One applied ply
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Ply {
    pub number: u32,
    pub action: Action,
    pub result: GameResult,
}

/// Result of replaying a record
#[derive(Clone, Debug)]
pub struct Replay {
    pub state: GameState,
    pub plies: Vec<Ply>,
    /// Actions left unplayed because the game ended first
    pub skipped: usize,
}

impl GameRecord {
    pub fn new(setup: Setup, config: GameConfig) -> Self {
        Self {
            setup,
            config,
            actions: Vec::new(),
        }
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read record {}", path.display()))?;
        let record = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse record {}", path.display()))?;
        Ok(record)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Play the actions in order until they run out or the game ends
    pub fn replay(&self) -> Replay {
        let mut state = GameState::from_setup(&self.setup, self.config);
        let mut plies = Vec::with_capacity(self.actions.len());

        for (i, &action) in self.actions.iter().enumerate() {
            let result = state.apply_action(action);
            plies.push(Ply {
                number: i as u32 + 1,
                action,
                result,
            });

            if result.is_terminal() {
                let skipped = self.actions.len() - i - 1;
                if skipped > 0 {
                    tracing::warn!("Game ended at ply {}, ignoring {} trailing actions", i + 1, skipped);
                }
                return Replay { state, plies, skipped };
            }
        }

        Replay {
            state,
            plies,
            skipped: 0,
        }
    }
}
