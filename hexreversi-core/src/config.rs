//! GameConfig - board and player setup

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{Shape, Topology};
use crate::error::Result;
use crate::game::{Game, Tile};
use crate::strategy::StrategyKind;

/// Board shape, size and the strategy playing each color. Fields missing
/// from a JSON file take their default values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub shape: Shape,
    pub size: usize,
    pub black: StrategyKind,
    pub white: StrategyKind,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            shape: Shape::Hex,
            size: 4,
            black: StrategyKind::Combo,
            white: StrategyKind::HighScore,
        }
    }
}

impl GameConfig {
    /// Check the board parameters without building a game
    pub fn topology(&self) -> Result<Topology> {
        Topology::new(self.shape, self.size)
    }

    /// Seeded game for this board
    pub fn new_game(&self) -> Result<Game> {
        Ok(Game::new(self.topology()?))
    }

    /// Strategy kind playing `color`
    pub fn strategy_for(&self, color: Tile) -> Option<StrategyKind> {
        match color {
            Tile::Black => Some(self.black),
            Tile::White => Some(self.white),
            Tile::Empty => None,
        }
    }

    /// Load from JSON file and check the board
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.topology()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
