use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use neonsweeper_core::{GameConfig, SessionConfig};
use serde::{Deserialize, Serialize};

/// Contents of the optional `--config` file. Every field may be omitted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub session: SessionConfig,
    pub simulation: SimulationConfig,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed of the first game, later games count up from it.
    pub seed: u64,
    pub games: u32,
    /// Simulated thinking time charged to every move.
    pub move_time_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            games: 100,
            move_time_ms: 1000,
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies command-line overrides and validates the board.
    pub fn apply(&mut self, overrides: &Overrides) -> Result<()> {
        let game = &mut self.session.game;
        if let Some(size) = overrides.size {
            game.size = size;
        }
        if let Some(mines) = overrides.mines {
            game.mines = mines;
        }
        if let Some(seed) = overrides.seed {
            self.simulation.seed = seed;
        }
        if let Some(games) = overrides.games {
            self.simulation.games = games;
        }
        GameConfig::validate(&self.session.game)
            .with_context(|| format!("invalid board {:?}", self.session.game))?;
        Ok(())
    }
}

/// Fields settable from the command line.
#[derive(Copy, Clone, Debug, Default, clap::Args)]
pub struct Overrides {
    /// Board side length
    #[arg(long)]
    pub size: Option<u8>,

    /// Number of mines
    #[arg(long)]
    pub mines: Option<u16>,

    /// Seed of the first game
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of games to play
    #[arg(short, long)]
    pub games: Option<u32>,
}
