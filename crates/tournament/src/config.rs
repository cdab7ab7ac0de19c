//! Tournament configuration

use bracket_core::{GrandFinalMode, StageSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::competitor::Competitor;
use crate::error::TournamentResult;

/// Tournament configuration, usually read from a TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Name/description of the tournament
    pub name: String,
    /// Time budget per move, in milliseconds
    pub time_limit_ms: u64,
    pub grand_final: GrandFinalMode,
    pub balance_byes: bool,
    /// Seed for shuffling the field (None = fresh entropy every run)
    pub seed: Option<u64>,
    pub competitors: Vec<Competitor>,
    /// Settings for the simulated game player
    pub simulation: SimulationConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            name: "Bot Tournament".to_string(),
            time_limit_ms: 10_000,
            grand_final: GrandFinalMode::Double,
            balance_byes: true,
            seed: None,
            competitors: Vec::new(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl TournamentConfig {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> TournamentResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> TournamentResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }

    /// Bracket settings derived from this config
    pub fn stage_settings(&self) -> StageSettings {
        StageSettings {
            grand_final: self.grand_final,
            balance_byes: self.balance_byes,
        }
    }
}

/// Settings for [`SimulatedPlayer`](crate::SimulatedPlayer)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Probability that a game ends drawn
    pub draw_rate: f64,
    /// Probability that a decisive game ends by forfeit rather than mate
    pub forfeit_rate: f64,
    pub min_moves: u32,
    pub max_moves: u32,
    /// Upper bound of a single simulated move time, in milliseconds
    pub max_move_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            draw_rate: 0.15,
            forfeit_rate: 0.05,
            min_moves: 20,
            max_moves: 120,
            max_move_ms: 250,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
