//! Simulated game player
//!
//! Plays no chess at all: it draws a plausible outcome, a move count and move
//! times from a seeded RNG. Useful for exercising the tournament end to end
//! before real bots are wired in, and as a baseline for reports.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::competitor::Competitor;
use crate::config::SimulationConfig;
use crate::game::{
    Color, ForfeitReason, GameOutcome, GamePlayer, MoveRecord, PlayedGame, PlayerError,
};

/// Rating assumed for competitors without an `elo` metadata entry
pub const DEFAULT_ELO: f64 = 1500.0;

/// Game player that invents results.
///
/// Decisive games favour the higher rated side using the usual Elo expected
/// score, read from each competitor's `elo` metadata.
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    config: SimulationConfig,
    rng: StdRng,
}

impl SimulatedPlayer {
    pub fn new(config: SimulationConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Expected score of `white` against `black`
    pub fn expected_score(white: &Competitor, black: &Competitor) -> f64 {
        let rating = |c: &Competitor| {
            c.metadata("elo")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|r| r.is_finite())
                .unwrap_or(DEFAULT_ELO)
        };
        1.0 / (1.0 + 10.0_f64.powf((rating(black) - rating(white)) / 400.0))
    }

    fn pick_outcome(&mut self, white: &Competitor, black: &Competitor) -> GameOutcome {
        if self.rng.gen_bool(probability(self.config.draw_rate)) {
            return match self.rng.gen_range(0..4) {
                0 => GameOutcome::Stalemate,
                1 => GameOutcome::DrawRepetition,
                2 => GameOutcome::DrawInsufficientMaterial,
                _ => GameOutcome::DrawFiftyMove,
            };
        }

        let white_wins = self.rng.gen_bool(probability(Self::expected_score(white, black)));
        let winner = if white_wins { Color::White } else { Color::Black };
        if self.rng.gen_bool(probability(self.config.forfeit_rate)) {
            let reason = if self.rng.gen_bool(0.5) {
                ForfeitReason::Timeout
            } else {
                ForfeitReason::InvalidMove
            };
            GameOutcome::Forfeit {
                loser: winner.other(),
                reason,
            }
        } else {
            GameOutcome::Checkmate { winner }
        }
    }

    fn moves(&mut self, time_limit: Duration) -> Vec<MoveRecord> {
        let min = self.config.min_moves.max(1);
        let max = self.config.max_moves.max(min);
        let count = self.rng.gen_range(min..=max);
        let cap = (self.config.max_move_ms.max(1) as u128).min(time_limit.as_millis().max(1)) as u64;

        let mut color = Color::White;
        (0..count)
            .map(|_| {
                let record = MoveRecord {
                    uci: format!("{}{}", self.square(), self.square()),
                    color,
                    elapsed: Duration::from_millis(self.rng.gen_range(1..=cap)),
                };
                color = color.other();
                record
            })
            .collect()
    }

    fn square(&mut self) -> String {
        let sq: u8 = self.rng.gen_range(0..64);
        let f = (b'a' + (sq % 8)) as char;
        let r = (b'1' + (sq / 8)) as char;
        format!("{f}{r}")
    }
}

/// Clamp a configured rate into `[0, 1]`; NaN counts as never
fn probability(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

impl Default for SimulatedPlayer {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl GamePlayer for SimulatedPlayer {
    fn play_game(
        &mut self,
        white: &Competitor,
        black: &Competitor,
        time_limit: Duration,
    ) -> Result<PlayedGame, PlayerError> {
        let outcome = self.pick_outcome(white, black);
        let moves = self.moves(time_limit);
        Ok(PlayedGame::finished(outcome, moves))
    }
}

#[cfg(test)]
#[path = "simulated_tests.rs"]
mod simulated_tests;
