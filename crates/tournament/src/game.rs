//! Single games and the player that plays them
//!
//! The rules of chess live outside this crate. A [`GamePlayer`] takes two
//! competitors, plays one game to the end and reports how it ended along with
//! the full move list and the time each move took.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::competitor::Competitor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// One move as played, with the time the mover spent on it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Move in UCI notation (e.g. "e2e4")
    pub uci: String,
    pub color: Color,
    pub elapsed: Duration,
}

/// Why a side forfeited
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForfeitReason {
    Timeout,
    InvalidMove,
}

/// How a finished game ended, as reported by the game player
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
    DrawRepetition,
    DrawInsufficientMaterial,
    DrawFiftyMove,
    Forfeit { loser: Color, reason: ForfeitReason },
}

impl GameOutcome {
    /// Color of the winner, `None` for draws
    pub fn winner(self) -> Option<Color> {
        match self {
            GameOutcome::Checkmate { winner } => Some(winner),
            GameOutcome::Forfeit { loser, .. } => Some(loser.other()),
            GameOutcome::Stalemate
            | GameOutcome::DrawRepetition
            | GameOutcome::DrawInsufficientMaterial
            | GameOutcome::DrawFiftyMove => None,
        }
    }

    pub fn reason(self) -> GameReason {
        match self {
            GameOutcome::Checkmate { .. } => GameReason::Checkmate,
            GameOutcome::Stalemate => GameReason::Stalemate,
            GameOutcome::DrawRepetition => GameReason::DrawRepetition,
            GameOutcome::DrawInsufficientMaterial => GameReason::DrawInsufficient,
            GameOutcome::DrawFiftyMove => GameReason::DrawFiftyMove,
            GameOutcome::Forfeit {
                reason: ForfeitReason::Timeout,
                ..
            } => GameReason::Timeout,
            GameOutcome::Forfeit {
                reason: ForfeitReason::InvalidMove,
                ..
            } => GameReason::InvalidMove,
        }
    }
}

/// Normalized reason recorded on a game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameReason {
    #[serde(rename = "checkmate")]
    Checkmate,
    #[serde(rename = "stalemate")]
    Stalemate,
    #[serde(rename = "draw-repetition")]
    DrawRepetition,
    #[serde(rename = "draw-insufficient")]
    DrawInsufficient,
    #[serde(rename = "draw-50-move")]
    DrawFiftyMove,
    #[serde(rename = "timeout")]
    Timeout,
    #[serde(rename = "invalid-move")]
    InvalidMove,
}

impl GameReason {
    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameReason::Stalemate
                | GameReason::DrawRepetition
                | GameReason::DrawInsufficient
                | GameReason::DrawFiftyMove
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            GameReason::Checkmate => "checkmate",
            GameReason::Stalemate => "stalemate",
            GameReason::DrawRepetition => "draw-repetition",
            GameReason::DrawInsufficient => "draw-insufficient",
            GameReason::DrawFiftyMove => "draw-50-move",
            GameReason::Timeout => "timeout",
            GameReason::InvalidMove => "invalid-move",
        }
    }
}

/// Everything the game player reports about one game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayedGame {
    /// `None` if the game stopped before reaching a terminal state
    pub outcome: Option<GameOutcome>,
    pub moves: Vec<MoveRecord>,
    /// Final position as FEN, when the player tracks one
    pub final_position: Option<String>,
}

impl PlayedGame {
    pub fn finished(outcome: GameOutcome, moves: Vec<MoveRecord>) -> Self {
        Self {
            outcome: Some(outcome),
            moves,
            final_position: None,
        }
    }

    /// Total time one side spent thinking in this game
    pub fn time_spent(&self, color: Color) -> Duration {
        self.moves
            .iter()
            .filter(|m| m.color == color)
            .map(|m| m.elapsed)
            .sum()
    }
}

/// The game player failed outright (bot failed to load, worker crashed, ...)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PlayerError(pub String);

/// Plays single games between two competitors.
///
/// Implementations load and run the bots and enforce the rules of chess.
/// The tournament only ever asks for one game at a time and waits for it.
pub trait GamePlayer {
    /// Play one game to completion.
    ///
    /// # Arguments
    /// * `white` - Competitor moving first
    /// * `black` - Competitor moving second
    /// * `time_limit` - Time budget for each move
    ///
    /// # Returns
    /// The played game. An `Err`, or a game without an outcome, aborts the
    /// match it belongs to.
    fn play_game(
        &mut self,
        white: &Competitor,
        black: &Competitor,
        time_limit: Duration,
    ) -> Result<PlayedGame, PlayerError>;
}

impl<P: GamePlayer + ?Sized> GamePlayer for &mut P {
    fn play_game(
        &mut self,
        white: &Competitor,
        black: &Competitor,
        time_limit: Duration,
    ) -> Result<PlayedGame, PlayerError> {
        (**self).play_game(white, black, time_limit)
    }
}

impl<P: GamePlayer + ?Sized> GamePlayer for Box<P> {
    fn play_game(
        &mut self,
        white: &Competitor,
        black: &Competitor,
        time_limit: Duration,
    ) -> Result<PlayedGame, PlayerError> {
        (**self).play_game(white, black, time_limit)
    }
}
