//! Error types for tournament runs

use bracket_core::{BracketError, ParticipantId};
use thiserror::Error;

use crate::driver::TournamentStatus;

/// Errors surfaced by the series resolver and the tournament driver
#[derive(Error, Debug)]
pub enum TournamentError {
    /// Bracket construction, lookup or update failed
    #[error(transparent)]
    Bracket(#[from] BracketError),

    /// The game player could not bring a game to a terminal result
    #[error("Match aborted in game {game} ({white} vs {black}): {reason}")]
    MatchAborted {
        white: String,
        black: String,
        game: u8,
        reason: String,
    },

    /// The driver was asked to do something its current state forbids
    #[error("Invalid tournament state: expected {expected:?}, found {found:?}")]
    InvalidState {
        expected: TournamentStatus,
        found: TournamentStatus,
    },

    /// The bracket seated a participant the driver does not know
    #[error("Unknown participant {0}")]
    UnknownParticipant(ParticipantId),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration file
    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Summary serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;
