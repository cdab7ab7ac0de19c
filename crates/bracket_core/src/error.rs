//! Error types for bracket operations

use thiserror::Error;

use crate::model::{MatchId, ParticipantId, StageId};

/// Errors raised while building, querying or updating a bracket
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BracketError {
    /// Bad input to bracket construction
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Query against a stage that does not exist
    #[error("Stage {0} not found")]
    StageNotFound(StageId),

    /// Query against a match that does not exist in the stage
    #[error("Match {match_id} not found in stage {stage_id}")]
    MatchNotFound { stage_id: StageId, match_id: MatchId },

    /// A result was applied to a match that is already decided
    #[error("Match {0} is already completed")]
    AlreadyCompleted(MatchId),

    /// A result was applied before both opponents were known
    #[error("Match {0} is not ready to be played")]
    MatchNotReady(MatchId),

    /// The reported winner or loser does not sit in the match
    #[error("Participant {participant_id} is not an opponent in match {match_id}")]
    NotAnOpponent {
        match_id: MatchId,
        participant_id: ParticipantId,
    },

    /// Standings were requested before the grand final was decided
    #[error("Stage {0} has not finished")]
    Unfinished(StageId),
}

/// Result type alias for bracket operations
pub type BracketResult<T> = Result<T, BracketError>;
