//! Writing series results back into a stored bracket

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BracketError, BracketResult};
use crate::model::{Match, MatchId, MatchStatus, ParticipantId, StageId};
use crate::store::BracketStore;

/// Outcome of one played match, as reported by whoever played it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub winner: ParticipantId,
    pub loser: ParticipantId,
    /// Games won by the winner
    pub winner_score: u32,
    /// Games won by the loser
    pub loser_score: u32,
}

/// Flag a ready match as being played
pub fn start_match<S>(store: &mut S, stage_id: StageId, match_id: MatchId) -> BracketResult<Match>
where
    S: BracketStore + ?Sized,
{
    let mut record = store.select_match(stage_id, match_id)?;
    match record.status {
        MatchStatus::Running => return Ok(record),
        MatchStatus::Ready => {}
        MatchStatus::Completed | MatchStatus::Skipped => {
            return Err(BracketError::AlreadyCompleted(match_id))
        }
        MatchStatus::Pending => return Err(BracketError::MatchNotReady(match_id)),
    }
    record.status = MatchStatus::Running;
    store.update_match(record.clone())?;
    Ok(record)
}

/// Complete a match and propagate winner and loser downstream.
///
/// The winner is matched to opponent1/opponent2 by identity, never by the
/// colors the series was played with. Returns the ids of every match whose
/// record changed. Applying a result to a decided match fails with
/// [`BracketError::AlreadyCompleted`].
pub fn apply_result<S>(
    store: &mut S,
    stage_id: StageId,
    match_id: MatchId,
    report: &MatchReport,
) -> BracketResult<Vec<MatchId>>
where
    S: BracketStore + ?Sized,
{
    let mut bracket = store.load_bracket(stage_id)?;
    let record = bracket
        .match_by_id(match_id)
        .ok_or(BracketError::MatchNotFound { stage_id, match_id })?;

    if record.status.is_settled() {
        return Err(BracketError::AlreadyCompleted(match_id));
    }
    if record.participants().is_none() {
        return Err(BracketError::MatchNotReady(match_id));
    }
    let winner_side = record.side_of(report.winner).ok_or(BracketError::NotAnOpponent {
        match_id,
        participant_id: report.winner,
    })?;
    if record.side_of(report.loser) != Some(winner_side.other()) {
        return Err(BracketError::NotAnOpponent {
            match_id,
            participant_id: report.loser,
        });
    }

    let touched = bracket.record_result(
        match_id,
        winner_side,
        report.winner_score,
        report.loser_score,
    );
    let changed: Vec<Match> = touched
        .iter()
        .filter_map(|id| bracket.match_by_id(*id).cloned())
        .collect();
    store.update_matches(changed)?;

    debug!(
        stage_id,
        match_id,
        winner = report.winner,
        loser = report.loser,
        updated = touched.len(),
        "match result applied"
    );
    Ok(touched.into_iter().collect())
}

#[cfg(test)]
#[path = "applier_tests.rs"]
mod applier_tests;
