//! Ready-frontier queries

use crate::error::{BracketError, BracketResult};
use crate::model::{Match, MatchStatus, StageId};
use crate::store::{BracketStore, MatchFilter};

/// Statuses a match can be played from
const ONGOING_STATUSES: [MatchStatus; 2] = [MatchStatus::Ready, MatchStatus::Running];

/// Every match in the stage that can be played right now.
///
/// A match qualifies when it is ready or running and both of its slots hold a
/// concrete participant. Matches waiting on upstream results and byes are
/// excluded. The result is ordered by match id.
pub fn ready_matches<S>(store: &S, stage_id: StageId) -> BracketResult<Vec<Match>>
where
    S: BracketStore + ?Sized,
{
    if store.select_stage(stage_id).is_none() {
        return Err(BracketError::StageNotFound(stage_id));
    }

    let mut matches =
        store.select_matches(&MatchFilter::stage(stage_id).with_statuses(&ONGOING_STATUSES));
    matches.retain(Match::is_playable);
    matches.sort_by_key(|m| m.id);
    Ok(matches)
}

/// First playable match, if any
pub fn next_ready_match<S>(store: &S, stage_id: StageId) -> BracketResult<Option<Match>>
where
    S: BracketStore + ?Sized,
{
    Ok(ready_matches(store, stage_id)?.into_iter().next())
}
