//! Final standings of a decided double-elimination stage

use serde::{Deserialize, Serialize};

use crate::error::{BracketError, BracketResult};
use crate::model::{Bracket, Group, MatchStatus, ParticipantId, StageId};
use crate::store::BracketStore;

/// One placed participant. Equal ranks are ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: u32,
    pub participant_id: ParticipantId,
    pub name: String,
}

/// Rank every participant of a finished bracket.
///
/// The grand-final winner is first and the other finalist second. Everyone
/// else was knocked out in the losers bracket: later eliminations rank higher,
/// and participants eliminated in the same losers round share a rank, listed
/// by match number.
pub fn final_standings(bracket: &Bracket) -> BracketResult<Vec<Standing>> {
    let stage_id = bracket.stage.id;
    let finals = bracket.group_matches(Group::GrandFinal);
    if finals.is_empty() || finals.iter().any(|m| !m.status.is_settled()) {
        return Err(BracketError::Unfinished(stage_id));
    }
    let decider = finals
        .iter()
        .rev()
        .find(|m| m.status == MatchStatus::Completed)
        .ok_or(BracketError::Unfinished(stage_id))?;

    let mut placed: Vec<(u32, ParticipantId)> = Vec::new();
    if let Some(champion) = decider.winner_id() {
        placed.push((1, champion));
    }
    if let Some(runner_up) = decider.loser_id() {
        placed.push((2, runner_up));
    }

    let mut eliminations: Vec<_> = bracket
        .matches
        .iter()
        .filter(|m| m.group == Group::Losers && m.status == MatchStatus::Completed)
        .filter_map(|m| m.loser_id().map(|loser| (m.round, m.number, loser)))
        .collect();
    eliminations.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut current_round = None;
    let mut rank = 0;
    for (round, _, loser) in eliminations {
        if current_round != Some(round) {
            current_round = Some(round);
            rank = placed.len() as u32 + 1;
        }
        placed.push((rank, loser));
    }

    Ok(placed
        .into_iter()
        .map(|(rank, participant_id)| Standing {
            rank,
            participant_id,
            name: bracket
                .participant(participant_id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
        })
        .collect())
}

/// Standings of a stored stage
pub fn stage_standings<S>(store: &S, stage_id: StageId) -> BracketResult<Vec<Standing>>
where
    S: BracketStore + ?Sized,
{
    final_standings(&store.load_bracket(stage_id)?)
}

#[cfg(test)]
#[path = "standings_tests.rs"]
mod standings_tests;
