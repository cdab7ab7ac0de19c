//! Bracket storage contract and an in-memory implementation
//!
//! The locator and the result applier only ever talk to storage through
//! [`BracketStore`]: stage creation, record selection by filter, and single
//! match updates.

use crate::error::{BracketError, BracketResult};
use crate::model::{Bracket, Group, Match, MatchId, MatchStatus, Participant, Stage, StageId};

/// Filter for selecting match records. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    pub stage_id: Option<StageId>,
    pub match_id: Option<MatchId>,
    pub group: Option<Group>,
    /// Empty means any status
    pub statuses: Vec<MatchStatus>,
}

impl MatchFilter {
    pub fn stage(stage_id: StageId) -> Self {
        Self {
            stage_id: Some(stage_id),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, match_id: MatchId) -> Self {
        self.match_id = Some(match_id);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_statuses(mut self, statuses: &[MatchStatus]) -> Self {
        self.statuses = statuses.to_vec();
        self
    }

    pub fn accepts(&self, record: &Match) -> bool {
        self.stage_id.map_or(true, |id| record.stage_id == id)
            && self.match_id.map_or(true, |id| record.id == id)
            && self.group.map_or(true, |group| record.group == group)
            && (self.statuses.is_empty() || self.statuses.contains(&record.status))
    }
}

/// Persistence for stages, participants and matches
pub trait BracketStore {
    /// Persist a freshly built bracket and return its assigned stage id
    fn create_stage(&mut self, bracket: Bracket) -> BracketResult<StageId>;

    fn select_stage(&self, stage_id: StageId) -> Option<Stage>;

    fn select_participants(&self, stage_id: StageId) -> Vec<Participant>;

    /// Matches accepted by `filter`, ordered by id
    fn select_matches(&self, filter: &MatchFilter) -> Vec<Match>;

    /// Replace an existing match record
    fn update_match(&mut self, record: Match) -> BracketResult<()>;

    /// Replace several match records at once.
    ///
    /// The default writes one record at a time and stops at the first
    /// failure. Stores that can should check every record before writing any.
    fn update_matches(&mut self, records: Vec<Match>) -> BracketResult<()> {
        for record in records {
            self.update_match(record)?;
        }
        Ok(())
    }

    fn select_match(&self, stage_id: StageId, match_id: MatchId) -> BracketResult<Match> {
        if self.select_stage(stage_id).is_none() {
            return Err(BracketError::StageNotFound(stage_id));
        }
        self.select_matches(&MatchFilter::stage(stage_id).with_id(match_id))
            .into_iter()
            .next()
            .ok_or(BracketError::MatchNotFound { stage_id, match_id })
    }

    /// Reassemble a stage into a bracket arena
    fn load_bracket(&self, stage_id: StageId) -> BracketResult<Bracket> {
        let stage = self
            .select_stage(stage_id)
            .ok_or(BracketError::StageNotFound(stage_id))?;
        Ok(Bracket {
            stage,
            participants: self.select_participants(stage_id),
            matches: self.select_matches(&MatchFilter::stage(stage_id)),
        })
    }
}

/// Keeps every record in memory for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    stages: Vec<Stage>,
    participants: Vec<Participant>,
    matches: Vec<Match>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BracketStore for InMemoryStore {
    fn create_stage(&mut self, bracket: Bracket) -> BracketResult<StageId> {
        let stage_id = self.stages.len() as StageId;
        let Bracket {
            mut stage,
            participants,
            matches,
        } = bracket;

        stage.id = stage_id;
        self.stages.push(stage);
        self.participants
            .extend(participants.into_iter().map(|p| Participant { stage_id, ..p }));
        self.matches
            .extend(matches.into_iter().map(|m| Match { stage_id, ..m }));
        Ok(stage_id)
    }

    fn select_stage(&self, stage_id: StageId) -> Option<Stage> {
        self.stages.iter().find(|s| s.id == stage_id).cloned()
    }

    fn select_participants(&self, stage_id: StageId) -> Vec<Participant> {
        self.participants
            .iter()
            .filter(|p| p.stage_id == stage_id)
            .cloned()
            .collect()
    }

    fn select_matches(&self, filter: &MatchFilter) -> Vec<Match> {
        let mut selected: Vec<Match> = self
            .matches
            .iter()
            .filter(|m| filter.accepts(m))
            .cloned()
            .collect();
        selected.sort_by_key(|m| (m.stage_id, m.id));
        selected
    }

    fn update_match(&mut self, record: Match) -> BracketResult<()> {
        let existing = self
            .matches
            .iter_mut()
            .find(|m| m.stage_id == record.stage_id && m.id == record.id)
            .ok_or(BracketError::MatchNotFound {
                stage_id: record.stage_id,
                match_id: record.id,
            })?;
        *existing = record;
        Ok(())
    }

    /// All or nothing: an unknown record leaves every record untouched
    fn update_matches(&mut self, records: Vec<Match>) -> BracketResult<()> {
        let mut positions = Vec::with_capacity(records.len());
        for record in &records {
            let position = self
                .matches
                .iter()
                .position(|m| m.stage_id == record.stage_id && m.id == record.id)
                .ok_or(BracketError::MatchNotFound {
                    stage_id: record.stage_id,
                    match_id: record.id,
                })?;
            positions.push(position);
        }
        for (position, record) in positions.into_iter().zip(records) {
            self.matches[position] = record;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
