//! Bracket data model: stages, matches, slots and participants
//!
//! A bracket is an arena of [`Match`] records addressed by [`MatchId`]. The
//! progression graph is stored on the records themselves as explicit edges
//! (`winner_to`, `loser_to`, `reset_to`) computed once at construction time.

use serde::{Deserialize, Serialize};

pub type StageId = u32;
pub type MatchId = u32;
pub type ParticipantId = u32;

/// How the grand final is played
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrandFinalMode {
    /// One grand final match decides the champion
    Single,
    /// A second match is played if the losers-bracket finalist wins the first
    Double,
}

/// Settings a double-elimination stage is built with
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSettings {
    pub grand_final: GrandFinalMode,
    /// Spread byes so that no first-round match pairs two byes
    pub balance_byes: bool,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            grand_final: GrandFinalMode::Double,
            balance_byes: true,
        }
    }
}

/// A double-elimination stage record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    pub settings: StageSettings,
    /// Number of leaf slots (a power of two)
    pub size: u32,
}

/// A competitor seated in a stage
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub stage_id: StageId,
    pub name: String,
}

/// Which part of the double-elimination bracket a match belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Winners,
    Losers,
    GrandFinal,
}

/// One of the two opponent positions of a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Opponent1,
    Opponent2,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Opponent1 => Side::Opponent2,
            Side::Opponent2 => Side::Opponent1,
        }
    }
}

/// Contents of an opponent position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Waiting on an upstream match
    Pending,
    /// Nobody will ever sit here
    Bye,
    Participant(ParticipantId),
}

impl Slot {
    pub fn participant(self) -> Option<ParticipantId> {
        match self {
            Slot::Participant(id) => Some(id),
            _ => None,
        }
    }
}

/// Per-opponent outcome of a decided match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotResult {
    Win,
    Loss,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opponent {
    pub slot: Slot,
    pub score: Option<u32>,
    pub result: Option<SlotResult>,
}

impl Opponent {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            score: None,
            result: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// At least one opponent is still unknown
    Pending,
    /// Both opponents are known, nothing played yet
    Ready,
    /// A series is being played
    Running,
    /// Decided, either by play or by a bye
    Completed,
    /// Never needs play (two byes, or an unneeded bracket reset)
    Skipped,
}

impl MatchStatus {
    /// True once the match will never change again
    pub fn is_settled(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Skipped)
    }
}

/// Address of one opponent position in the bracket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub match_id: MatchId,
    pub side: Side,
}

/// A match record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub stage_id: StageId,
    pub group: Group,
    /// 1-based round within the group
    pub round: u32,
    /// 1-based position within the round
    pub number: u32,
    pub opponent1: Opponent,
    pub opponent2: Opponent,
    pub status: MatchStatus,
    pub winner: Option<Side>,
    /// Where the winner goes next
    pub winner_to: Option<SlotRef>,
    /// Where the loser drops to (losers-eligible matches only)
    pub loser_to: Option<SlotRef>,
    /// Bracket reset match unlocked when opponent2 wins this grand final
    pub reset_to: Option<MatchId>,
}

impl Match {
    pub fn opponent(&self, side: Side) -> &Opponent {
        match side {
            Side::Opponent1 => &self.opponent1,
            Side::Opponent2 => &self.opponent2,
        }
    }

    pub fn opponent_mut(&mut self, side: Side) -> &mut Opponent {
        match side {
            Side::Opponent1 => &mut self.opponent1,
            Side::Opponent2 => &mut self.opponent2,
        }
    }

    /// Both participants, if both slots hold one
    pub fn participants(&self) -> Option<(ParticipantId, ParticipantId)> {
        Some((
            self.opponent1.slot.participant()?,
            self.opponent2.slot.participant()?,
        ))
    }

    /// The side a participant occupies in this match
    pub fn side_of(&self, participant: ParticipantId) -> Option<Side> {
        if self.opponent1.slot == Slot::Participant(participant) {
            Some(Side::Opponent1)
        } else if self.opponent2.slot == Slot::Participant(participant) {
            Some(Side::Opponent2)
        } else {
            None
        }
    }

    pub fn winner_id(&self) -> Option<ParticipantId> {
        self.winner
            .and_then(|side| self.opponent(side).slot.participant())
    }

    pub fn loser_id(&self) -> Option<ParticipantId> {
        self.winner
            .and_then(|side| self.opponent(side.other()).slot.participant())
    }

    /// Completed without a game because one side was a bye
    pub fn is_bye(&self) -> bool {
        self.status == MatchStatus::Completed
            && (self.opponent1.slot == Slot::Bye || self.opponent2.slot == Slot::Bye)
    }

    /// Ready or running with two concrete opponents
    pub fn is_playable(&self) -> bool {
        matches!(self.status, MatchStatus::Ready | MatchStatus::Running)
            && self.participants().is_some()
    }
}

/// A whole stage: its record, its participants and its match arena
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub stage: Stage,
    pub participants: Vec<Participant>,
    pub matches: Vec<Match>,
}

impl Bracket {
    pub fn match_by_id(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_by_name(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    /// Matches of one group, ordered by round then number
    pub fn group_matches(&self, group: Group) -> Vec<&Match> {
        let mut matches: Vec<_> = self.matches.iter().filter(|m| m.group == group).collect();
        matches.sort_by_key(|m| (m.round, m.number));
        matches
    }

    /// Number of rounds in a group
    pub fn round_count(&self, group: Group) -> u32 {
        self.matches
            .iter()
            .filter(|m| m.group == group)
            .map(|m| m.round)
            .max()
            .unwrap_or(0)
    }
}
