//! Double-elimination bracket construction

use std::collections::HashSet;

use tracing::debug;

use crate::error::{BracketError, BracketResult};
use crate::model::{
    Bracket, GrandFinalMode, Group, Match, MatchId, MatchStatus, Opponent, Participant, Side,
    Slot, SlotRef, Stage, StageSettings,
};

/// Number of leaf slots for a field of `count` competitors
pub fn bracket_size(count: usize) -> usize {
    count.max(2).next_power_of_two()
}

/// Builds double-elimination brackets from an already shuffled field
#[derive(Debug, Clone)]
pub struct BracketBuilder {
    name: String,
    settings: StageSettings,
}

impl Default for BracketBuilder {
    fn default() -> Self {
        Self::new(StageSettings::default())
    }
}

impl BracketBuilder {
    pub fn new(settings: StageSettings) -> Self {
        Self {
            name: "Double Elimination".to_string(),
            settings,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Build the full winners/losers/grand-final graph.
    ///
    /// Competitors are seated in the given order. Unfilled leaf slots become
    /// byes and the competitor facing one is advanced immediately. The stage
    /// id is 0 until a store assigns one.
    pub fn build(&self, competitors: &[String]) -> BracketResult<Bracket> {
        if competitors.len() < 2 {
            return Err(BracketError::Configuration(format!(
                "a double-elimination bracket needs at least 2 competitors, got {}",
                competitors.len()
            )));
        }
        let mut seen = HashSet::new();
        for name in competitors {
            if !seen.insert(name.as_str()) {
                return Err(BracketError::Configuration(format!(
                    "competitor '{}' appears more than once",
                    name
                )));
            }
        }

        let size = bracket_size(competitors.len());
        let rounds = size.trailing_zeros() as usize;

        let participants: Vec<Participant> = competitors
            .iter()
            .enumerate()
            .map(|(i, name)| Participant {
                id: i as u32,
                stage_id: 0,
                name: name.clone(),
            })
            .collect();

        let seeding = self.seeding(participants.len(), size);
        let mut graph = Graph::default();

        let mut winners_rounds: Vec<Vec<MatchId>> = Vec::new();
        let mut w1 = Vec::with_capacity(size / 2);
        for i in 0..size / 2 {
            let slot = |seat: Option<u32>| seat.map(Slot::Participant).unwrap_or(Slot::Bye);
            let id = graph.push(
                Group::Winners,
                1,
                i + 1,
                slot(seeding[i * 2]),
                slot(seeding[i * 2 + 1]),
            );
            w1.push(id);
        }
        winners_rounds.push(w1);

        for round in 2..=rounds {
            let prev = winners_rounds[round - 2].clone();
            let mut ids = Vec::with_capacity(prev.len() / 2);
            for j in 0..prev.len() / 2 {
                let id = graph.push(Group::Winners, round, j + 1, Slot::Pending, Slot::Pending);
                graph.winner_to(prev[j * 2], id, Side::Opponent1);
                graph.winner_to(prev[j * 2 + 1], id, Side::Opponent2);
                ids.push(id);
            }
            winners_rounds.push(ids);
        }

        // Losers rounds alternate: odd rounds pair survivors among themselves,
        // even rounds take in the losers of the next winners round.
        let mut losers_rounds: Vec<Vec<MatchId>> = Vec::new();
        for i in 1..rounds {
            let count = winners_rounds[i].len();
            let odd_round = i * 2 - 1;
            let mut odd_ids = Vec::with_capacity(count);
            for j in 0..count {
                let id = graph.push(Group::Losers, odd_round, j + 1, Slot::Pending, Slot::Pending);
                match losers_rounds.last() {
                    None => {
                        let w1 = &winners_rounds[0];
                        graph.loser_to(w1[j * 2], id, Side::Opponent1);
                        graph.loser_to(w1[j * 2 + 1], id, Side::Opponent2);
                    }
                    Some(prev_even) => {
                        let (a, b) = (prev_even[j * 2], prev_even[j * 2 + 1]);
                        graph.winner_to(a, id, Side::Opponent1);
                        graph.winner_to(b, id, Side::Opponent2);
                    }
                }
                odd_ids.push(id);
            }

            // Drop-ins arrive in reverse order so a dropped competitor meets
            // survivors from the other half of the winners round.
            let mut even_ids = Vec::with_capacity(count);
            for j in 0..count {
                let id = graph.push(Group::Losers, odd_round + 1, j + 1, Slot::Pending, Slot::Pending);
                graph.winner_to(odd_ids[j], id, Side::Opponent1);
                graph.loser_to(winners_rounds[i][count - 1 - j], id, Side::Opponent2);
                even_ids.push(id);
            }
            losers_rounds.push(odd_ids);
            losers_rounds.push(even_ids);
        }

        let winners_final = winners_rounds[rounds - 1][0];
        let grand_final = graph.push(Group::GrandFinal, 1, 1, Slot::Pending, Slot::Pending);
        graph.winner_to(winners_final, grand_final, Side::Opponent1);
        match losers_rounds.last() {
            Some(last) => graph.winner_to(last[0], grand_final, Side::Opponent2),
            // Two competitors: the first-round loser goes straight to the final
            None => graph.loser_to(winners_final, grand_final, Side::Opponent2),
        }

        if self.settings.grand_final == GrandFinalMode::Double {
            let reset = graph.push(Group::GrandFinal, 2, 1, Slot::Pending, Slot::Pending);
            if let Some(record) = graph.matches.get_mut(grand_final as usize) {
                record.reset_to = Some(reset);
            }
        }

        let mut bracket = Bracket {
            stage: Stage {
                id: 0,
                name: self.name.clone(),
                settings: self.settings.clone(),
                size: size as u32,
            },
            participants,
            matches: graph.matches,
        };
        bracket.settle(winners_rounds[0].iter().copied());

        debug!(
            competitors = competitors.len(),
            size,
            matches = bracket.matches.len(),
            "built double-elimination bracket"
        );
        Ok(bracket)
    }

    /// Leaf seat for every slot: `Some(participant)` or `None` for a bye.
    fn seeding(&self, count: usize, size: usize) -> Vec<Option<u32>> {
        let mut seats = vec![None; size];
        let half = size / 2;
        for i in 0..count {
            let position = if self.settings.balance_byes {
                // Fill every match's first slot before any second slot, so
                // byes never meet each other.
                (i % half) * 2 + i / half
            } else {
                i
            };
            seats[position] = Some(i as u32);
        }
        seats
    }
}

/// Match arena under construction
#[derive(Default)]
struct Graph {
    matches: Vec<Match>,
}

impl Graph {
    fn push(&mut self, group: Group, round: usize, number: usize, slot1: Slot, slot2: Slot) -> MatchId {
        let id = self.matches.len() as MatchId;
        self.matches.push(Match {
            id,
            stage_id: 0,
            group,
            round: round as u32,
            number: number as u32,
            opponent1: Opponent::new(slot1),
            opponent2: Opponent::new(slot2),
            status: MatchStatus::Pending,
            winner: None,
            winner_to: None,
            loser_to: None,
            reset_to: None,
        });
        id
    }

    fn winner_to(&mut self, from: MatchId, to: MatchId, side: Side) {
        if let Some(record) = self.matches.get_mut(from as usize) {
            record.winner_to = Some(SlotRef { match_id: to, side });
        }
    }

    fn loser_to(&mut self, from: MatchId, to: MatchId, side: Side) {
        if let Some(record) = self.matches.get_mut(from as usize) {
            record.loser_to = Some(SlotRef { match_id: to, side });
        }
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod builder_tests;
