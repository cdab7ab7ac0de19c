//! Tournament summaries and text reports

use bracket_core::{Bracket, Group, Match, MatchId, MatchStatus, Slot, Standing};
use serde::Serialize;
use std::path::Path;

use crate::driver::{PlayedMatch, Podium, TournamentStatus};
use crate::error::TournamentResult;
use crate::ledger::{HeadToHeadEntry, HeadToHeadLedger};

/// Read-only snapshot of a tournament
#[derive(Debug, Clone, Serialize)]
pub struct TournamentSummary {
    pub name: String,
    pub status: TournamentStatus,
    /// Rounds in play order: winners, losers, grand final
    pub rounds: Vec<RoundSummary>,
    pub head_to_head: Vec<HeadToHeadEntry>,
    /// Empty until the tournament is finished
    pub standings: Vec<Standing>,
    pub podium: Podium,
    /// Every resolved match, in the order it was played
    pub history: Vec<PlayedMatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary {
    pub group: Group,
    pub round: u32,
    pub title: String,
    pub matches: Vec<MatchSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub id: MatchId,
    pub number: u32,
    pub status: MatchStatus,
    pub opponent1: SlotSummary,
    pub opponent2: SlotSummary,
    pub winner: Option<String>,
}

/// One side of a match as shown to a reader
#[derive(Debug, Clone, Serialize)]
pub struct SlotSummary {
    /// Name, "BYE" or "TBD"
    pub name: String,
    pub score: Option<u32>,
}

/// Display title of a bracket round
pub fn round_title(group: Group, round: u32, rounds_in_group: u32) -> String {
    match group {
        Group::Winners if round == rounds_in_group => "Winners Final".to_string(),
        Group::Winners => format!("Winners Round {}", round),
        Group::Losers if round == rounds_in_group => "Losers Final".to_string(),
        Group::Losers => format!("Losers Round {}", round),
        Group::GrandFinal if round == 1 => "Grand Final".to_string(),
        Group::GrandFinal => "Grand Final Reset".to_string(),
    }
}

impl TournamentSummary {
    pub fn new(
        name: &str,
        status: TournamentStatus,
        bracket: Option<&Bracket>,
        ledger: &HeadToHeadLedger,
        standings: &[Standing],
        podium: &Podium,
        history: &[PlayedMatch],
    ) -> Self {
        Self {
            name: name.to_string(),
            status,
            rounds: bracket.map(summarize_rounds).unwrap_or_default(),
            head_to_head: ledger.entries(),
            standings: standings.to_vec(),
            podium: podium.clone(),
            history: history.to_vec(),
        }
    }

    /// Save summary to a JSON file
    pub fn save(&self, path: &Path) -> TournamentResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Tournament: {} ===\n", self.name));
        report.push_str(&format!("Status: {:?}\n\n", self.status));

        for round in &self.rounds {
            report.push_str(&format!("{}:\n", round.title));
            for m in &round.matches {
                report.push_str(&format!(
                    "  #{:<3} {:<20} {:>2} - {:<2} {:<20} {:?}\n",
                    m.id,
                    m.opponent1.name,
                    score_label(m.opponent1.score),
                    score_label(m.opponent2.score),
                    m.opponent2.name,
                    m.status
                ));
            }
        }

        if !self.head_to_head.is_empty() {
            report.push_str("\nHead to head:\n");
            report.push_str(&format!("{:<20} vs {:<20} {:>5}-{:<5}\n", "Bot 1", "Bot 2", "W", "L"));
            report.push_str(&"-".repeat(56));
            report.push('\n');
            for entry in &self.head_to_head {
                report.push_str(&format!(
                    "{:<20} vs {:<20} {:>5}-{:<5}\n",
                    entry.first, entry.second, entry.record.wins, entry.record.losses
                ));
            }
        }

        if !self.standings.is_empty() {
            report.push_str("\nStandings:\n");
            for standing in &self.standings {
                report.push_str(&format!("{:>4}. {}\n", standing.rank, standing.name));
            }
        }

        if let Some(champion) = &self.podium.champion {
            report.push_str(&format!("\nChampion: {}\n", champion));
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

fn score_label(score: Option<u32>) -> String {
    score.map_or_else(|| "-".to_string(), |s| s.to_string())
}

fn summarize_rounds(bracket: &Bracket) -> Vec<RoundSummary> {
    let mut rounds = Vec::new();
    for group in [Group::Winners, Group::Losers, Group::GrandFinal] {
        let rounds_in_group = bracket.round_count(group);
        for round in 1..=rounds_in_group {
            let matches: Vec<MatchSummary> = bracket
                .group_matches(group)
                .into_iter()
                .filter(|m| m.round == round)
                .map(|m| summarize_match(bracket, m))
                .collect();
            rounds.push(RoundSummary {
                group,
                round,
                title: round_title(group, round, rounds_in_group),
                matches,
            });
        }
    }
    rounds
}

fn summarize_match(bracket: &Bracket, record: &Match) -> MatchSummary {
    let slot_name = |slot: Slot| match slot {
        Slot::Pending => "TBD".to_string(),
        Slot::Bye => "BYE".to_string(),
        Slot::Participant(id) => bracket
            .participant(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("#{}", id)),
    };
    MatchSummary {
        id: record.id,
        number: record.number,
        status: record.status,
        opponent1: SlotSummary {
            name: slot_name(record.opponent1.slot),
            score: record.opponent1.score,
        },
        opponent2: SlotSummary {
            name: slot_name(record.opponent2.slot),
            score: record.opponent2.score,
        },
        winner: record
            .winner_id()
            .and_then(|id| bracket.participant(id))
            .map(|p| p.name.clone()),
    }
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod summary_tests;
