//! Head-to-head records between competitors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wins and losses of the lexicographically first name of a pairing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub wins: u32,
    pub losses: u32,
}

impl HeadToHead {
    pub fn total(&self) -> u32 {
        self.wins + self.losses
    }

    /// Same record seen from the other side
    pub fn flipped(self) -> Self {
        Self {
            wins: self.losses,
            losses: self.wins,
        }
    }
}

/// One row of the ledger, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHeadEntry {
    /// `first-vs-second`
    pub key: String,
    pub first: String,
    pub second: String,
    pub record: HeadToHead,
}

/// Match records keyed by unordered pair of names.
///
/// A pair is stored once, under its names in sorted order, with wins and
/// losses counted for the first name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadToHeadLedger {
    records: BTreeMap<(String, String), HeadToHead>,
}

impl HeadToHeadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    /// Count one match won by `winner` over `loser`
    pub fn record(&mut self, winner: &str, loser: &str) {
        let key = Self::key(winner, loser);
        let first_won = key.0 == winner;
        let entry = self.records.entry(key).or_default();
        if first_won {
            entry.wins += 1;
        } else {
            entry.losses += 1;
        }
    }

    /// Record of the pairing from the perspective of its sorted-first name
    pub fn get(&self, a: &str, b: &str) -> Option<HeadToHead> {
        self.records.get(&Self::key(a, b)).copied()
    }

    /// Record of `name` against `opponent`
    pub fn record_for(&self, name: &str, opponent: &str) -> HeadToHead {
        match self.get(name, opponent) {
            Some(record) if name <= opponent => record,
            Some(record) => record.flipped(),
            None => HeadToHead::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All pairings, ordered by key
    pub fn entries(&self) -> Vec<HeadToHeadEntry> {
        self.records
            .iter()
            .map(|((first, second), record)| HeadToHeadEntry {
                key: format!("{}-vs-{}", first, second),
                first: first.clone(),
                second: second.clone(),
                record: *record,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod ledger_tests;
