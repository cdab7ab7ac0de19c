//! Result propagation through the bracket graph
//!
//! Completing a match writes its winner and loser into the slots named by the
//! match's edges, then settles every touched match: two participants make a
//! match ready, a participant facing a bye advances without play, and two byes
//! skip the match and push byes further down.

use std::collections::{BTreeSet, VecDeque};

use tracing::debug;

use crate::model::{Bracket, MatchId, MatchStatus, Side, Slot, SlotRef, SlotResult};

impl Bracket {
    /// Record a played result and propagate it.
    ///
    /// Returns every match id whose record changed, including `id` itself and
    /// downstream matches that only received a slot.
    /// Callers validate the match first; this only mutates.
    pub(crate) fn record_result(
        &mut self,
        id: MatchId,
        winner: Side,
        winner_score: u32,
        loser_score: u32,
    ) -> BTreeSet<MatchId> {
        if let Some(record) = self.match_mut(id) {
            let won = record.opponent_mut(winner);
            won.score = Some(winner_score);
            won.result = Some(SlotResult::Win);
            let lost = record.opponent_mut(winner.other());
            lost.score = Some(loser_score);
            lost.result = Some(SlotResult::Loss);
            record.winner = Some(winner);
            record.status = MatchStatus::Completed;
        }

        let mut touched = BTreeSet::from([id]);
        let downstream = self.advance(id);
        touched.extend(downstream.iter().copied());
        touched.extend(self.settle(downstream));
        touched
    }

    /// Settle matches starting from `seeds` until nothing else changes.
    ///
    /// Returns every match whose status or slots changed.
    pub(crate) fn settle(&mut self, seeds: impl IntoIterator<Item = MatchId>) -> BTreeSet<MatchId> {
        let mut queue: VecDeque<MatchId> = seeds.into_iter().collect();
        let mut touched = BTreeSet::new();

        while let Some(id) = queue.pop_front() {
            let Some(record) = self.match_mut(id) else {
                continue;
            };
            if record.status.is_settled() || record.status == MatchStatus::Running {
                continue;
            }

            match (record.opponent1.slot, record.opponent2.slot) {
                (Slot::Participant(_), Slot::Participant(_)) => {
                    if record.status == MatchStatus::Pending {
                        record.status = MatchStatus::Ready;
                        touched.insert(id);
                    }
                }
                (Slot::Participant(_), Slot::Bye) | (Slot::Bye, Slot::Participant(_)) => {
                    let side = if record.opponent1.slot == Slot::Bye {
                        Side::Opponent2
                    } else {
                        Side::Opponent1
                    };
                    record.opponent_mut(side).result = Some(SlotResult::Win);
                    record.winner = Some(side);
                    record.status = MatchStatus::Completed;
                    debug!(match_id = id, "bye advanced without play");
                    touched.insert(id);
                    let targets = self.advance(id);
                    touched.extend(targets.iter().copied());
                    queue.extend(targets);
                }
                (Slot::Bye, Slot::Bye) => {
                    record.status = MatchStatus::Skipped;
                    debug!(match_id = id, "match skipped");
                    touched.insert(id);
                    let targets = self.advance(id);
                    touched.extend(targets.iter().copied());
                    queue.extend(targets);
                }
                _ => {}
            }
        }

        touched
    }

    /// Write a settled match's winner and loser into their downstream slots.
    fn advance(&mut self, id: MatchId) -> Vec<MatchId> {
        let Some(record) = self.match_by_id(id) else {
            return Vec::new();
        };

        let (winner_slot, loser_slot) = match record.winner {
            Some(side) => (record.opponent(side).slot, record.opponent(side.other()).slot),
            None => (Slot::Bye, Slot::Bye),
        };
        let mut writes: Vec<(SlotRef, Slot)> = Vec::new();
        if let Some(target) = record.winner_to {
            writes.push((target, winner_slot));
        }
        if let Some(target) = record.loser_to {
            writes.push((target, loser_slot));
        }
        if let Some(reset) = record.reset_to {
            // The reset is only needed when the winners-bracket champion loses.
            let (first, second) = if record.winner == Some(Side::Opponent2) {
                (record.opponent1.slot, record.opponent2.slot)
            } else {
                (Slot::Bye, Slot::Bye)
            };
            writes.push((SlotRef { match_id: reset, side: Side::Opponent1 }, first));
            writes.push((SlotRef { match_id: reset, side: Side::Opponent2 }, second));
        }

        let mut targets = Vec::with_capacity(writes.len());
        for (target, slot) in writes {
            if let Some(next) = self.match_mut(target.match_id) {
                next.opponent_mut(target.side).slot = slot;
                debug!(from = id, to = target.match_id, ?slot, "slot resolved");
                targets.push(target.match_id);
            }
        }
        targets.dedup();
        targets
    }
}

#[cfg(test)]
#[path = "progression_tests.rs"]
mod progression_tests;
