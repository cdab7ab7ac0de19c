use super::*;
use crate::builder::BracketBuilder;
use crate::locator::ready_matches;
use crate::model::{Side, SlotResult};
use crate::store::InMemoryStore;

fn stored(count: usize) -> (InMemoryStore, StageId) {
    let field: Vec<String> = (0..count).map(|i| format!("bot{i}")).collect();
    let bracket = BracketBuilder::default().build(&field).unwrap();
    let mut store = InMemoryStore::new();
    let stage_id = store.create_stage(bracket).unwrap();
    (store, stage_id)
}

fn report_for(record: &Match, winner_side: Side) -> MatchReport {
    let (first, second) = record.participants().unwrap();
    let (winner, loser) = match winner_side {
        Side::Opponent1 => (first, second),
        Side::Opponent2 => (second, first),
    };
    MatchReport {
        winner,
        loser,
        winner_score: 2,
        loser_score: 1,
    }
}

#[test]
fn test_apply_result_completes_match() {
    let (mut store, stage_id) = stored(4);
    let record = ready_matches(&store, stage_id).unwrap().remove(0);

    let report = report_for(&record, Side::Opponent1);
    let touched = apply_result(&mut store, stage_id, record.id, &report).unwrap();
    assert!(touched.contains(&record.id));

    let done = store.select_match(stage_id, record.id).unwrap();
    assert_eq!(done.status, MatchStatus::Completed);
    assert_eq!(done.winner_id(), Some(report.winner));
    assert_eq!(done.opponent1.score, Some(2));
    assert_eq!(done.opponent2.score, Some(1));
}

#[test]
fn test_winner_matched_by_identity_not_position() {
    let (mut store, stage_id) = stored(4);
    let record = ready_matches(&store, stage_id).unwrap().remove(0);

    // The series may have seated opponent2 as white; the slot follows identity.
    let report = report_for(&record, Side::Opponent2);
    apply_result(&mut store, stage_id, record.id, &report).unwrap();

    let done = store.select_match(stage_id, record.id).unwrap();
    assert_eq!(done.winner, Some(Side::Opponent2));
    assert_eq!(done.opponent2.result, Some(SlotResult::Win));
    assert_eq!(done.opponent2.score, Some(2));
    assert_eq!(done.opponent1.result, Some(SlotResult::Loss));
}

#[test]
fn test_double_apply_is_rejected() {
    let (mut store, stage_id) = stored(4);
    let record = ready_matches(&store, stage_id).unwrap().remove(0);
    let report = report_for(&record, Side::Opponent1);

    apply_result(&mut store, stage_id, record.id, &report).unwrap();
    let before = store.load_bracket(stage_id).unwrap();

    let second = apply_result(&mut store, stage_id, record.id, &report);
    assert_eq!(second, Err(BracketError::AlreadyCompleted(record.id)));
    assert_eq!(store.load_bracket(stage_id).unwrap(), before);
}

#[test]
fn test_unknown_stage_and_match() {
    let (mut store, stage_id) = stored(4);
    let report = MatchReport {
        winner: 0,
        loser: 1,
        winner_score: 2,
        loser_score: 0,
    };

    assert_eq!(
        apply_result(&mut store, 42, 0, &report),
        Err(BracketError::StageNotFound(42))
    );
    assert_eq!(
        apply_result(&mut store, stage_id, 999, &report),
        Err(BracketError::MatchNotFound {
            stage_id,
            match_id: 999
        })
    );
}

#[test]
fn test_result_for_pending_match_is_rejected() {
    let (mut store, stage_id) = stored(4);
    let pending = store
        .select_matches(&crate::store::MatchFilter::stage(stage_id).with_statuses(&[MatchStatus::Pending]))
        .remove(0);
    let report = MatchReport {
        winner: 0,
        loser: 1,
        winner_score: 2,
        loser_score: 0,
    };

    assert_eq!(
        apply_result(&mut store, stage_id, pending.id, &report),
        Err(BracketError::MatchNotReady(pending.id))
    );
}

#[test]
fn test_outsider_cannot_win() {
    let (mut store, stage_id) = stored(4);
    let record = ready_matches(&store, stage_id).unwrap().remove(0);
    let (first, _) = record.participants().unwrap();
    let outsider = (0..4).find(|id| record.side_of(*id).is_none()).unwrap();

    let report = MatchReport {
        winner: outsider,
        loser: first,
        winner_score: 2,
        loser_score: 0,
    };
    assert_eq!(
        apply_result(&mut store, stage_id, record.id, &report),
        Err(BracketError::NotAnOpponent {
            match_id: record.id,
            participant_id: outsider
        })
    );

    let self_report = MatchReport {
        winner: first,
        loser: first,
        winner_score: 2,
        loser_score: 0,
    };
    assert!(matches!(
        apply_result(&mut store, stage_id, record.id, &self_report),
        Err(BracketError::NotAnOpponent { .. })
    ));
}

#[test]
fn test_start_match_marks_running_and_stays_playable() {
    let (mut store, stage_id) = stored(4);
    let record = ready_matches(&store, stage_id).unwrap().remove(0);

    let running = start_match(&mut store, stage_id, record.id).unwrap();
    assert_eq!(running.status, MatchStatus::Running);

    let frontier = ready_matches(&store, stage_id).unwrap();
    assert!(frontier.iter().any(|m| m.id == record.id && m.status == MatchStatus::Running));

    apply_result(&mut store, stage_id, record.id, &report_for(&record, Side::Opponent1)).unwrap();
    assert_eq!(
        start_match(&mut store, stage_id, record.id),
        Err(BracketError::AlreadyCompleted(record.id))
    );
}

#[test]
fn test_frontier_unlocks_after_results() {
    let (mut store, stage_id) = stored(4);
    let opening = ready_matches(&store, stage_id).unwrap();
    assert_eq!(opening.len(), 2);

    for record in &opening {
        apply_result(&mut store, stage_id, record.id, &report_for(record, Side::Opponent1)).unwrap();
    }

    let next: Vec<_> = ready_matches(&store, stage_id)
        .unwrap()
        .into_iter()
        .map(|m| m.group)
        .collect();
    assert_eq!(next, vec![crate::model::Group::Winners, crate::model::Group::Losers]);
}

#[test]
fn test_locator_unknown_stage() {
    let (store, _) = stored(4);
    assert_eq!(
        ready_matches(&store, 7).unwrap_err(),
        BracketError::StageNotFound(7)
    );
}

#[test]
fn test_slot_writes_into_pending_matches_are_stored() {
    let (mut store, stage_id) = stored(8);
    let record = ready_matches(&store, stage_id).unwrap().remove(0);
    let report = report_for(&record, Side::Opponent2);

    let touched = apply_result(&mut store, stage_id, record.id, &report).unwrap();

    let win_ref = record.winner_to.unwrap();
    let lose_ref = record.loser_to.unwrap();
    assert!(touched.contains(&win_ref.match_id));
    assert!(touched.contains(&lose_ref.match_id));

    // Both targets still wait on another first-round match.
    let next = store.select_match(stage_id, win_ref.match_id).unwrap();
    assert_eq!(next.status, MatchStatus::Pending);
    assert_eq!(
        next.opponent(win_ref.side).slot,
        crate::model::Slot::Participant(report.winner)
    );
    let dropped = store.select_match(stage_id, lose_ref.match_id).unwrap();
    assert_eq!(dropped.status, MatchStatus::Pending);
    assert_eq!(
        dropped.opponent(lose_ref.side).slot,
        crate::model::Slot::Participant(report.loser)
    );
}
