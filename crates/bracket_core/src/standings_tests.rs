use super::*;
use crate::applier::{apply_result, MatchReport};
use crate::builder::BracketBuilder;
use crate::locator::next_ready_match;
use crate::model::{GrandFinalMode, StageSettings};
use crate::store::InMemoryStore;

/// Play every match, the lower participant id always winning
fn play_out(store: &mut InMemoryStore, stage_id: StageId) {
    while let Some(record) = next_ready_match(store, stage_id).unwrap() {
        let (a, b) = record.participants().unwrap();
        let report = MatchReport {
            winner: a.min(b),
            loser: a.max(b),
            winner_score: 2,
            loser_score: 0,
        };
        apply_result(store, stage_id, record.id, &report).unwrap();
    }
}

fn stored(count: usize, settings: StageSettings) -> (InMemoryStore, StageId) {
    let field: Vec<String> = (0..count).map(|i| format!("bot{i}")).collect();
    let bracket = BracketBuilder::new(settings).build(&field).unwrap();
    let mut store = InMemoryStore::new();
    let stage_id = store.create_stage(bracket).unwrap();
    (store, stage_id)
}

#[test]
fn test_unfinished_bracket_has_no_standings() {
    let (store, stage_id) = stored(4, StageSettings::default());
    assert_eq!(
        stage_standings(&store, stage_id),
        Err(BracketError::Unfinished(stage_id))
    );
}

#[test]
fn test_podium_for_four() {
    let (mut store, stage_id) = stored(4, StageSettings::default());
    play_out(&mut store, stage_id);

    let standings = stage_standings(&store, stage_id).unwrap();
    assert_eq!(standings.len(), 4);
    assert_eq!(standings[0].rank, 1);
    assert_eq!(standings[0].name, "bot0");
    assert_eq!(standings[1].rank, 2);
    assert_eq!(standings[2].rank, 3);
    assert_eq!(standings[3].rank, 4);
}

#[test]
fn test_same_round_eliminations_share_rank() {
    let (mut store, stage_id) = stored(8, StageSettings::default());
    play_out(&mut store, stage_id);

    let ranks: Vec<u32> = stage_standings(&store, stage_id)
        .unwrap()
        .iter()
        .map(|s| s.rank)
        .collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5, 5, 7, 7]);
}

#[test]
fn test_two_competitors_place_two() {
    let settings = StageSettings {
        grand_final: GrandFinalMode::Single,
        ..Default::default()
    };
    let (mut store, stage_id) = stored(2, settings);
    play_out(&mut store, stage_id);

    let standings = stage_standings(&store, stage_id).unwrap();
    let names: Vec<_> = standings.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["bot0", "bot1"]);
}

#[test]
fn test_byes_are_not_placed() {
    let (mut store, stage_id) = stored(3, StageSettings::default());
    play_out(&mut store, stage_id);

    let standings = stage_standings(&store, stage_id).unwrap();
    assert_eq!(standings.len(), 3);
    assert_eq!(standings[2].rank, 3);
}
