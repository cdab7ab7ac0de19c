use super::*;
use crate::builder::BracketBuilder;

fn stored(count: usize) -> (InMemoryStore, StageId) {
    let field: Vec<String> = (0..count).map(|i| format!("bot{i}")).collect();
    let bracket = BracketBuilder::default().build(&field).unwrap();
    let mut store = InMemoryStore::new();
    let stage_id = store.create_stage(bracket).unwrap();
    (store, stage_id)
}

#[test]
fn test_stages_get_sequential_ids() {
    let (mut store, first) = stored(4);
    let second = store
        .create_stage(BracketBuilder::default().build(&["a".to_string(), "b".to_string()]).unwrap())
        .unwrap();

    assert_eq!((first, second), (0, 1));
    assert_eq!(store.select_participants(second).len(), 2);
    assert!(store
        .select_matches(&MatchFilter::stage(second))
        .iter()
        .all(|m| m.stage_id == second));
}

#[test]
fn test_filter_by_group_and_status() {
    let (store, stage_id) = stored(8);

    let losers = store.select_matches(&MatchFilter::stage(stage_id).with_group(Group::Losers));
    assert_eq!(losers.len(), 6);
    assert!(losers.iter().all(|m| m.group == Group::Losers));

    let ready = store.select_matches(
        &MatchFilter::stage(stage_id)
            .with_group(Group::Winners)
            .with_statuses(&[MatchStatus::Ready]),
    );
    assert_eq!(ready.len(), 4);
    assert!(ready.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[test]
fn test_update_unknown_match_fails() {
    let (mut store, stage_id) = stored(4);
    let mut record = store.select_match(stage_id, 0).unwrap();
    record.id = 99;

    assert_eq!(
        store.update_match(record),
        Err(BracketError::MatchNotFound {
            stage_id,
            match_id: 99
        })
    );
}

#[test]
fn test_batch_update_is_all_or_nothing() {
    let (mut store, stage_id) = stored(4);
    let before = store.load_bracket(stage_id).unwrap();

    let mut known = store.select_match(stage_id, 0).unwrap();
    known.status = MatchStatus::Running;
    let mut unknown = known.clone();
    unknown.id = 99;

    assert!(store.update_matches(vec![known.clone(), unknown]).is_err());
    assert_eq!(store.load_bracket(stage_id).unwrap(), before);

    store.update_matches(vec![known]).unwrap();
    assert_eq!(
        store.select_match(stage_id, 0).unwrap().status,
        MatchStatus::Running
    );
}
