use super::*;
use crate::model::{Group, MatchStatus, Slot};

fn names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("bot{i}")).collect()
}

fn leaf_slots(bracket: &Bracket) -> Vec<Slot> {
    bracket
        .group_matches(Group::Winners)
        .into_iter()
        .filter(|m| m.round == 1)
        .flat_map(|m| [m.opponent1.slot, m.opponent2.slot])
        .collect()
}

#[test]
fn test_bracket_size() {
    assert_eq!(bracket_size(0), 2);
    assert_eq!(bracket_size(2), 2);
    assert_eq!(bracket_size(3), 4);
    assert_eq!(bracket_size(8), 8);
    assert_eq!(bracket_size(9), 16);
}

#[test]
fn test_leaf_slots_and_byes_for_every_field_size() {
    for count in 2..=33 {
        for balance_byes in [true, false] {
            let settings = StageSettings {
                balance_byes,
                ..Default::default()
            };
            let bracket = BracketBuilder::new(settings).build(&names(count)).unwrap();
            let size = bracket_size(count);

            let leaves = leaf_slots(&bracket);
            assert_eq!(leaves.len(), size);
            assert_eq!(leaves.iter().filter(|s| **s == Slot::Bye).count(), size - count);
            assert_eq!(bracket.stage.size as usize, size);

            let first_round = bracket
                .matches
                .iter()
                .filter(|m| m.group == Group::Winners && m.round == 1)
                .count();
            assert_eq!(first_round, size / 2);
        }
    }
}

#[test]
fn test_rejects_fewer_than_two_competitors() {
    let builder = BracketBuilder::default();
    assert!(matches!(
        builder.build(&names(1)),
        Err(BracketError::Configuration(_))
    ));
    assert!(matches!(
        builder.build(&[]),
        Err(BracketError::Configuration(_))
    ));
}

#[test]
fn test_rejects_duplicate_names() {
    let field = vec!["alice".to_string(), "bob".to_string(), "alice".to_string()];
    assert!(matches!(
        BracketBuilder::default().build(&field),
        Err(BracketError::Configuration(_))
    ));
}

#[test]
fn test_match_counts_for_eight() {
    let bracket = BracketBuilder::default().build(&names(8)).unwrap();

    assert_eq!(bracket.group_matches(Group::Winners).len(), 7);
    assert_eq!(bracket.group_matches(Group::Losers).len(), 6);
    assert_eq!(bracket.group_matches(Group::GrandFinal).len(), 2);
    assert_eq!(bracket.round_count(Group::Winners), 3);
    assert_eq!(bracket.round_count(Group::Losers), 4);
}

#[test]
fn test_single_grand_final_has_no_reset() {
    let settings = StageSettings {
        grand_final: GrandFinalMode::Single,
        ..Default::default()
    };
    let bracket = BracketBuilder::new(settings).build(&names(4)).unwrap();

    let finals = bracket.group_matches(Group::GrandFinal);
    assert_eq!(finals.len(), 1);
    assert!(finals[0].reset_to.is_none());
}

#[test]
fn test_full_field_starts_with_first_round_ready() {
    let bracket = BracketBuilder::default().build(&names(8)).unwrap();

    for m in &bracket.matches {
        let expected = if m.group == Group::Winners && m.round == 1 {
            MatchStatus::Ready
        } else {
            MatchStatus::Pending
        };
        assert_eq!(m.status, expected, "match {}", m.id);
    }
}

#[test]
fn test_bye_auto_advances() {
    let bracket = BracketBuilder::default().build(&names(3)).unwrap();

    let byes: Vec<_> = bracket.matches.iter().filter(|m| m.is_bye()).collect();
    assert_eq!(byes.len(), 1);
    let bye = byes[0];
    assert_eq!(bye.group, Group::Winners);

    let advanced = bye.winner_id().unwrap();
    let target = bye.winner_to.unwrap();
    let next = bracket.match_by_id(target.match_id).unwrap();
    assert_eq!(next.side_of(advanced), Some(target.side));

    // Nobody drops out of a bye: the losers slot it feeds holds a bye.
    let drop = bye.loser_to.unwrap();
    let losers_match = bracket.match_by_id(drop.match_id).unwrap();
    assert_eq!(losers_match.opponent(drop.side).slot, Slot::Bye);
}

#[test]
fn test_balanced_byes_never_pair_two_byes() {
    for count in 2..=32 {
        let bracket = BracketBuilder::default().build(&names(count)).unwrap();
        let doubled = bracket
            .matches
            .iter()
            .filter(|m| m.group == Group::Winners && m.round == 1)
            .any(|m| m.opponent1.slot == Slot::Bye && m.opponent2.slot == Slot::Bye);
        assert!(!doubled, "field of {count} paired two byes");
    }
}

#[test]
fn test_unbalanced_byes_skip_empty_matches() {
    let settings = StageSettings {
        balance_byes: false,
        ..Default::default()
    };
    let bracket = BracketBuilder::new(settings).build(&names(5)).unwrap();

    let skipped = bracket
        .matches
        .iter()
        .filter(|m| m.status == MatchStatus::Skipped)
        .count();
    assert!(skipped > 0);
}

#[test]
fn test_losers_of_first_round_drop_into_losers_bracket() {
    let bracket = BracketBuilder::default().build(&names(4)).unwrap();

    for m in bracket.matches.iter().filter(|m| m.group == Group::Winners) {
        let drop = m.loser_to.expect("every winners match feeds the losers bracket");
        let target = bracket.match_by_id(drop.match_id).unwrap();
        assert_eq!(target.group, Group::Losers);
    }
}

#[test]
fn test_dropped_losers_avoid_first_round_rematches() {
    for w1_side in [Side::Opponent1, Side::Opponent2] {
        for w2_side in [Side::Opponent1, Side::Opponent2] {
            let mut bracket = BracketBuilder::default().build(&names(8)).unwrap();
            let round = |bracket: &Bracket, group: Group, round: u32| -> Vec<MatchId> {
                bracket
                    .group_matches(group)
                    .into_iter()
                    .filter(|m| m.round == round)
                    .map(|m| m.id)
                    .collect()
            };

            let first_round = round(&bracket, Group::Winners, 1);
            let first_pairs: Vec<(u32, u32)> = first_round
                .iter()
                .map(|id| bracket.match_by_id(*id).unwrap().participants().unwrap())
                .collect();
            for id in first_round {
                bracket.record_result(id, w1_side, 2, 0);
            }
            for id in round(&bracket, Group::Losers, 1) {
                bracket.record_result(id, Side::Opponent1, 2, 0);
            }
            for id in round(&bracket, Group::Winners, 2) {
                bracket.record_result(id, w2_side, 2, 1);
            }

            for id in round(&bracket, Group::Losers, 2) {
                let (a, b) = bracket.match_by_id(id).unwrap().participants().unwrap();
                assert!(
                    !first_pairs.contains(&(a, b)) && !first_pairs.contains(&(b, a)),
                    "losers round 2 repeats {a} vs {b}"
                );
            }
        }
    }
}
