//! Scenario A and B of spec.md §8: exact benzene self-match, and benzene as a substructure of
//! toluene with a precisely specified similarity score.

use molmatch::{GraphMode, MatchConfig, MatchOutcome, MatcherHandle};

use crate::{benzene, toluene};

fn assert_matched_with_score(outcome: MatchOutcome, expected: f64) {
    match outcome {
        MatchOutcome::Matched { score } => {
            assert!(
                (score - expected).abs() < 1e-9,
                "expected score {expected}, got {score}"
            );
        }
        other => panic!("expected Matched, got {other:?}"),
    }
}

/// Scenario A — benzene matches itself exactly, scoring `1.0` under both graph modes.
#[test]
fn benzene_matches_itself_exactly() {
    let data = benzene();

    let exact = MatcherHandle::new(
        &data,
        None,
        MatchConfig {
            graph_mode: GraphMode::Exact,
            ..Default::default()
        },
    )
    .unwrap();
    assert_matched_with_score(exact.match_target(&data, 0).unwrap(), 1.0);

    let substructure = MatcherHandle::new(
        &data,
        None,
        MatchConfig {
            graph_mode: GraphMode::Substructure,
            ..Default::default()
        },
    )
    .unwrap();
    assert_matched_with_score(substructure.match_target(&data, 0).unwrap(), 1.0);
}

/// Benzene is not an exact isomorphism of toluene: the extra methyl carbon makes the two graphs
/// different sizes.
#[test]
fn benzene_is_not_an_exact_match_for_toluene() {
    let query = benzene();
    let target = toluene();

    let handle = MatcherHandle::new(
        &query,
        None,
        MatchConfig {
            graph_mode: GraphMode::Exact,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(handle.match_target(&target, 0).unwrap(), MatchOutcome::NoMatch);
}

/// Scenario B — benzene (C6H6) is a substructure of toluene (C7H8): 6 of toluene's 7 heavy
/// atoms, 6 of its 7 heavy bonds, 6 of its 8 hydrogen atoms, 6 of its 8 hydrogen bonds.
///
/// score = (8*6/7 + 4*6/7 + 2*6/8 + 6/8) / 15
#[test]
fn benzene_is_a_substructure_of_toluene_with_the_spec_score() {
    let query = benzene();
    let target = toluene();

    let handle = MatcherHandle::new(
        &query,
        None,
        MatchConfig {
            graph_mode: GraphMode::Substructure,
            ..Default::default()
        },
    )
    .unwrap();

    let heavy_atom_ratio = 6.0 / 7.0;
    let heavy_bond_ratio = 6.0 / 7.0;
    let hydrogen_atom_ratio = 6.0 / 8.0;
    let hydrogen_bond_ratio = 6.0 / 8.0;
    let expected =
        (8.0 * heavy_atom_ratio + 4.0 * heavy_bond_ratio + 2.0 * hydrogen_atom_ratio + hydrogen_bond_ratio) / 15.0;

    assert_matched_with_score(handle.match_target(&target, 0).unwrap(), expected);
}
