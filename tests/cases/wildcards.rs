//! Scenario C of spec.md §8: the `Q` (any-heteroatom) pseudo-atom wildcard.

use molmatch::{GraphMode, MatchConfig, MatchOutcome, MatcherHandle};

use crate::WireBuilder;

const ANY_HETERO: i8 = -(b'Q' as i8);

/// Builds a three-atom chain `a - centre - c`, all single bonds, with `centre`'s atomic number
/// as given (a concrete element or a pseudo-atom sentinel).
fn chain(a: i8, centre: i8, c: i8) -> Vec<u8> {
    let mut b = WireBuilder::new();
    let ia = b.hetero(a);
    let ic = b.hetero(c);
    let centre_idx = if centre == 6 {
        b.carbons(1)
    } else {
        b.hetero(centre)
    };
    b.bond(ia, centre_idx, 1);
    b.bond(centre_idx, ic, 1);
    b.build()
}

fn substructure_handle(query: &[u8]) -> MatcherHandle {
    MatcherHandle::new(
        query,
        None,
        MatchConfig {
            graph_mode: GraphMode::Substructure,
            ..Default::default()
        },
    )
    .unwrap()
}

/// `C-Q-C` matches `C-N-C`: nitrogen is a heteroatom.
#[test]
fn any_hetero_query_matches_nitrogen_bridge() {
    let query = chain(6, ANY_HETERO, 6);
    let target = chain(6, 7, 6);
    let handle = substructure_handle(&query);
    assert!(matches!(
        handle.match_target(&target, 0).unwrap(),
        MatchOutcome::Matched { .. }
    ));
}

/// `C-Q-C` does not match `C-C-C`: carbon is excluded from "any heteroatom".
#[test]
fn any_hetero_query_rejects_all_carbon_bridge() {
    let query = chain(6, ANY_HETERO, 6);
    let target = chain(6, 6, 6);
    let handle = substructure_handle(&query);
    assert_eq!(handle.match_target(&target, 0).unwrap(), MatchOutcome::NoMatch);
}

/// `C-Q-C` also matches an oxygen bridge, not just nitrogen — confirms the wildcard is not
/// accidentally narrowed to one element.
#[test]
fn any_hetero_query_matches_oxygen_bridge() {
    let query = chain(6, ANY_HETERO, 6);
    let target = chain(6, 8, 6);
    let handle = substructure_handle(&query);
    assert!(matches!(
        handle.match_target(&target, 0).unwrap(),
        MatchOutcome::Matched { .. }
    ));
}
