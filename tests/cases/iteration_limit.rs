//! Scenario E of spec.md §8: the `iteration_limit` budget deterministically cuts off a search
//! before it concludes, and a practically unlimited budget always lets it conclude.
//!
//! `vf2::run` decrements its counter once per target-candidate examination and returns
//! `LimitExceeded` the instant the counter reaches zero (see `src/matcher/vf2.rs`). With
//! `iteration_limit == 1` the counter starts at `1` and hits zero on the very first candidate
//! examined, so `LimitExceeded` is guaranteed for any query with at least one atom and any
//! target with at least one candidate to offer it — independent of whether a mapping actually
//! exists. That determinism is what this test exercises, rather than hand-counting how many
//! candidates a specific pathological graph would take.

use molmatch::{GraphMode, MatchConfig, MatchOutcome, MatcherHandle};

use crate::WireBuilder;

/// A fully-connected clique of `n` carbons — every atom bonded to every other. High automorphism
/// count (any permutation of the clique's atoms is itself a valid mapping) makes this a
/// reasonable stand-in for spec.md's "pathological, highly symmetric" dense query/target.
fn carbon_clique(n: u16) -> Vec<u8> {
    let mut b = WireBuilder::new();
    let first = b.carbons(n);
    for i in 0..n {
        for j in (i + 1)..n {
            b.bond(first + i, first + j, 1);
        }
    }
    b.build()
}

#[test]
fn tiny_iteration_budget_is_exceeded_even_though_a_mapping_exists() {
    let data = carbon_clique(6);
    let handle = MatcherHandle::new(
        &data,
        None,
        MatchConfig {
            graph_mode: GraphMode::Exact,
            ..Default::default()
        },
    )
    .unwrap();

    // Self-match: a mapping certainly exists (the identity), but the budget is cut to one
    // candidate examination.
    assert_eq!(handle.match_target(&data, 1).unwrap(), MatchOutcome::LimitExceeded);
}

#[test]
fn practically_unlimited_budget_always_resolves_to_a_definite_outcome() {
    let data = carbon_clique(6);
    let handle = MatcherHandle::new(
        &data,
        None,
        MatchConfig {
            graph_mode: GraphMode::Exact,
            ..Default::default()
        },
    )
    .unwrap();

    let outcome = handle.match_target(&data, 100_000_000).unwrap();
    assert_eq!(outcome, MatchOutcome::Matched { score: 1.0 });
}

#[test]
fn zero_iteration_limit_means_unlimited() {
    let data = carbon_clique(6);
    let handle = MatcherHandle::new(
        &data,
        None,
        MatchConfig {
            graph_mode: GraphMode::Exact,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(
        handle.match_target(&data, 0).unwrap(),
        MatchOutcome::Matched { score: 1.0 }
    );
}
