//! Scenario F of spec.md §8: a target carrying a multivalent hydrogen (a hydrogen record whose
//! `bound_atom` is itself another hydrogen, not a heavy atom) forces the query into extended
//! form before matching, per §4.1's `isExtendedSearchNeeded`.

use molmatch::{decode, DecodeOptions, GraphMode, MatchConfig, MatchOutcome, MatcherHandle};

use crate::WireBuilder;

/// One oxygen, single-bonded to a hydrogen (`H1`), which is itself single-bonded to a second
/// hydrogen (`H2`) — `H2`'s hydrogen record points at `H1`'s atom index rather than at the
/// oxygen, the wire format's multivalent-hydrogen encoding.
fn oxygen_with_pendant_dihydrogen() -> Vec<u8> {
    let mut b = WireBuilder::new();
    let o = b.hetero(8);
    let h1 = b.hydrogen(o, 1);
    b.hydrogen_bound_to_hydrogen(h1, 1);
    b.build()
}

/// Plain hydroxyl fragment: one oxygen, one ordinary hydrogen.
fn hydroxyl() -> Vec<u8> {
    let mut b = WireBuilder::new();
    let o = b.hetero(8);
    b.hydrogen(o, 1);
    b.build()
}

#[test]
fn non_extended_decode_silently_drops_the_second_hydrogens_bond() {
    let data = oxygen_with_pendant_dihydrogen();

    let non_extended = decode::decode(&data, None, &DecodeOptions::default()).unwrap();
    assert_eq!(non_extended.atom_count(), 1, "hydrogens are never materialised as atoms");
    assert_eq!(non_extended.atom_hydrogens(0), 1, "only the first hydrogen record reaches the oxygen");

    let extended_options = DecodeOptions {
        extended: true,
        ..Default::default()
    };
    let extended = decode::decode(&data, None, &extended_options).unwrap();
    assert_eq!(extended.atom_count(), 3, "oxygen plus both hydrogens");
    assert_eq!(extended.bond_type_between(0, 1), Some(molmatch::BondType::Single));
    assert_eq!(
        extended.bond_type_between(1, 2),
        Some(molmatch::BondType::Single),
        "the second hydrogen's bond to the first is only visible once extended"
    );
    assert_eq!(extended.bond_between(0, 2), None, "oxygen is never directly bonded to the second hydrogen");
}

#[test]
fn extended_search_is_flagged_needed_for_the_multivalent_hydrogen() {
    let data = oxygen_with_pendant_dihydrogen();
    assert!(decode::is_extended_search_needed(&data, false, false, false));
}

#[test]
fn non_multivalent_target_does_not_need_extension() {
    let data = hydroxyl();
    assert!(!decode::is_extended_search_needed(&data, false, false, false));
}

#[test]
fn matcher_finds_the_hydroxyl_inside_the_pendant_dihydrogen_target() {
    let query = hydroxyl();
    let target = oxygen_with_pendant_dihydrogen();

    let handle = MatcherHandle::new(
        &query,
        None,
        MatchConfig {
            graph_mode: GraphMode::Substructure,
            ..Default::default()
        },
    )
    .unwrap();

    assert!(matches!(
        handle.match_target(&target, 0).unwrap(),
        MatchOutcome::Matched { .. }
    ));
}
