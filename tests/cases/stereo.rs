//! Scenario D of spec.md §8: a defined tetrahedral stereocentre must match under `STEREO_STRICT`
//! only when the target's normalized parity agrees, and is not consulted at all under
//! `STEREO_IGNORE`.

use molmatch::{GraphMode, MatchConfig, MatchOutcome, MatcherHandle, StereoMode, TetrahedralStereo};

use crate::WireBuilder;

/// A carbon centre bonded to four distinct halogens (F, Cl, Br, I), atom indices `1..=4` in
/// ascending atomic-number order so `bonded_atoms` returns them already sorted — the identity
/// permutation, which is even, so the centre's own parity needs no reordering flip.
fn tetrahedral_centre(parity: TetrahedralStereo) -> Vec<u8> {
    let mut b = WireBuilder::new();
    let f = b.hetero(9);
    let cl = b.hetero(17);
    let br = b.hetero(35);
    let i = b.hetero(53);
    let centre = b.carbons(1);
    b.bond(centre, f, 1);
    b.bond(centre, cl, 1);
    b.bond(centre, br, 1);
    b.bond(centre, i, 1);
    b.atom_stereo(centre, parity as i8);
    b.build()
}

fn handle(query: &[u8], stereo_mode: StereoMode) -> MatcherHandle {
    MatcherHandle::new(
        query,
        None,
        MatchConfig {
            graph_mode: GraphMode::Exact,
            stereo_mode,
            ..Default::default()
        },
    )
    .unwrap()
}

#[test]
fn matching_parity_succeeds_under_strict_mode() {
    let query = tetrahedral_centre(TetrahedralStereo::Clockwise);
    let target = tetrahedral_centre(TetrahedralStereo::Clockwise);

    let h = handle(&query, StereoMode::Strict);
    assert!(matches!(
        h.match_target(&target, 0).unwrap(),
        MatchOutcome::Matched { .. }
    ));
}

#[test]
fn opposite_parity_fails_under_strict_mode() {
    let query = tetrahedral_centre(TetrahedralStereo::Clockwise);
    let target = tetrahedral_centre(TetrahedralStereo::AntiClockwise);

    let h = handle(&query, StereoMode::Strict);
    assert_eq!(h.match_target(&target, 0).unwrap(), MatchOutcome::NoMatch);
}

#[test]
fn opposite_parity_still_matches_under_ignore_mode() {
    let query = tetrahedral_centre(TetrahedralStereo::Clockwise);
    let target = tetrahedral_centre(TetrahedralStereo::AntiClockwise);

    let h = handle(&query, StereoMode::Ignore);
    assert!(matches!(
        h.match_target(&target, 0).unwrap(),
        MatchOutcome::Matched { .. }
    ));
}
