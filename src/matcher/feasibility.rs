//! The chemistry-aware feasibility test consulted at every VF2 candidate pair (§4.2).
//!
//! `is_feasible_pair` runs the six-step cascade in the order the spec lists it, short-circuiting
//! on the first failing step so the common case (label mismatch) never touches the more
//! expensive look-ahead count.

use crate::core::atom::{AtomKind, BondType};
use crate::core::constants::{CARBON_ATOM_NUMBER, HYDROGEN_ATOM_NUMBER, is_halogen, is_metal};
use crate::core::molecule::Molecule;
use crate::matcher::{ChargeMode, GraphMode, IsotopeMode, MatchConfig};

/// Atom label matching cascade (§4.2 "Atom label matching").
///
/// In exact mode, atom numbers must be identical; substructure mode runs the pseudo-atom
/// cascade, which is asymmetric: the *query* side's wildcard kind decides what it accepts, but
/// a pseudo-atom appearing on the *target* side is only ever matched by a query `Q` against a
/// target `M` or `X`.
pub fn atom_label_matches(query_number: i8, target_number: i8, exact: bool) -> bool {
    if exact {
        return query_number == target_number;
    }

    let query = AtomKind::from_atomic_number(query_number);
    let target = AtomKind::from_atomic_number(target_number);

    if matches!(query, AtomKind::Unknown) || matches!(target, AtomKind::Unknown) {
        return false;
    }
    if query == target || matches!(query, AtomKind::RGroup) {
        return true;
    }
    if target.is_wildcard() {
        return matches!(query, AtomKind::AnyHetero) && matches!(target, AtomKind::AnyMetal | AtomKind::AnyHalogen);
    }
    match query {
        AtomKind::AnyHetero => target_number != CARBON_ATOM_NUMBER && target_number != HYDROGEN_ATOM_NUMBER,
        AtomKind::AnyMetal => is_metal(target_number),
        AtomKind::AnyHalogen => is_halogen(target_number),
        _ => false,
    }
}

/// Bond type matching (§4.2 "Bond matching").
pub fn bond_type_matches(query: BondType, target: BondType, exact: bool) -> bool {
    if exact { query == target } else { query.accepts(target) }
}

/// Charge feasibility (§4.2, step 2).
pub fn charge_matches(query: Option<i8>, target: Option<i8>, mode: ChargeMode) -> bool {
    match mode {
        ChargeMode::Ignore => true,
        ChargeMode::DefaultAsUncharged => query.unwrap_or(0) == target.unwrap_or(0),
        ChargeMode::DefaultAsAny => {
            let q = query.unwrap_or(0);
            q == 0 || q == target.unwrap_or(0)
        }
    }
}

/// Isotope feasibility (§4.2, step 3), structurally identical to [`charge_matches`].
pub fn isotope_matches(query: Option<i8>, target: Option<i8>, mode: IsotopeMode) -> bool {
    match mode {
        IsotopeMode::Ignore => true,
        IsotopeMode::DefaultAsStandard => query.unwrap_or(0) == target.unwrap_or(0),
        IsotopeMode::DefaultAsAny => {
            let q = query.unwrap_or(0);
            q == 0 || q == target.unwrap_or(0)
        }
    }
}

/// Hydrogen-count feasibility (§4.2, step 4).
///
/// The `queryH <= targetH` relaxation only applies in substructure mode, and only when neither
/// molecule carries any pseudo-atom anywhere — once wildcards are in play the hydrogen count is
/// no longer a reliable bound, so the check is skipped entirely.
pub fn hydrogen_count_feasible(query_h: u8, target_h: u8, exact: bool, either_has_pseudo_atom: bool) -> bool {
    if exact {
        query_h == target_h
    } else if either_has_pseudo_atom {
        true
    } else {
        query_h <= target_h
    }
}

/// Existing-mapping bond consistency (§4.2, step 5).
///
/// Every already-mapped neighbour of `query_atom` must have a correspondingly matching bond to
/// `target_atom`'s image; in exact mode the check also runs symmetrically from the target side,
/// rejecting a target bond to an already-mapped atom that has no query-side counterpart.
pub fn mapped_neighbours_consistent(
    query: &Molecule,
    target: &Molecule,
    query_atom: usize,
    target_atom: usize,
    query_core: &[i32],
    target_core: &[i32],
    exact: bool,
) -> bool {
    for &neighbour in query.bonded_atoms(query_atom) {
        let neighbour = neighbour as usize;
        let image = query_core[neighbour];
        if image < 0 {
            continue;
        }
        let image = image as usize;
        let Some(target_bond) = target.bond_type_between(target_atom, image) else {
            return false;
        };
        let query_bond = query
            .bond_type_between(query_atom, neighbour)
            .expect("adjacency and bond matrix agree");
        if !bond_type_matches(query_bond, target_bond, exact) {
            return false;
        }
    }

    if exact {
        for &neighbour in target.bonded_atoms(target_atom) {
            let neighbour = neighbour as usize;
            let image = target_core[neighbour];
            if image < 0 {
                continue;
            }
            if query.bond_between(query_atom, image as usize).is_none() {
                return false;
            }
        }
    }

    true
}

/// Look-ahead feasibility (§4.2, step 6): bounds the count of still-unmapped neighbours on each
/// side, so a branch that could never grow to cover the query is pruned before recursing.
pub fn look_ahead_feasible(
    query: &Molecule,
    target: &Molecule,
    query_atom: usize,
    target_atom: usize,
    query_core: &[i32],
    target_core: &[i32],
    exact: bool,
) -> bool {
    let new_query = query
        .bonded_atoms(query_atom)
        .iter()
        .filter(|&&n| query_core[n as usize] < 0)
        .count();
    let new_target = target
        .bonded_atoms(target_atom)
        .iter()
        .filter(|&&n| target_core[n as usize] < 0)
        .count();
    if exact { new_query == new_target } else { new_query <= new_target }
}

/// Runs the full six-step feasibility cascade for adding `(query_atom, target_atom)` to the
/// current partial mapping.
pub fn is_feasible_pair(
    query: &Molecule,
    target: &Molecule,
    query_atom: usize,
    target_atom: usize,
    query_core: &[i32],
    target_core: &[i32],
    config: MatchConfig,
) -> bool {
    let exact = matches!(config.graph_mode, GraphMode::Exact);

    if !atom_label_matches(query.atom_number(query_atom), target.atom_number(target_atom), exact) {
        return false;
    }
    if !charge_matches(query.charge(query_atom), target.charge(target_atom), config.charge_mode) {
        return false;
    }
    if !isotope_matches(query.mass(query_atom), target.mass(target_atom), config.isotope_mode) {
        return false;
    }
    let either_has_pseudo_atom = query.has_pseudo_atom() || target.has_pseudo_atom();
    if !hydrogen_count_feasible(
        query.atom_hydrogens(query_atom),
        target.atom_hydrogens(target_atom),
        exact,
        either_has_pseudo_atom,
    ) {
        return false;
    }
    if !mapped_neighbours_consistent(query, target, query_atom, target_atom, query_core, target_core, exact) {
        return false;
    }
    look_ahead_feasible(query, target, query_atom, target_atom, query_core, target_core, exact)
}
