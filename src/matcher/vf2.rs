//! The VF2 search proper (§4.2, §9).
//!
//! Implemented as an explicit loop over the current core length rather than language-level
//! recursion, per §9's design note: the simulated call stack is the `cursors` vector, one entry
//! per query atom, so its depth is bounded by the query's atom count regardless of target size.
//!
//! Each query atom is visited in [`QueryOrder`]'s fixed sequence. A level's "cursor" records
//! which target candidate it last tried, so that on backtrack the search resumes from the next
//! one rather than rescanning from the start — mirroring `vf2state_next_target`'s persistent
//! `targetSelector`/`targetIdx` fields.

use crate::core::constants::HYDROGEN_ATOM_NUMBER;
use crate::core::error::MatchOutcome;
use crate::core::molecule::Molecule;
use crate::matcher::feasibility::is_feasible_pair;
use crate::matcher::order::QueryOrder;
use crate::matcher::score::similarity_score;
use crate::matcher::stereo::validate_stereo;
use crate::matcher::{GraphMode, MatchConfig, StereoMode};

const UNDEFINED_CORE: i32 = -1;

/// Cheap size-based rejection before any candidate pair is ever tried (§4.2 "Pre-filters").
fn prefilter_passes(query: &Molecule, target: &Molecule, config: MatchConfig) -> bool {
    match config.graph_mode {
        GraphMode::Substructure => {
            query.heavy_atom_count() + query.hydrogen_atom_count() <= target.heavy_atom_count() + target.hydrogen_atom_count()
                && query.atom_count() <= target.atom_count()
                && query.bond_count() <= target.bond_count()
        }
        GraphMode::Exact => {
            query.heavy_atom_count() == target.heavy_atom_count()
                && query.hydrogen_atom_count() == target.hydrogen_atom_count()
                && query.heavy_bond_count() == target.heavy_bond_count()
                && query.hydrogen_bond_count() == target.hydrogen_bond_count()
        }
    }
}

/// Advances a level's cursor to the next candidate target atom for `query_atom`'s pairing.
///
/// When the query atom already has a mapped parent, candidates are restricted to the parent
/// image's bonded neighbours (the core VF2 pruning); an unplaced component root instead scans
/// every unmapped target atom in ascending index order.
fn next_candidate(target: &Molecule, parent_image: Option<usize>, target_core: &[i32], cursor: &mut i64) -> Option<usize> {
    match parent_image {
        Some(image) => {
            let neighbours = target.bonded_atoms(image);
            let mut selector = *cursor + 1;
            while (selector as usize) < neighbours.len() {
                let candidate = neighbours[selector as usize] as usize;
                if target_core[candidate] < 0 {
                    *cursor = selector;
                    return Some(candidate);
                }
                selector += 1;
            }
            *cursor = selector;
            None
        }
        None => {
            let mut idx = *cursor + 1;
            let atom_count = target.atom_count() as i64;
            while idx < atom_count {
                if target_core[idx as usize] < 0 {
                    *cursor = idx;
                    return Some(idx as usize);
                }
                idx += 1;
            }
            *cursor = idx;
            None
        }
    }
}

/// The `restH` rejection rule (§4.2 "Solution validation"): a query atom flagged `restH` may not
/// be matched onto a target atom with *more* non-hydrogen neighbours than the query atom itself
/// has, since `restH` promises the query fully accounts for the real substituent's connectivity.
fn rest_h_valid(query: &Molecule, target: &Molecule, query_core: &[i32]) -> bool {
    for atom in 0..query.atom_count() {
        if !query.rest_h(atom) {
            continue;
        }
        let image = query_core[atom] as usize;
        let query_heavy = query
            .bonded_atoms(atom)
            .iter()
            .filter(|&&n| query.atom_number(n as usize) != HYDROGEN_ATOM_NUMBER)
            .count();
        let target_heavy = target
            .bonded_atoms(image)
            .iter()
            .filter(|&&n| target.atom_number(n as usize) != HYDROGEN_ATOM_NUMBER)
            .count();
        if target_heavy > query_heavy {
            return false;
        }
    }
    true
}

/// Runs every solution-time check a complete mapping must pass before it is accepted.
fn is_match_valid(query: &Molecule, target: &Molecule, query_core: &[i32], config: MatchConfig) -> bool {
    if !rest_h_valid(query, target, query_core) {
        return false;
    }
    if matches!(config.stereo_mode, StereoMode::Strict) {
        let exact = matches!(config.graph_mode, GraphMode::Exact);
        if !validate_stereo(query, target, query_core, exact) {
            return false;
        }
    }
    true
}

/// Searches for a mapping of `query` into `target` under `config`, spending at most
/// `iteration_limit` target-candidate examinations (`<= 0` meaning unlimited).
pub fn run(query: &Molecule, order: &QueryOrder, target: &Molecule, config: MatchConfig, iteration_limit: i64) -> MatchOutcome {
    if !prefilter_passes(query, target, config) {
        return MatchOutcome::NoMatch;
    }

    let query_atom_count = query.atom_count();
    let target_atom_count = target.atom_count();

    let mut query_core = vec![UNDEFINED_CORE; query_atom_count];
    let mut target_core = vec![UNDEFINED_CORE; target_atom_count];
    let mut cursors = vec![-1i64; query_atom_count.max(1)];
    let mut counter: i64 = if iteration_limit > 0 { iteration_limit } else { i64::MAX };
    let mut core_length = 0usize;

    loop {
        if core_length == query_atom_count {
            if is_match_valid(query, target, &query_core, config) {
                return MatchOutcome::Matched {
                    score: similarity_score(query, target),
                };
            }
            if core_length == 0 {
                return MatchOutcome::NoMatch;
            }
            core_length -= 1;
            let atom = order.entries()[core_length].atom;
            let image = query_core[atom];
            query_core[atom] = UNDEFINED_CORE;
            target_core[image as usize] = UNDEFINED_CORE;
            continue;
        }

        let entry = order.entries()[core_length];
        let parent_image = entry.parent.map(|p| query_core[p] as usize);

        let mut accepted = None;
        while let Some(candidate) = next_candidate(target, parent_image, &target_core, &mut cursors[core_length]) {
            counter -= 1;
            if counter == 0 {
                return MatchOutcome::LimitExceeded;
            }
            if is_feasible_pair(query, target, entry.atom, candidate, &query_core, &target_core, config) {
                accepted = Some(candidate);
                break;
            }
        }

        match accepted {
            Some(candidate) => {
                query_core[entry.atom] = candidate as i32;
                target_core[candidate] = entry.atom as i32;
                core_length += 1;
                if core_length < query_atom_count {
                    cursors[core_length] = -1;
                }
            }
            None => {
                if core_length == 0 {
                    return MatchOutcome::NoMatch;
                }
                core_length -= 1;
                let atom = order.entries()[core_length].atom;
                let image = query_core[atom];
                query_core[atom] = UNDEFINED_CORE;
                target_core[image as usize] = UNDEFINED_CORE;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::atom::BondType;
    use crate::matcher::{ChargeMode, IsotopeMode};

    fn carbon_chain(len: usize) -> Molecule {
        let mut mol = Molecule::empty(len, 0, false);
        for i in 0..len {
            mol.set_atom_number(i, 6);
        }
        for i in 0..len.saturating_sub(1) {
            mol.add_bond(i, i + 1, BondType::Single);
        }
        mol
    }

    fn default_config(graph_mode: GraphMode) -> MatchConfig {
        MatchConfig {
            graph_mode,
            charge_mode: ChargeMode::Ignore,
            isotope_mode: IsotopeMode::Ignore,
            stereo_mode: StereoMode::Ignore,
        }
    }

    #[test]
    fn two_carbon_query_matches_within_longer_chain() {
        let query = carbon_chain(2);
        let target = carbon_chain(5);
        let order = QueryOrder::build(&query);
        let outcome = run(&query, &order, &target, default_config(GraphMode::Substructure), 0);
        assert!(matches!(outcome, MatchOutcome::Matched { .. }));
    }

    #[test]
    fn exact_mode_rejects_a_strict_subgraph() {
        let query = carbon_chain(2);
        let target = carbon_chain(5);
        let order = QueryOrder::build(&query);
        let outcome = run(&query, &order, &target, default_config(GraphMode::Exact), 0);
        assert!(matches!(outcome, MatchOutcome::NoMatch));
    }

    #[test]
    fn identical_chains_match_exactly_with_score_one() {
        let query = carbon_chain(3);
        let target = carbon_chain(3);
        let order = QueryOrder::build(&query);
        let outcome = run(&query, &order, &target, default_config(GraphMode::Exact), 0);
        match outcome {
            MatchOutcome::Matched { score } => assert!((score - 1.0).abs() < 1e-9),
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn disjoint_atom_numbers_never_match() {
        let mut query = Molecule::empty(1, 0, false);
        query.set_atom_number(0, 7); // nitrogen
        let target = carbon_chain(3);
        let order = QueryOrder::build(&query);
        let outcome = run(&query, &order, &target, default_config(GraphMode::Substructure), 0);
        assert!(matches!(outcome, MatchOutcome::NoMatch));
    }

    #[test]
    fn exhausted_iteration_budget_reports_limit_exceeded() {
        let query = carbon_chain(2);
        let target = carbon_chain(2);
        let order = QueryOrder::build(&query);
        let outcome = run(&query, &order, &target, default_config(GraphMode::Substructure), 1);
        assert!(matches!(outcome, MatchOutcome::LimitExceeded));
    }

    #[test]
    fn rest_h_rejects_target_atom_with_extra_heavy_neighbours() {
        // Query: C(-C)(restH) looking inside a target where that atom has two heavy neighbours.
        let mut query = Molecule::empty(2, 0, false);
        query.set_atom_number(0, 6);
        query.set_atom_number(1, 6);
        query.add_bond(0, 1, BondType::Single);
        query.enable_rest_h();
        query.set_rest_h(0, true);

        let mut target = Molecule::empty(3, 0, false);
        for i in 0..3 {
            target.set_atom_number(i, 6);
        }
        target.add_bond(0, 1, BondType::Single);
        target.add_bond(0, 2, BondType::Single);

        let order = QueryOrder::build(&query);
        let outcome = run(&query, &order, &target, default_config(GraphMode::Substructure), 0);
        assert!(matches!(outcome, MatchOutcome::NoMatch));
    }
}
