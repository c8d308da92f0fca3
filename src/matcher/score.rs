//! Similarity score computed for a successful match (§4.2 "Solution validation", §7).
//!
//! Four ratios — heavy atoms, heavy bonds, hydrogen atoms, hydrogen bonds, each query-count over
//! target-count — are combined with weights `8:4:2:1` and normalized by `15`, the sum of the
//! weights. A ratio whose target count is zero is treated as `1.0`: an empty target-side bucket
//! is not a mismatch, just an absent dimension of comparison.

use crate::core::molecule::Molecule;

fn ratio(query_count: usize, target_count: usize) -> f64 {
    if target_count == 0 { 1.0 } else { query_count as f64 / target_count as f64 }
}

/// Computes the `query`-into-`target` similarity score for an already-confirmed match.
pub fn similarity_score(query: &Molecule, target: &Molecule) -> f64 {
    let heavy_atom_ratio = ratio(query.heavy_atom_count(), target.heavy_atom_count());
    let heavy_bond_ratio = ratio(query.heavy_bond_count(), target.heavy_bond_count());
    let hydrogen_atom_ratio = ratio(query.hydrogen_atom_count(), target.hydrogen_atom_count());
    let hydrogen_bond_ratio = ratio(query.hydrogen_bond_count(), target.hydrogen_bond_count());

    (8.0 * heavy_atom_ratio + 4.0 * heavy_bond_ratio + 2.0 * hydrogen_atom_ratio + hydrogen_bond_ratio) / 15.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_molecules_score_one() {
        let mol = Molecule::empty(2, 1, false);
        assert!((similarity_score(&mol, &mol) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn smaller_query_scores_below_one() {
        let query = Molecule::empty(1, 0, false);
        let target = Molecule::empty(2, 0, false);
        let score = similarity_score(&query, &target);
        assert!(score < 1.0);
        assert!(score > 0.0);
    }

    #[test]
    fn zero_target_count_dimension_contributes_full_weight() {
        let mut query = Molecule::empty(1, 0, false);
        query.enable_charges();
        let mut target = Molecule::empty(1, 0, false);
        target.enable_charges();
        // Neither side has hydrogen bonds; that ratio should not depress the score.
        assert!((similarity_score(&query, &target) - 1.0).abs() < 1e-12);
    }
}
