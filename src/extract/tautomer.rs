//! Tautomer groups and the cumulene odd/even re-emission rule (§4.3 step 6).

use crate::core::atom::{BondStereo, BondType, TetrahedralStereo};
use crate::core::molecule::Molecule;

use crate::extract::canon::StereoBondEntry;

/// One tautomer group, ready for `setTautomericGroup` (§6): a pair of canonicalisation-library
/// numbers plus the original atom indices participating in the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TautomerGroup {
    pub num: [i16; 2],
    pub endpoints: Vec<usize>,
}

/// The result of reclassifying one [`StereoBondEntry`] through its cumulene chain, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    Bond {
        atom_a: usize,
        atom_b: usize,
        parity: BondStereo,
    },
    Atom {
        atom: usize,
        parity: TetrahedralStereo,
    },
}

fn negate_bond(parity: BondStereo) -> BondStereo {
    match parity {
        BondStereo::Cis => BondStereo::Trans,
        BondStereo::Trans => BondStereo::Cis,
        other => other,
    }
}

fn bond_parity_to_atom_parity(parity: BondStereo) -> TetrahedralStereo {
    match parity {
        BondStereo::Cis => TetrahedralStereo::Clockwise,
        BondStereo::Trans => TetrahedralStereo::AntiClockwise,
        BondStereo::Undefined => TetrahedralStereo::Undefined,
        BondStereo::None => TetrahedralStereo::None,
    }
}

/// Walks away from `start` through `current` exactly like `matcher::stereo`'s chain walk, but
/// also counts how many extra double-bonded links were crossed (0 for a plain double bond).
fn walk_with_length(mol: &Molecule, start: usize, current: usize) -> (usize, usize) {
    let mut prev = start;
    let mut node = current;
    let mut length = 0usize;
    loop {
        let neighbours = mol.bonded_atoms(node);
        if neighbours.len() != 2 {
            return (node, length);
        }
        let both_double = neighbours.iter().all(|&n| mol.bond_type_between(node, n as usize) == Some(BondType::Double));
        if !both_double {
            return (node, length);
        }
        match neighbours.iter().map(|&n| n as usize).find(|&n| n != prev) {
            Some(next) => {
                prev = node;
                node = next;
                length += 1;
            }
            None => return (node, length),
        }
    }
}

/// Reclassifies one pre-chain-walk stereo-bond entry (§4.3 step 6): a plain double bond
/// (chain length zero on both sides) re-emits unchanged. An odd total chain length re-emits as a
/// stereo atom at the far terminus reached while walking the longer side, negated; an even total
/// length re-emits as a stereo bond between the two termini, negated.
///
/// The "which atom exactly is the stereo centre" choice in the odd case is the source's own
/// open question (§9): here the terminus reached while walking the *longer* side stands in for
/// it, which is a simplification documented rather than a confirmed behaviour.
pub fn classify_cumulene(molecule: &Molecule, entry: &StereoBondEntry) -> Emission {
    let (terminus_a, len_a) = walk_with_length(molecule, entry.atom_b, entry.atom_a);
    let (terminus_b, len_b) = walk_with_length(molecule, entry.atom_a, entry.atom_b);
    let chain_length = len_a + len_b;

    if chain_length == 0 {
        return Emission::Bond {
            atom_a: entry.atom_a,
            atom_b: entry.atom_b,
            parity: entry.parity,
        };
    }

    if chain_length % 2 == 1 {
        let atom = if len_a >= len_b { terminus_a } else { terminus_b };
        Emission::Atom {
            atom,
            parity: bond_parity_to_atom_parity(negate_bond(entry.parity)),
        }
    } else {
        Emission::Bond {
            atom_a: terminus_a,
            atom_b: terminus_b,
            parity: negate_bond(entry.parity),
        }
    }
}
