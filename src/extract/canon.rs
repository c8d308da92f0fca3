//! The canonicalisation collaborator boundary (§4.3, steps 2-5).
//!
//! The real canonicalisation library (base-canon-ranking, final numbering, tautomer-flag
//! composition) is explicitly out of scope: §4.3 treats it as an opaque primitive the extractor
//! calls into. [`Canonicalizer`] is that seam; [`ReferenceCanonicalizer`] is a small,
//! self-contained implementation that satisfies it well enough to drive the extractor's own
//! logic (component splitting, terminal-H folding, cumulene re-emission) in tests, without
//! attempting to reproduce real canonical numbering.

use crate::core::atom::{BondStereo, BondType, TetrahedralStereo};
use crate::core::error::CanonError;
use crate::core::molecule::Molecule;
use crate::extract::tautomer::TautomerGroup;
use crate::extract::TautomerMode;

/// A canonical-order entry for a stereo centre (§4.3 step 6, "stereo atoms").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StereoAtomEntry {
    /// Original molecule atom index.
    pub atom: usize,
    pub parity: TetrahedralStereo,
}

/// A pre-chain-walk double-bond parity entry (§4.3 step 6, "stereo bonds"), before the
/// cumulene odd/even re-emission [`crate::extract::tautomer`] applies on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StereoBondEntry {
    pub atom_a: usize,
    pub atom_b: usize,
    pub parity: BondStereo,
}

/// One component's worth of work handed to a [`Canonicalizer`] (§4.3 steps 1-5).
pub struct CanonRequest<'a> {
    pub molecule: &'a Molecule,
    /// Original atom indices belonging to this connected component, already excluding any
    /// terminal explicit H/D/T atoms folded away in step 1.
    pub atoms: &'a [usize],
    /// Per retained atom (same order as `atoms`), the count of terminal H/D/T atoms folded into
    /// it by step 1.
    pub folded_hydrogens: &'a [u16],
    pub tautomer_mode: TautomerMode,
}

/// The result of canonicalising one component (§4.3 steps 2-5), ready for step 6's emission.
#[derive(Debug, Clone, Default)]
pub struct CanonOutput {
    /// Original atom indices in canonical emission order.
    pub canonical_order: Vec<usize>,
    pub stereo_atoms: Vec<StereoAtomEntry>,
    pub stereo_bonds: Vec<StereoBondEntry>,
    pub tautomer_groups: Vec<TautomerGroup>,
    /// Original atom index pairs for bonds the canonicaliser classified as `BOND_TAUTOM` or
    /// `BOND_ALT12NS` (§4.3 step 6, "alternating bonds"); always empty outside tautomer mode.
    pub alternating_bonds: Vec<(usize, usize)>,
    /// Mirrors `bIgnoreIsotopic` (§4.3 step 4): set once no isotopic atom or tautomeric isotopic
    /// hydrogen was found in the component.
    pub ignore_isotopic: bool,
}

/// The canonicalisation collaborator seam (§4.3 steps 2-5, §1 out-of-scope).
///
/// A production caller plugs in the real canonicalisation library here; `molmatch` only commits
/// to the shape of the request and response.
pub trait Canonicalizer {
    fn canonicalize(&self, request: &CanonRequest) -> Result<CanonOutput, CanonError>;
}

/// A minimal in-crate [`Canonicalizer`]: ranks atoms by a Morgan-style invariant tuple instead
/// of true canonical graph numbering, and treats every `AROMATIC` bond as tautomer-eligible.
/// Good enough to exercise the extractor's own emission logic; not a substitute for a real
/// canonicalisation library.
#[derive(Debug, Default)]
pub struct ReferenceCanonicalizer;

impl ReferenceCanonicalizer {
    pub fn new() -> Self {
        ReferenceCanonicalizer
    }

    fn invariant(molecule: &Molecule, atom: usize) -> (i8, usize, Vec<i8>) {
        let degree = molecule.bonded_atoms(atom).len();
        let mut neighbour_numbers: Vec<i8> = molecule
            .bonded_atoms(atom)
            .iter()
            .map(|&n| molecule.atom_number(n as usize))
            .collect();
        neighbour_numbers.sort_unstable();
        (molecule.atom_number(atom), degree, neighbour_numbers)
    }
}

impl Canonicalizer for ReferenceCanonicalizer {
    fn canonicalize(&self, request: &CanonRequest) -> Result<CanonOutput, CanonError> {
        let molecule = request.molecule;

        let mut canonical_order: Vec<usize> = request.atoms.to_vec();
        canonical_order.sort_by_key(|&atom| (Self::invariant(molecule, atom), atom));

        let in_component = |atom: usize| request.atoms.contains(&atom);

        let stereo_atoms = request
            .atoms
            .iter()
            .copied()
            .filter_map(|atom| match molecule.atom_stereo(atom) {
                Some(parity) if parity != TetrahedralStereo::None => Some(StereoAtomEntry { atom, parity }),
                _ => None,
            })
            .collect();

        let mut stereo_bonds = Vec::new();
        let mut alternating_bonds = Vec::new();
        for &atom in request.atoms {
            for &neighbour in molecule.bonded_atoms(atom) {
                let neighbour = neighbour as usize;
                if neighbour <= atom || !in_component(neighbour) {
                    continue;
                }
                let Some(bond_idx) = molecule.bond_between(atom, neighbour) else {
                    continue;
                };
                if molecule.bond_type_between(atom, neighbour) == Some(BondType::Double) {
                    if let Some(parity) = molecule.bond_stereo(bond_idx) {
                        if parity != BondStereo::None {
                            stereo_bonds.push(StereoBondEntry {
                                atom_a: atom,
                                atom_b: neighbour,
                                parity,
                            });
                        }
                    }
                }
                if matches!(request.tautomer_mode, TautomerMode::Enabled)
                    && molecule.bond_type_between(atom, neighbour) == Some(BondType::Aromatic)
                {
                    alternating_bonds.push((atom, neighbour));
                }
            }
        }

        let has_isotope = request.atoms.iter().any(|&a| molecule.mass(a).unwrap_or(0) != 0);

        Ok(CanonOutput {
            canonical_order,
            stereo_atoms,
            stereo_bonds,
            tautomer_groups: Vec::new(),
            alternating_bonds,
            ignore_isotopic: !has_isotope,
        })
    }
}
