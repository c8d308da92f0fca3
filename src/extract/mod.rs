//! The stereo/tautomer extractor (§4.3, §6).
//!
//! [`extract`] drives the six-step pipeline of §4.3 per connected component: terminal-H folding,
//! canonicalisation (via the opaque [`canon::Canonicalizer`] collaborator), then emission through
//! the four [`ExtractionSink`] callbacks §6 specifies.

pub mod canon;
pub mod tautomer;

use crate::core::constants::HYDROGEN_ATOM_NUMBER;
use crate::core::error::CanonError;
use crate::core::molecule::Molecule;

use canon::{CanonRequest, Canonicalizer, StereoAtomEntry};
use tautomer::{classify_cumulene, Emission, TautomerGroup};

/// Whether tautomer detection runs for this extraction (§4.3 step 2's flag set, §4.3 step 6's
/// "tautomer mode only" gate on alternating-bond emission).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TautomerMode {
    Disabled,
    Enabled,
}

/// Receives the four output streams §6 specifies, one call sequence per connected component, in
/// the order the spec lists them: stereo atoms, stereo bonds, alternating bonds, tautomer groups.
pub trait ExtractionSink {
    fn set_stereo_atoms(&mut self, atoms: &[(i16, i16)]);
    fn set_stereo_bonds(&mut self, bonds: &[(i16, i16, i16)]);
    fn set_alternating_bonds(&mut self, bonds: &[(i16, i16)]);
    fn set_tautomeric_group(&mut self, group: &TautomerGroup);
}

fn connected_components(molecule: &Molecule) -> Vec<Vec<usize>> {
    let atom_count = molecule.atom_count();
    let mut visited = vec![false; atom_count];
    let mut components = Vec::new();

    for start in 0..atom_count {
        if visited[start] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(atom) = stack.pop() {
            component.push(atom);
            for &neighbour in molecule.bonded_atoms(atom) {
                let neighbour = neighbour as usize;
                if !visited[neighbour] {
                    visited[neighbour] = true;
                    stack.push(neighbour);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    components
}

/// Folds terminal explicit H/D/T atoms out of `component` (§4.3 step 1), returning the retained
/// heavy atoms plus, in the same order, how many terminal hydrogens were folded into each one.
///
/// A no-op when the molecule is not in extended form: implicit hydrogens were never materialised
/// as atoms in the first place, so there is nothing to fold.
fn fold_terminal_hydrogens(molecule: &Molecule, component: &[usize]) -> (Vec<usize>, Vec<u16>) {
    if !molecule.is_extended() {
        return (component.to_vec(), vec![0; component.len()]);
    }

    let is_terminal_hydrogen = |atom: usize| -> Option<usize> {
        if molecule.atom_number(atom) != HYDROGEN_ATOM_NUMBER {
            return None;
        }
        let neighbours = molecule.bonded_atoms(atom);
        if neighbours.len() != 1 {
            return None;
        }
        let heavy = neighbours[0] as usize;
        if molecule.atom_number(heavy) == HYDROGEN_ATOM_NUMBER {
            return None; // leave an H-H pair alone; neither side is "the heavy atom" here.
        }
        Some(heavy)
    };

    let mut retained = Vec::with_capacity(component.len());
    let mut folded_into: Vec<u16> = Vec::new();
    let mut fold_counts = vec![0u16; molecule.atom_count()];

    for &atom in component {
        match is_terminal_hydrogen(atom) {
            Some(heavy) => fold_counts[heavy] += 1,
            None => retained.push(atom),
        }
    }
    for &atom in &retained {
        folded_into.push(fold_counts[atom]);
    }

    (retained, folded_into)
}

fn process_component<C: Canonicalizer, S: ExtractionSink>(
    molecule: &Molecule,
    component: &[usize],
    canonicalizer: &C,
    tautomer_mode: TautomerMode,
    sink: &mut S,
) -> Result<(), CanonError> {
    let (atoms, folded_hydrogens) = fold_terminal_hydrogens(molecule, component);
    if atoms.is_empty() {
        return Ok(());
    }

    let request = CanonRequest {
        molecule,
        atoms: &atoms,
        folded_hydrogens: &folded_hydrogens,
        tautomer_mode,
    };
    let output = canonicalizer.canonicalize(&request)?;

    let rank_of = |atom: usize| output.canonical_order.iter().position(|&a| a == atom).unwrap_or(usize::MAX);
    let mut ordered_stereo_atoms: Vec<&StereoAtomEntry> = output.stereo_atoms.iter().collect();
    ordered_stereo_atoms.sort_by_key(|entry| rank_of(entry.atom));

    let stereo_atom_pairs: Vec<(i16, i16)> = ordered_stereo_atoms
        .iter()
        .map(|entry| (entry.atom as i16, entry.parity as u8 as i16))
        .collect();
    sink.set_stereo_atoms(&stereo_atom_pairs);

    let mut reclassified_atoms: Vec<(i16, i16)> = Vec::new();
    let mut stereo_bond_triples: Vec<(i16, i16, i16)> = Vec::new();
    for entry in &output.stereo_bonds {
        match classify_cumulene(molecule, entry) {
            Emission::Bond { atom_a, atom_b, parity } => {
                stereo_bond_triples.push((atom_a as i16, atom_b as i16, parity as u8 as i16));
            }
            Emission::Atom { atom, parity } => {
                reclassified_atoms.push((atom as i16, parity as u8 as i16));
            }
        }
    }
    sink.set_stereo_bonds(&stereo_bond_triples);
    if !reclassified_atoms.is_empty() {
        sink.set_stereo_atoms(&reclassified_atoms);
    }

    if matches!(tautomer_mode, TautomerMode::Enabled) {
        let alternating: Vec<(i16, i16)> = output
            .alternating_bonds
            .iter()
            .map(|&(a, b)| (a as i16, b as i16))
            .collect();
        sink.set_alternating_bonds(&alternating);

        for group in &output.tautomer_groups {
            sink.set_tautomeric_group(group);
        }
    }

    Ok(())
}

/// Runs the extractor over every connected component of `molecule` (§4.3).
///
/// Aromatic bonds are eligible for alternating-bond classification by the canonicaliser; the
/// extractor itself only splits components, folds terminal hydrogens, and re-emits cumulene
/// chains on top of whatever the canonicaliser reports.
pub fn extract<C: Canonicalizer, S: ExtractionSink>(
    molecule: &Molecule,
    canonicalizer: &C,
    tautomer_mode: TautomerMode,
    sink: &mut S,
) -> Result<(), CanonError> {
    for component in connected_components(molecule) {
        process_component(molecule, &component, canonicalizer, tautomer_mode, sink)?;
    }
    Ok(())
}
