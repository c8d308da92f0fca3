//! Tetrahedral and cis/trans stereo validation, including allene/cumulene extended centres
//! (§4.2 "Stereo validation").
//!
//! A query atom or bond with a defined stereo parity only constrains a candidate mapping once
//! the mapping is otherwise complete (all of the centre's neighbours have images); callers
//! invoke [`validate_stereo`] once, at solution time, rather than per partial-mapping step.

use crate::core::atom::{BondStereo, BondType, TetrahedralStereo};
use crate::core::constants::MAX_ATOM_IDX;
use crate::core::molecule::Molecule;

/// The 12 even permutations of `{1,2,3,4}` — the alternating group A₄ (§9).
const VALID_REORDERS: [u16; 12] = [
    0x1234, 0x1423, 0x1342, 0x2314, 0x2431, 0x2143, 0x3124, 0x3412, 0x3241, 0x4213, 0x4321, 0x4132,
];

fn rank_order(idx: [u16; 4]) -> u16 {
    let mut order = 0u16;
    for value in idx {
        let rank = 1 + idx.iter().filter(|&&other| other < value).count() as u16;
        order = (order << 4) | rank;
    }
    order
}

fn flip_tetrahedral(parity: TetrahedralStereo) -> TetrahedralStereo {
    match (!(parity as u8)) & 0x03 {
        0 => TetrahedralStereo::None,
        1 => TetrahedralStereo::Clockwise,
        2 => TetrahedralStereo::AntiClockwise,
        _ => TetrahedralStereo::Undefined,
    }
}

fn flip_bond(conf: BondStereo) -> BondStereo {
    match (!(conf as u8)) & 0x03 {
        0 => BondStereo::None,
        1 => BondStereo::Cis,
        2 => BondStereo::Trans,
        _ => BondStereo::Undefined,
    }
}

/// Reduces a 4-tuple of neighbour images to a canonical tetrahedral parity (§4.2).
///
/// Even reorderings of `idx` leave `parity` unchanged; odd reorderings flip it. Involutive:
/// applying this twice with the same `idx` returns the original parity (§8, property 5).
pub fn normalize_atom_stereo(idx: [u16; 4], parity: TetrahedralStereo) -> TetrahedralStereo {
    if VALID_REORDERS.contains(&rank_order(idx)) {
        parity
    } else {
        flip_tetrahedral(parity)
    }
}

/// Reduces a 4-tuple of neighbour images to a canonical cis/trans parity (§4.2).
///
/// Flips once for each of the two independent ligand swaps `idx[0] > idx[1]` and
/// `idx[2] > idx[3]` (§8, property 6); also used for allene/cumulene extended centres, whose
/// parity is stored as [`TetrahedralStereo`] but behaves like a bond parity geometrically —
/// see [`normalize_extended_atom_parity`].
pub fn normalize_bond_stereo(idx: [u16; 4], conf: BondStereo) -> BondStereo {
    let mut result = conf;
    if idx[0] > idx[1] {
        result = flip_bond(result);
    }
    if idx[2] > idx[3] {
        result = flip_bond(result);
    }
    result
}

/// Same paired-swap algebra as [`normalize_bond_stereo`], applied to a [`TetrahedralStereo`]
/// value: an allene/cumulene centre's parity is geometrically a double-bond-style descriptor
/// even though it is stored in the atom's tetrahedral stereo field.
fn normalize_extended_atom_parity(idx: [u16; 4], parity: TetrahedralStereo) -> TetrahedralStereo {
    let mut result = parity;
    if idx[0] > idx[1] {
        result = flip_tetrahedral(result);
    }
    if idx[2] > idx[3] {
        result = flip_tetrahedral(result);
    }
    result
}

/// True if `atom` is an allene-like extended tetrahedral centre: exactly two neighbours, both
/// reached by double bonds.
pub fn is_extended_tetrahedral_centre(mol: &Molecule, atom: usize) -> bool {
    let neighbours = mol.bonded_atoms(atom);
    neighbours.len() == 2
        && neighbours
            .iter()
            .all(|&n| mol.bond_type_between(atom, n as usize) == Some(BondType::Double))
}

/// Walks away from `start` through `current`, continuing through every atom that is itself a
/// degree-2, both-double-bonded chain link, and returns the terminus atom reached plus the atom
/// immediately before it. Degenerates to `(current, start)` immediately when `current` is not
/// itself a chain link, so this also serves the non-extended (plain double bond) case.
pub(crate) fn walk_chain(mol: &Molecule, start: usize, current: usize) -> (usize, usize) {
    let mut prev = start;
    let mut node = current;
    loop {
        let neighbours = mol.bonded_atoms(node);
        if neighbours.len() != 2 {
            return (node, prev);
        }
        let both_double = neighbours
            .iter()
            .all(|&n| mol.bond_type_between(node, n as usize) == Some(BondType::Double));
        if !both_double {
            return (node, prev);
        }
        match neighbours.iter().map(|&n| n as usize).find(|&n| n != prev) {
            Some(next) => {
                prev = node;
                node = next;
            }
            None => return (node, prev),
        }
    }
}

/// Returns the unique target neighbour of `centre` not already present in `mapped` — the
/// "pad" ligand used when a non-extended stereo centre has only three explicit neighbours
/// (`molecule_get_last_chiral_ligand`). Falls back to [`MAX_ATOM_IDX`] when no such neighbour
/// exists (the centre's implicit ligand has no explicit target counterpart at all).
pub fn last_chiral_ligand(target: &Molecule, centre: usize, mapped: &[u16]) -> u16 {
    target
        .bonded_atoms(centre)
        .iter()
        .copied()
        .find(|n| !mapped.contains(n))
        .unwrap_or(MAX_ATOM_IDX)
}

/// Returns the unique target neighbour of `terminus` not equal to `exclude` and not already in
/// `mapped` (`molecule_get_last_stereo_bond_ligand`), the pad ligand for a cumulene/cis-trans
/// terminus whose chain-walk found only one non-chain ligand.
pub fn last_stereo_bond_ligand(target: &Molecule, terminus: usize, exclude: usize, mapped: &[u16]) -> u16 {
    target
        .bonded_atoms(terminus)
        .iter()
        .copied()
        .filter(|&n| n as usize != exclude)
        .find(|n| !mapped.contains(n))
        .unwrap_or(MAX_ATOM_IDX)
}

/// A single slot of the 4-tuple fed to a `normalize_*` call: either a concrete query ligand, or
/// a pad whose target-side value is resolved lazily via [`last_stereo_bond_ligand`], once the
/// slot's position in the sorted tuple is fixed.
enum LigandSlot {
    Real(u16),
    Pad {
        terminus_image: usize,
        exclude_image: usize,
        other_mapped: Option<u16>,
    },
}

impl LigandSlot {
    fn sort_key(&self) -> u16 {
        match self {
            LigandSlot::Real(q) => *q,
            LigandSlot::Pad { .. } => MAX_ATOM_IDX,
        }
    }

    fn resolve(&self, target: &Molecule, query_core: &[i32]) -> u16 {
        match self {
            LigandSlot::Real(q) => query_core[*q as usize] as u16,
            LigandSlot::Pad {
                terminus_image,
                exclude_image,
                other_mapped,
            } => {
                let mut mapped = vec![*exclude_image as u16];
                if let Some(m) = other_mapped {
                    mapped.push(*m);
                }
                last_stereo_bond_ligand(target, *terminus_image, *exclude_image, &mapped)
            }
        }
    }
}

fn terminus_slots(query: &Molecule, query_core: &[i32], terminus: usize, arrived_from: usize) -> [LigandSlot; 2] {
    let mut ligands: Vec<u16> = query
        .bonded_atoms(terminus)
        .iter()
        .copied()
        .filter(|&n| n as usize != arrived_from)
        .collect();
    ligands.sort_unstable();

    let terminus_image = query_core[terminus] as usize;
    let exclude_image = query_core[arrived_from] as usize;

    match ligands.len() {
        0 => [
            LigandSlot::Pad {
                terminus_image,
                exclude_image,
                other_mapped: None,
            },
            LigandSlot::Pad {
                terminus_image,
                exclude_image,
                other_mapped: None,
            },
        ],
        1 => [
            LigandSlot::Real(ligands[0]),
            LigandSlot::Pad {
                terminus_image,
                exclude_image,
                other_mapped: Some(query_core[ligands[0] as usize] as u16),
            },
        ],
        _ => [LigandSlot::Real(ligands[0]), LigandSlot::Real(ligands[1])],
    }
}

fn extended_target_images(
    query: &Molecule,
    target: &Molecule,
    query_core: &[i32],
    t1: usize,
    from1: usize,
    t2: usize,
    from2: usize,
) -> [u16; 4] {
    let mut slots: Vec<LigandSlot> = Vec::with_capacity(4);
    slots.extend(terminus_slots(query, query_core, t1, from1));
    slots.extend(terminus_slots(query, query_core, t2, from2));
    slots.sort_by_key(|s| s.sort_key());

    let resolved: Vec<u16> = slots.iter().map(|s| s.resolve(target, query_core)).collect();
    resolved.try_into().expect("exactly four ligand slots")
}

fn stereo_ok_atom(
    query_parity: TetrahedralStereo,
    exact: bool,
    target_parity: TetrahedralStereo,
    would_match: impl FnOnce() -> bool,
) -> bool {
    match query_parity {
        TetrahedralStereo::None => true,
        TetrahedralStereo::Undefined => !exact || target_parity == TetrahedralStereo::Undefined,
        _ => {
            if exact {
                target_parity != TetrahedralStereo::Undefined && would_match()
            } else {
                matches!(target_parity, TetrahedralStereo::None | TetrahedralStereo::Undefined) || would_match()
            }
        }
    }
}

fn stereo_ok_bond(
    query_conf: BondStereo,
    exact: bool,
    target_conf: BondStereo,
    would_match: impl FnOnce() -> bool,
) -> bool {
    match query_conf {
        BondStereo::None => true,
        BondStereo::Undefined => !exact || target_conf == BondStereo::Undefined,
        _ => {
            if exact {
                target_conf != BondStereo::Undefined && would_match()
            } else {
                matches!(target_conf, BondStereo::None | BondStereo::Undefined) || would_match()
            }
        }
    }
}

fn validate_plain_atom_centre(
    query: &Molecule,
    target: &Molecule,
    atom: usize,
    image: usize,
    query_core: &[i32],
    parity: TetrahedralStereo,
    exact: bool,
) -> bool {
    let mut neighbours: Vec<u16> = query.bonded_atoms(atom).to_vec();
    while neighbours.len() < 4 {
        neighbours.push(MAX_ATOM_IDX);
    }
    neighbours.sort_unstable();

    let mapped: Vec<u16> = neighbours
        .iter()
        .filter(|&&n| n != MAX_ATOM_IDX)
        .map(|&n| query_core[n as usize] as u16)
        .collect();

    let target_images: Vec<u16> = neighbours
        .iter()
        .map(|&n| {
            if n == MAX_ATOM_IDX {
                last_chiral_ligand(target, image, &mapped)
            } else {
                query_core[n as usize] as u16
            }
        })
        .collect();
    let target_images: [u16; 4] = target_images.try_into().expect("padded to exactly four");

    let target_parity = target.atom_stereo(image).unwrap_or(TetrahedralStereo::None);
    stereo_ok_atom(parity, exact, target_parity, || {
        normalize_atom_stereo(target_images, target_parity) == parity
    })
}

fn validate_extended_atom_centre(
    query: &Molecule,
    target: &Molecule,
    atom: usize,
    image: usize,
    query_core: &[i32],
    parity: TetrahedralStereo,
    exact: bool,
) -> bool {
    let neighbours = query.bonded_atoms(atom);
    let (t1, from1) = walk_chain(query, atom, neighbours[0] as usize);
    let (t2, from2) = walk_chain(query, atom, neighbours[1] as usize);
    let target_images = extended_target_images(query, target, query_core, t1, from1, t2, from2);

    let target_parity = target.atom_stereo(image).unwrap_or(TetrahedralStereo::None);
    stereo_ok_atom(parity, exact, target_parity, || {
        normalize_extended_atom_parity(target_images, target_parity) == parity
    })
}

fn validate_bond_stereo_pair(
    query: &Molecule,
    target: &Molecule,
    a: usize,
    b: usize,
    image_a: usize,
    image_b: usize,
    query_core: &[i32],
    conf: BondStereo,
    exact: bool,
) -> bool {
    let (t1, from1) = walk_chain(query, b, a);
    let (t2, from2) = walk_chain(query, a, b);
    let target_images = extended_target_images(query, target, query_core, t1, from1, t2, from2);

    let target_conf = target
        .bond_between(image_a, image_b)
        .and_then(|idx| target.bond_stereo(idx))
        .unwrap_or(BondStereo::None);
    stereo_ok_bond(conf, exact, target_conf, || normalize_bond_stereo(target_images, target_conf) == conf)
}

/// Validates every defined stereo parity in `query` against the completed mapping `query_core`
/// (a full mapping into `target`'s atom indices, `-1` for any query atom left unmapped).
pub fn validate_stereo(query: &Molecule, target: &Molecule, query_core: &[i32], exact: bool) -> bool {
    for atom in 0..query.atom_count() {
        let parity = query.atom_stereo(atom).unwrap_or(TetrahedralStereo::None);
        if parity == TetrahedralStereo::None {
            continue;
        }
        let image = query_core[atom];
        if image < 0 {
            continue;
        }
        let image = image as usize;

        let ok = if is_extended_tetrahedral_centre(query, atom) {
            validate_extended_atom_centre(query, target, atom, image, query_core, parity, exact)
        } else {
            validate_plain_atom_centre(query, target, atom, image, query_core, parity, exact)
        };
        if !ok {
            return false;
        }
    }

    for bond_idx in 0..query.bond_count() {
        let conf = query.bond_stereo(bond_idx).unwrap_or(BondStereo::None);
        if conf == BondStereo::None {
            continue;
        }
        let (a, b) = query.bond_endpoints(bond_idx);
        let (a, b) = (a as usize, b as usize);
        let image_a = query_core[a];
        let image_b = query_core[b];
        if image_a < 0 || image_b < 0 {
            continue;
        }

        if !validate_bond_stereo_pair(
            query,
            target,
            a,
            b,
            image_a as usize,
            image_b as usize,
            query_core,
            conf,
            exact,
        ) {
            return false;
        }
    }

    true
}
