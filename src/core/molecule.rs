//! The in-memory molecule graph produced by the decoder and consumed by the matcher.

use crate::core::atom::{AtomKind, BondStereo, BondType, TetrahedralStereo};
use crate::core::constants::BOND_LIST_BASE_SIZE;

/// An undefined bond-matrix entry, stored wherever two atoms are not bonded.
const NO_BOND: i32 = -1;

/// A molecule graph decoded from the packed binary wire format (§3.1).
///
/// Atoms are indexed `0..atom_count`, with heavy atoms occupying the index prefix
/// `0..heavy_atom_count` and, in the *extended* form only, explicit hydrogens filling the
/// suffix `heavy_atom_count..atom_count`. Bonds are stored redundantly as both an endpoint
/// list and a dense `atom_count × atom_count` index matrix, trading memory for O(1) bond
/// lookup and O(degree) neighbour iteration (§9).
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    heavy_atom_count: usize,
    hydrogen_atom_count: usize,
    heavy_bond_count: usize,
    hydrogen_bond_count: usize,
    extended: bool,

    atom_number: Vec<i8>,
    atom_hydrogens: Vec<u8>,
    charge: Option<Vec<i8>>,
    mass: Option<Vec<i8>>,
    atom_stereo: Option<Vec<TetrahedralStereo>>,
    rest_h: Option<Vec<bool>>,

    bond_endpoints: Vec<(u16, u16)>,
    bond_type: Vec<BondType>,
    bond_stereo: Option<Vec<BondStereo>>,

    /// `bond_matrix[a * atom_count + b]` is the index into `bond_endpoints`/`bond_type`, or
    /// [`NO_BOND`] if `a` and `b` are not bonded.
    bond_matrix: Vec<i32>,
    adjacency: Vec<Vec<u16>>,
}

impl Molecule {
    /// Constructs an empty molecule with the given heavy/hydrogen atom counts and no bonds.
    ///
    /// `hydrogen_atom_count` is the wire header's declared hydrogen count and is retained for
    /// similarity-ratio purposes (§4.2) even when `extended` is `false`; in that case no
    /// hydrogen atoms occupy array slots; the decoder instead folds them into
    /// `atom_hydrogens`. When `extended` is `true`, `hydrogen_atom_count` hydrogen atoms fill
    /// the index suffix `heavy_atom_count..atom_count`.
    pub fn empty(heavy_atom_count: usize, hydrogen_atom_count: usize, extended: bool) -> Self {
        let array_atom_count = heavy_atom_count + if extended { hydrogen_atom_count } else { 0 };
        Molecule {
            heavy_atom_count,
            hydrogen_atom_count,
            heavy_bond_count: 0,
            hydrogen_bond_count: 0,
            extended,
            atom_number: vec![0; array_atom_count],
            atom_hydrogens: vec![0; array_atom_count],
            charge: None,
            mass: None,
            atom_stereo: None,
            rest_h: None,
            bond_endpoints: Vec::new(),
            bond_type: Vec::new(),
            bond_stereo: None,
            bond_matrix: vec![NO_BOND; array_atom_count * array_atom_count],
            adjacency: vec![Vec::with_capacity(4); array_atom_count],
        }
    }

    /// Total number of atoms, heavy plus (if extended) hydrogen.
    pub fn atom_count(&self) -> usize {
        self.atom_number.len()
    }

    /// Number of heavy (non-hydrogen) atoms.
    pub fn heavy_atom_count(&self) -> usize {
        self.heavy_atom_count
    }

    /// Number of explicit hydrogen atoms (zero unless this molecule is in extended form).
    pub fn hydrogen_atom_count(&self) -> usize {
        self.hydrogen_atom_count
    }

    /// Number of bonds currently stored.
    pub fn bond_count(&self) -> usize {
        self.bond_endpoints.len()
    }

    /// Returns true if this molecule is in extended form (hydrogens materialised as atoms).
    pub fn is_extended(&self) -> bool {
        self.extended
    }

    /// Number of heavy-heavy bonds, per the wire header's declared split (§4.1).
    pub fn heavy_bond_count(&self) -> usize {
        self.heavy_bond_count
    }

    /// Number of heavy-hydrogen bonds, per the wire header's declared split (§4.1).
    ///
    /// Meaningful regardless of [`Self::is_extended`]: it feeds the similarity-ratio and
    /// exact-mode prefilter calculations (§4.2) even when hydrogens are only implicit.
    pub fn hydrogen_bond_count(&self) -> usize {
        self.hydrogen_bond_count
    }

    /// Sets the heavy/hydrogen bond-count split recorded during decode.
    pub fn set_bond_split(&mut self, heavy: usize, hydrogen: usize) {
        self.heavy_bond_count = heavy;
        self.hydrogen_bond_count = hydrogen;
    }

    /// Returns true if any atom carries a pseudo-atom (negative atomic number) label.
    pub fn has_pseudo_atom(&self) -> bool {
        self.atom_number.iter().any(|&n| n < 0)
    }

    /// Raw atomic-number label of `atom` (negative for pseudo-atoms).
    pub fn atom_number(&self, atom: usize) -> i8 {
        self.atom_number[atom]
    }

    /// Classified [`AtomKind`] of `atom`.
    pub fn atom_kind(&self, atom: usize) -> AtomKind {
        AtomKind::from_atomic_number(self.atom_number[atom])
    }

    /// Implicit hydrogen count attached to `atom` (meaningful in non-extended form).
    pub fn atom_hydrogens(&self, atom: usize) -> u8 {
        self.atom_hydrogens[atom]
    }

    /// Formal charge of `atom`, if the decoder was asked to retain charges.
    pub fn charge(&self, atom: usize) -> Option<i8> {
        self.charge.as_ref().map(|c| c[atom])
    }

    /// Isotope mass delta of `atom`, if the decoder was asked to retain isotopes.
    pub fn mass(&self, atom: usize) -> Option<i8> {
        self.mass.as_ref().map(|m| m[atom])
    }

    /// Tetrahedral stereo parity of `atom`, if the decoder was asked to retain stereo.
    pub fn atom_stereo(&self, atom: usize) -> Option<TetrahedralStereo> {
        self.atom_stereo.as_ref().map(|s| s[atom])
    }

    /// Whether `atom` carries the `restH` query flag (§4.2 solution validation).
    pub fn rest_h(&self, atom: usize) -> bool {
        self.rest_h.as_ref().is_some_and(|r| r[atom])
    }

    /// Raw implicit hydrogen counts for every atom, in index order.
    pub fn atom_hydrogens_slice(&self) -> &[u8] {
        &self.atom_hydrogens
    }

    /// Raw atomic-number labels for every atom, in index order.
    pub fn atom_numbers_slice(&self) -> &[i8] {
        &self.atom_number
    }

    /// Full charge array, if the decoder retained charges.
    pub fn charges(&self) -> Option<&[i8]> {
        self.charge.as_deref()
    }

    /// Full isotope (mass delta) array, if the decoder retained isotopes.
    pub fn masses(&self) -> Option<&[i8]> {
        self.mass.as_deref()
    }

    /// Full tetrahedral stereo array, if the decoder retained atom stereo.
    pub fn atom_stereos(&self) -> Option<&[TetrahedralStereo]> {
        self.atom_stereo.as_deref()
    }

    /// Full `restH` flag array, if the decoder retained it.
    pub fn rest_hs(&self) -> Option<&[bool]> {
        self.rest_h.as_deref()
    }

    /// Full bond-type array, in bond-index order.
    pub fn bond_types(&self) -> &[BondType] {
        &self.bond_type
    }

    /// Full bond stereo array, if the decoder retained bond stereo.
    pub fn bond_stereos(&self) -> Option<&[BondStereo]> {
        self.bond_stereo.as_deref()
    }

    /// Bonded-neighbour list of `atom`, in ascending atom-index order.
    pub fn bonded_atoms(&self, atom: usize) -> &[u16] {
        &self.adjacency[atom]
    }

    /// Index of the bond between `a` and `b`, if one exists.
    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        let idx = self.bond_matrix[a * self.atom_count() + b];
        (idx >= 0).then_some(idx as usize)
    }

    /// Bond type of the bond between `a` and `b`, if one exists.
    pub fn bond_type_between(&self, a: usize, b: usize) -> Option<BondType> {
        self.bond_between(a, b).map(|i| self.bond_type[i])
    }

    /// Bond stereo parity of the bond at `bond_idx`, if the decoder retained stereo.
    pub fn bond_stereo(&self, bond_idx: usize) -> Option<BondStereo> {
        self.bond_stereo.as_ref().map(|s| s[bond_idx])
    }

    /// Endpoint pair of the bond at `bond_idx`.
    pub fn bond_endpoints(&self, bond_idx: usize) -> (u16, u16) {
        self.bond_endpoints[bond_idx]
    }

    /// Enables the charge attribute array, zero-initialised.
    pub fn enable_charges(&mut self) {
        self.charge.get_or_insert_with(|| vec![0; self.atom_count()]);
    }

    /// Enables the isotope (mass delta) attribute array, zero-initialised.
    pub fn enable_isotopes(&mut self) {
        self.mass.get_or_insert_with(|| vec![0; self.atom_count()]);
    }

    /// Enables the atom stereo attribute array, initialised to [`TetrahedralStereo::None`].
    pub fn enable_atom_stereo(&mut self) {
        let count = self.atom_count();
        self.atom_stereo
            .get_or_insert_with(|| vec![TetrahedralStereo::None; count]);
    }

    /// Enables the bond stereo attribute array, initialised to [`BondStereo::None`] for every
    /// bond currently present.
    pub fn enable_bond_stereo(&mut self) {
        let count = self.bond_endpoints.len();
        self.bond_stereo
            .get_or_insert_with(|| vec![BondStereo::None; count]);
    }

    /// Enables the `restH` flag array, initialised to `false`.
    pub fn enable_rest_h(&mut self) {
        let count = self.atom_count();
        self.rest_h.get_or_insert_with(|| vec![false; count]);
    }

    /// Sets the atomic-number label of `atom`.
    pub fn set_atom_number(&mut self, atom: usize, atomic_number: i8) {
        self.atom_number[atom] = atomic_number;
    }

    /// Sets the implicit hydrogen count of `atom`.
    pub fn set_atom_hydrogens(&mut self, atom: usize, count: u8) {
        self.atom_hydrogens[atom] = count;
    }

    /// Adds to the implicit hydrogen count of `atom` (used by the decoder's hydrogen pass).
    pub fn add_atom_hydrogens(&mut self, atom: usize, delta: u8) {
        self.atom_hydrogens[atom] = self.atom_hydrogens[atom].saturating_add(delta);
    }

    /// Sets the formal charge of `atom`. Call [`Self::enable_charges`] first.
    pub fn set_charge(&mut self, atom: usize, value: i8) {
        if let Some(c) = self.charge.as_mut() {
            c[atom] = value;
        }
    }

    /// Sets the isotope mass delta of `atom`. Call [`Self::enable_isotopes`] first.
    pub fn set_mass(&mut self, atom: usize, value: i8) {
        if let Some(m) = self.mass.as_mut() {
            m[atom] = value;
        }
    }

    /// Sets the tetrahedral stereo parity of `atom`. Call [`Self::enable_atom_stereo`] first.
    pub fn set_atom_stereo(&mut self, atom: usize, parity: TetrahedralStereo) {
        if let Some(s) = self.atom_stereo.as_mut() {
            s[atom] = parity;
        }
    }

    /// Sets the `restH` flag of `atom`. Call [`Self::enable_rest_h`] first.
    pub fn set_rest_h(&mut self, atom: usize, flagged: bool) {
        if let Some(r) = self.rest_h.as_mut() {
            r[atom] = flagged;
        }
    }

    /// Adds a bond between `a` and `b` with the given type. Returns the new bond's index, or
    /// `None` if either atom's adjacency list is already at [`BOND_LIST_BASE_SIZE`] capacity
    /// (decode-time callers should turn this into a [`crate::core::error::DecodeError::BondListOverflow`]).
    pub fn add_bond(&mut self, a: usize, b: usize, bond_type: BondType) -> Option<usize> {
        if self.adjacency[a].len() >= BOND_LIST_BASE_SIZE || self.adjacency[b].len() >= BOND_LIST_BASE_SIZE {
            return None;
        }
        let idx = self.bond_endpoints.len();
        self.bond_endpoints.push((a as u16, b as u16));
        self.bond_type.push(bond_type);
        if let Some(stereo) = self.bond_stereo.as_mut() {
            stereo.push(BondStereo::None);
        }

        let atom_count = self.atom_count();
        self.bond_matrix[a * atom_count + b] = idx as i32;
        self.bond_matrix[b * atom_count + a] = idx as i32;

        insert_sorted(&mut self.adjacency[a], b as u16);
        insert_sorted(&mut self.adjacency[b], a as u16);

        Some(idx)
    }

    /// Sets the bond-stereo parity of the bond at `bond_idx`. Call [`Self::enable_bond_stereo`]
    /// first.
    pub fn set_bond_stereo(&mut self, bond_idx: usize, parity: BondStereo) {
        if let Some(s) = self.bond_stereo.as_mut() {
            s[bond_idx] = parity;
        }
    }

    /// Checks the structural invariants of §3.1: matrix/adjacency symmetry and agreement,
    /// and (for extended molecules) that every hydrogen-range atom is labelled `H` with
    /// exactly one bond.
    ///
    /// Intended for debug assertions and tests, not the decode hot path.
    pub fn check_invariants(&self) -> bool {
        let atom_count = self.atom_count();
        for a in 0..atom_count {
            for b in 0..atom_count {
                let idx = self.bond_matrix[a * atom_count + b];
                if idx != self.bond_matrix[b * atom_count + a] {
                    return false;
                }
                let adjacent = self.adjacency[a].contains(&(b as u16));
                if (idx >= 0) != adjacent {
                    return false;
                }
            }
        }
        if self.is_extended() {
            for h in self.heavy_atom_count..atom_count {
                if self.atom_number[h] != crate::core::constants::HYDROGEN_ATOM_NUMBER {
                    return false;
                }
                if self.adjacency[h].len() != 1 {
                    return false;
                }
            }
        }
        true
    }
}

fn insert_sorted(list: &mut Vec<u16>, value: u16) {
    let pos = list.binary_search(&value).unwrap_or_else(|p| p);
    list.insert(pos, value);
}
