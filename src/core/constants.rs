//! Wire-format widths and chemistry constants shared by the decoder and matcher.
//!
//! Field widths mirror the packed binary layout of §4.1; the atomic-number
//! ranges mirror the metal/halogen classification used by the pseudo-atom
//! matching rules of §4.2.

/// Maximum number of distinct bonded neighbors a single atom may record.
///
/// Exceeding this during decode is a [`crate::core::error::DecodeError::BondListOverflow`].
pub const BOND_LIST_BASE_SIZE: usize = 16;

/// Largest atom index representable by the wire format's 12-bit packing.
pub const MAX_ATOM_IDX: u16 = 0xFFF;

/// Atomic number used for carbon, which the wire format never writes explicitly.
pub const CARBON_ATOM_NUMBER: i8 = 6;

/// Atomic number used for hydrogen.
pub const HYDROGEN_ATOM_NUMBER: i8 = 1;

/// Sentinel atomic number for an unknown/unspecified atom (`-'?'`).
pub const UNKNOWN_ATOM_NUMBER: i8 = -(b'?' as i8);

/// Sentinel atomic number for an R-group placeholder (`-'R'`).
pub const R_GROUP_ATOM_NUMBER: i8 = -(b'R' as i8);

/// Sentinel atomic number for an any-heteroatom placeholder (`-'Q'`).
pub const ANY_HETERO_ATOM_NUMBER: i8 = -(b'Q' as i8);

/// Sentinel atomic number for an any-metal placeholder (`-'M'`).
pub const ANY_METAL_ATOM_NUMBER: i8 = -(b'M' as i8);

/// Sentinel atomic number for an any-halogen placeholder (`-'X'`).
pub const ANY_HALOGEN_ATOM_NUMBER: i8 = -(b'X' as i8);

/// Inclusive atomic-number ranges classified as metals for `M` wildcard matching.
///
/// Grounded on `molecule_is_metal` in `original_source/jni/molecule.h` (`number > 2 && number <
/// 5`, etc.): groups 1 and 2 past hydrogen/helium, the transition-metal blocks, and the
/// post-transition metals/lanthanides/actinides beyond radon. The source's last clause,
/// `number > 86`, is unbounded — mirrored here as `i8::MAX` rather than an arbitrary cutoff.
pub const METAL_RANGES: &[(i8, i8)] = &[(3, 4), (11, 13), (19, 31), (37, 50), (55, 84), (87, i8::MAX)];

/// Atomic numbers classified as halogens for `X` wildcard matching (F, Cl, Br, I, At).
pub const HALOGEN_NUMBERS: &[i8] = &[9, 17, 35, 53, 85];

/// Cutoff below which a stereo-bond z-product is treated as too close to
/// planarity to assign a reliable cis/trans parity (`AB_PARITY_UNDF` results
/// instead). Owned by the canonicalization collaborator in the original
/// implementation; exposed here as the contract a [`crate::extract::canon::Canonicalizer`]
/// must honour.
pub const MIN_DOT_PROD: f64 = 0.3;

/// Returns true if `atomic_number` falls in one of the metal ranges.
pub fn is_metal(atomic_number: i8) -> bool {
    METAL_RANGES
        .iter()
        .any(|&(lo, hi)| atomic_number >= lo && atomic_number <= hi)
}

/// Returns true if `atomic_number` is one of the halogens.
pub fn is_halogen(atomic_number: i8) -> bool {
    HALOGEN_NUMBERS.contains(&atomic_number)
}
