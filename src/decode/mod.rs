//! Decodes the packed binary wire format (§4.1) into a [`Molecule`].
//!
//! The decoder runs in two passes over the hydrogen and special-record sections: a
//! preliminary scan locates hydrogens that should be dropped before `ignoreChargedHydrogens`/
//! `ignoreHydrogenIsotopes` apply, then a full pass applies every retained attribute. This
//! mirrors the two-pass structure of the reference `molecule_create` routine, which peeks
//! ahead into the special records before committing the hydrogen pass.

pub mod wire;

use crate::core::atom::{BondStereo, BondType, TetrahedralStereo};
use crate::core::constants::{CARBON_ATOM_NUMBER, HYDROGEN_ATOM_NUMBER, MAX_ATOM_IDX};
use crate::core::error::DecodeError;
use crate::core::molecule::Molecule;
use wire::{
    RECORD_BOND_STEREO, RECORD_CHARGE, RECORD_ISOTOPE, RECORD_TETRAHEDRAL_STEREO, read_atom_numbers, read_bond_record,
    read_header, read_hydrogen_record, read_special_record,
};

/// Flags controlling which optional attributes the decoder retains and how hydrogens are
/// represented, mirroring the query/target asymmetries of §4.1-§4.2.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Materialize hydrogens as explicit atoms rather than folding them into implicit counts.
    pub extended: bool,
    /// Retain formal charges from special records.
    pub with_charges: bool,
    /// Retain isotope mass deltas from special records.
    pub with_isotopes: bool,
    /// Retain tetrahedral and cis/trans stereo parities from special records.
    pub with_stereo: bool,
    /// Drop hydrogens that carry a charge special record before counting them.
    pub ignore_charged_hydrogens: bool,
    /// Drop hydrogens that carry an isotope special record before counting them.
    pub ignore_hydrogen_isotopes: bool,
}

/// Decodes a molecule from its packed binary form plus an optional `restH` flag blob (§4.2).
///
/// `rest_h`, when present, is a byte per atom (nonzero meaning "may still bond to unmapped
/// hydrogens") and is only meaningful on the query side.
pub fn decode(data: &[u8], rest_h: Option<&[u8]>, options: &DecodeOptions) -> Result<Molecule, DecodeError> {
    let header = read_header(data)?;
    let heavy_atom_count = header.x_atom_count + header.c_atom_count;
    let atom_count = heavy_atom_count + if options.extended { header.h_atom_count } else { 0 };

    if atom_count > MAX_ATOM_IDX as usize + 1 {
        return Err(DecodeError::AtomIndexOverflow {
            count: atom_count,
            max: MAX_ATOM_IDX,
        });
    }

    let ignore_charged_hydrogens = options.ignore_charged_hydrogens && !options.extended;
    let ignore_hydrogen_isotopes = options.ignore_hydrogen_isotopes && !options.extended;

    let mut molecule = Molecule::empty(heavy_atom_count, header.h_atom_count, options.extended);

    if let Some(flags) = rest_h {
        molecule.enable_rest_h();
        for atom in 0..atom_count.min(flags.len()) {
            molecule.set_rest_h(atom, flags[atom] != 0);
        }
    }
    if options.with_charges {
        molecule.enable_charges();
    }
    if options.with_isotopes {
        molecule.enable_isotopes();
    }
    if options.with_stereo {
        molecule.enable_atom_stereo();
        molecule.enable_bond_stereo();
    }

    let mut offset = wire::header_len();

    let atom_numbers = read_atom_numbers(data, offset, header.x_atom_count)?;
    for (i, &number) in atom_numbers.iter().enumerate() {
        molecule.set_atom_number(i, number);
    }
    for i in header.x_atom_count..heavy_atom_count {
        molecule.set_atom_number(i, CARBON_ATOM_NUMBER);
    }
    for i in heavy_atom_count..atom_count {
        molecule.set_atom_number(i, HYDROGEN_ATOM_NUMBER);
    }
    offset += header.x_atom_count;

    let mut heavy_bond_count = header.x_bond_count as isize;
    let mut hydrogen_bond_count = header.h_atom_count as isize;

    for i in 0..header.x_bond_count {
        let record = read_bond_record(data, offset, i)?;
        let x = record.x as usize;
        let y = record.y as usize;
        let bond_type = BondType::from_wire(record.bond_type).unwrap_or(BondType::None);

        // An endpoint landing in the hydrogen-index range means this record is really an
        // extra (multivalent) hydrogen bonded to the *other* endpoint.
        if x >= heavy_atom_count && y < heavy_atom_count {
            molecule.add_atom_hydrogens(y, 1);
        }
        if y >= heavy_atom_count && x < heavy_atom_count {
            molecule.add_atom_hydrogens(x, 1);
        }
        if x >= heavy_atom_count || y >= heavy_atom_count {
            heavy_bond_count -= 1;
            hydrogen_bond_count += 1;
        }

        if x >= atom_count || y >= atom_count {
            continue;
        }

        if molecule.bonded_atoms(x).len() >= crate::core::constants::BOND_LIST_BASE_SIZE {
            return Err(DecodeError::BondListOverflow {
                atom_id: x,
                max: crate::core::constants::BOND_LIST_BASE_SIZE,
            });
        }
        if molecule.bonded_atoms(y).len() >= crate::core::constants::BOND_LIST_BASE_SIZE {
            return Err(DecodeError::BondListOverflow {
                atom_id: y,
                max: crate::core::constants::BOND_LIST_BASE_SIZE,
            });
        }
        molecule.add_bond(x, y, bond_type);
    }
    offset += header.x_bond_count * wire::BOND_RECORD_LEN;

    let specials_offset = offset + header.h_atom_count * wire::HYDROGEN_RECORD_LEN;

    let mut ignored_hydrogen = vec![false; header.h_atom_count];
    if ignore_charged_hydrogens || ignore_hydrogen_isotopes {
        for i in 0..header.special_count {
            let record = read_special_record(data, specials_offset, i)?;
            let idx = record.idx as usize;
            match record.kind {
                RECORD_CHARGE if ignore_charged_hydrogens && idx >= heavy_atom_count => {
                    ignored_hydrogen[idx - heavy_atom_count] = true;
                }
                RECORD_ISOTOPE if ignore_hydrogen_isotopes && idx >= heavy_atom_count => {
                    ignored_hydrogen[idx - heavy_atom_count] = true;
                }
                _ => {}
            }
        }
    }

    for i in 0..header.h_atom_count {
        let record = read_hydrogen_record(data, offset, i)?;
        let Some(record) = record else {
            hydrogen_bond_count -= 1;
            continue;
        };

        let bound_atom = record.bound_atom as usize;
        let dropped = ignored_hydrogen[i];
        if bound_atom < atom_count && !dropped {
            molecule.add_atom_hydrogens(bound_atom, 1);
        }

        if options.extended {
            let hydrogen_idx = heavy_atom_count + i;
            if bound_atom >= heavy_atom_count && bound_atom < atom_count {
                molecule.add_atom_hydrogens(hydrogen_idx, 1);
            }
            if bound_atom < atom_count {
                let bond_type = BondType::from_wire(record.bond_type).unwrap_or(BondType::Single);
                if molecule.bonded_atoms(bound_atom).len() >= crate::core::constants::BOND_LIST_BASE_SIZE {
                    return Err(DecodeError::BondListOverflow {
                        atom_id: bound_atom,
                        max: crate::core::constants::BOND_LIST_BASE_SIZE,
                    });
                }
                if molecule.bonded_atoms(hydrogen_idx).len() >= crate::core::constants::BOND_LIST_BASE_SIZE {
                    return Err(DecodeError::BondListOverflow {
                        atom_id: hydrogen_idx,
                        max: crate::core::constants::BOND_LIST_BASE_SIZE,
                    });
                }
                molecule.add_bond(bound_atom, hydrogen_idx, bond_type);
            }
        }
    }
    offset += header.h_atom_count * wire::HYDROGEN_RECORD_LEN;
    debug_assert_eq!(offset, specials_offset);

    for i in 0..header.special_count {
        let record = read_special_record(data, offset, i)?;
        let idx = record.idx as usize;
        match record.kind {
            RECORD_CHARGE => {
                if options.with_charges && idx < atom_count {
                    molecule.set_charge(idx, record.payload);
                }
            }
            RECORD_ISOTOPE => {
                if options.with_isotopes && idx < atom_count {
                    molecule.set_mass(idx, record.payload);
                }
            }
            RECORD_TETRAHEDRAL_STEREO => {
                if options.with_stereo && idx < atom_count {
                    molecule.set_atom_stereo(idx, stereo_from_payload(record.payload));
                }
            }
            RECORD_BOND_STEREO => {
                if options.with_stereo && idx < header.x_bond_count && idx < molecule.bond_count() {
                    molecule.set_bond_stereo(idx, bond_stereo_from_payload(record.payload));
                }
            }
            other => return Err(DecodeError::UnknownSpecialKind { kind: other }),
        }
    }

    molecule.set_bond_split(
        heavy_bond_count.max(0) as usize,
        hydrogen_bond_count.max(0) as usize,
    );

    Ok(molecule)
}

fn stereo_from_payload(payload: i8) -> TetrahedralStereo {
    match payload {
        1 => TetrahedralStereo::Clockwise,
        2 => TetrahedralStereo::AntiClockwise,
        3 => TetrahedralStereo::Undefined,
        _ => TetrahedralStereo::None,
    }
}

/// Wire payload `1` is the wire format's `OPPOSITE` tag (ligands on opposite sides, i.e.
/// [`BondStereo::Trans`]); `2` is `TOGETHER` ([`BondStereo::Cis`]).
fn bond_stereo_from_payload(payload: i8) -> BondStereo {
    match payload {
        1 => BondStereo::Trans,
        2 => BondStereo::Cis,
        3 => BondStereo::Undefined,
        _ => BondStereo::None,
    }
}

/// Re-decodes a non-extended molecule into extended form, materialising implicit hydrogens as
/// explicit atoms (§4.1's `extend` decision, driven by [`is_extended_search_needed`] at the call
/// site).
///
/// Every attribute array present on `template` is copied unchanged onto the heavy-atom prefix,
/// including `atom_hydrogens`: the implicit-hydrogen count stays meaningful as a feasibility
/// signal even once those same hydrogens also exist as explicit atoms.
pub fn extend(template: &Molecule) -> Molecule {
    let heavy_atom_count = template.heavy_atom_count();
    let hydrogen_atom_count = template.hydrogen_atom_count();
    let mut molecule = Molecule::empty(heavy_atom_count, hydrogen_atom_count, true);

    for atom in 0..heavy_atom_count {
        molecule.set_atom_number(atom, template.atom_number(atom));
        molecule.set_atom_hydrogens(atom, template.atom_hydrogens(atom));
    }
    for atom in heavy_atom_count..molecule.atom_count() {
        molecule.set_atom_number(atom, HYDROGEN_ATOM_NUMBER);
    }

    if template.charges().is_some() {
        molecule.enable_charges();
        for atom in 0..heavy_atom_count {
            molecule.set_charge(atom, template.charge(atom).unwrap_or(0));
        }
    }
    if template.masses().is_some() {
        molecule.enable_isotopes();
        for atom in 0..heavy_atom_count {
            molecule.set_mass(atom, template.mass(atom).unwrap_or(0));
        }
    }
    if template.atom_stereos().is_some() {
        molecule.enable_atom_stereo();
        for atom in 0..heavy_atom_count {
            molecule.set_atom_stereo(atom, template.atom_stereo(atom).unwrap_or(TetrahedralStereo::None));
        }
    }
    if template.rest_hs().is_some() {
        molecule.enable_rest_h();
        for atom in 0..heavy_atom_count {
            molecule.set_rest_h(atom, template.rest_h(atom));
        }
    }
    let with_bond_stereo = template.bond_stereos().is_some();
    if with_bond_stereo {
        molecule.enable_bond_stereo();
    }

    for bond_idx in 0..template.bond_count() {
        let (a, b) = template.bond_endpoints(bond_idx);
        let bond_type = template
            .bond_type_between(a as usize, b as usize)
            .unwrap_or(BondType::Single);
        if let Some(new_idx) = molecule.add_bond(a as usize, b as usize, bond_type) {
            if with_bond_stereo {
                let parity = template.bond_stereo(bond_idx).unwrap_or(BondStereo::None);
                molecule.set_bond_stereo(new_idx, parity);
            }
        }
    }

    let mut hydrogen_idx = heavy_atom_count;
    for atom in 0..heavy_atom_count {
        for _ in 0..template.atom_hydrogens(atom) {
            if hydrogen_idx >= molecule.atom_count() {
                break;
            }
            molecule.add_bond(atom, hydrogen_idx, BondType::Single);
            hydrogen_idx += 1;
        }
    }

    molecule.set_bond_split(template.heavy_bond_count(), template.hydrogen_bond_count());
    molecule
}

/// Decides whether a target must be re-decoded in extended form before matching a query that
/// is itself non-extended but carries implicit hydrogens (§4.2, the `native.c` `extend`
/// decision).
///
/// True when the query has implicit hydrogens and any of §4.1's five conditions hold: (a) an
/// x-atom is a pseudo-atom (any negative atomic number, with R-groups enabled); (b)/(d) a
/// hydrogen's total bond count (heavy-bond endpoints landing in the hydrogen index range, plus
/// its own hydrogen record) is not exactly one; (c) a hydrogen record is absent (`value == 0`)
/// or points outside the heavy-atom range; or, in exact mode, (e)/(f) a charge/isotope special
/// targets a hydrogen.
pub fn is_extended_search_needed(data: &[u8], with_r_groups: bool, with_charges: bool, with_isotopes: bool) -> bool {
    let Ok(header) = read_header(data) else {
        return false;
    };
    let heavy_atom_count = header.x_atom_count + header.c_atom_count;

    if with_r_groups {
        let Ok(atom_numbers) = read_atom_numbers(data, wire::header_len(), header.x_atom_count) else {
            return false;
        };
        if atom_numbers.iter().any(|&n| n < 0) {
            return true;
        }
    }

    let bonds_offset = wire::header_len() + header.x_atom_count;
    let hydrogens_offset = bonds_offset + header.x_bond_count * wire::BOND_RECORD_LEN;

    // Per-hydrogen bond tally (`hBonds[]` in `molecule.h`): every heavy-bond endpoint landing in
    // the hydrogen index range counts toward that hydrogen's total, before the hydrogen records
    // themselves add one more each.
    let mut h_bonds = vec![0u32; header.h_atom_count];
    for i in 0..header.x_bond_count {
        let Ok(record) = read_bond_record(data, bonds_offset, i) else {
            return false;
        };
        for endpoint in [record.x as usize, record.y as usize] {
            if endpoint >= heavy_atom_count {
                match h_bonds.get_mut(endpoint - heavy_atom_count) {
                    Some(slot) => *slot += 1,
                    None => return true,
                }
            }
        }
    }

    for i in 0..header.h_atom_count {
        match read_hydrogen_record(data, hydrogens_offset, i) {
            Ok(None) => return true,
            Ok(Some(record)) => {
                if record.bound_atom as usize >= heavy_atom_count {
                    return true;
                }
                h_bonds[i] += 1;
            }
            Err(_) => return false,
        }
    }

    if h_bonds.iter().any(|&count| count != 1) {
        return true;
    }

    if !with_charges && !with_isotopes {
        return false;
    }

    let specials_offset = hydrogens_offset + header.h_atom_count * wire::HYDROGEN_RECORD_LEN;
    for i in 0..header.special_count {
        let Ok(record) = read_special_record(data, specials_offset, i) else {
            continue;
        };
        let idx = record.idx as usize;
        let targets_hydrogen = idx >= heavy_atom_count && idx < heavy_atom_count + header.h_atom_count;
        match record.kind {
            RECORD_CHARGE if with_charges && targets_hydrogen => return true,
            RECORD_ISOTOPE if with_isotopes && targets_hydrogen => return true,
            _ => {}
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(x_atoms: u16, c_atoms: u16, h_atoms: u16, x_bonds: u16, specials: u16) -> Vec<u8> {
        let mut out = Vec::new();
        for field in [x_atoms, c_atoms, h_atoms, x_bonds, specials] {
            out.push((field >> 8) as u8);
            out.push((field & 0xFF) as u8);
        }
        out
    }

    #[test]
    fn decodes_a_minimal_non_extended_single_bond() {
        // One explicit oxygen atom (atomic number 8), one implicit carbon, one single bond.
        let mut data = header_bytes(1, 1, 0, 1, 0);
        data.push(8); // x-atom label
        data.extend_from_slice(&[0x00, 0x00, 0x01, 1]); // bond 0-1, single

        let molecule = decode(&data, None, &DecodeOptions::default()).unwrap();
        assert_eq!(molecule.heavy_atom_count(), 2);
        assert!(!molecule.is_extended());
        assert_eq!(molecule.atom_number(0), 8);
        assert_eq!(molecule.atom_number(1), CARBON_ATOM_NUMBER);
        assert_eq!(molecule.bond_count(), 1);
        assert_eq!(molecule.bond_type_between(0, 1), Some(BondType::Single));
        assert_eq!(molecule.heavy_bond_count(), 1);
        assert_eq!(molecule.hydrogen_bond_count(), 0);
    }

    #[test]
    fn folds_hydrogen_records_into_implicit_counts_when_not_extended() {
        let mut data = header_bytes(0, 1, 1, 0, 0);
        data.extend_from_slice(&[0x10, 0x00]); // bond type 1 (single), bound to heavy atom 0

        let molecule = decode(&data, None, &DecodeOptions::default()).unwrap();
        assert_eq!(molecule.atom_count(), 1);
        assert_eq!(molecule.atom_hydrogens(0), 1);
        assert_eq!(molecule.hydrogen_bond_count(), 1);
    }

    #[test]
    fn extended_decode_materialises_hydrogen_atoms() {
        let mut data = header_bytes(0, 1, 1, 0, 0);
        data.extend_from_slice(&[0x10, 0x00]); // bond type 1 (single), bound to atom 0

        let options = DecodeOptions {
            extended: true,
            ..Default::default()
        };
        let molecule = decode(&data, None, &options).unwrap();
        assert_eq!(molecule.atom_count(), 2);
        assert!(molecule.is_extended());
        assert_eq!(molecule.atom_number(1), HYDROGEN_ATOM_NUMBER);
        assert_eq!(molecule.bond_type_between(0, 1), Some(BondType::Single));
    }

    #[test]
    fn charge_special_record_requires_with_charges() {
        let mut data = header_bytes(1, 0, 0, 0, 1);
        data.push(8);
        data.extend_from_slice(&[0x00, 0x00, (-1i8) as u8]); // charge -1 on atom 0

        let without = decode(&data, None, &DecodeOptions::default()).unwrap();
        assert_eq!(without.charge(0), None);

        let options = DecodeOptions {
            with_charges: true,
            ..Default::default()
        };
        let with = decode(&data, None, &options).unwrap();
        assert_eq!(with.charge(0), Some(-1));
    }

    #[test]
    fn header_truncation_propagates_as_decode_error() {
        let data = [0u8; 4];
        assert!(matches!(
            decode(&data, None, &DecodeOptions::default()),
            Err(DecodeError::TruncatedHeader { .. })
        ));
    }

    #[test]
    fn extend_preserves_implicit_hydrogen_counts_on_heavy_atoms() {
        let mut data = header_bytes(0, 1, 1, 0, 0);
        data.extend_from_slice(&[0x10, 0x00]);
        let template = decode(&data, None, &DecodeOptions::default()).unwrap();
        assert_eq!(template.atom_hydrogens(0), 1);

        let extended = extend(&template);
        assert!(extended.is_extended());
        assert_eq!(extended.atom_count(), 2);
        assert_eq!(extended.atom_hydrogens(0), 1, "implicit count survives extension");
        assert_eq!(extended.bond_type_between(0, 1), Some(BondType::Single));
    }

    #[test]
    fn extended_search_not_needed_without_multivalent_hydrogens_or_wildcards() {
        let mut data = header_bytes(1, 0, 1, 0, 0);
        data.push(8);
        data.extend_from_slice(&[0x10, 0x00]); // bond type single, hydrogen bound to the heavy oxygen atom
        assert!(!is_extended_search_needed(&data, true, true, true));
    }

    #[test]
    fn extended_search_needed_for_r_group_query_atoms() {
        let mut data = header_bytes(1, 0, 0, 0, 0);
        data.push(crate::core::constants::R_GROUP_ATOM_NUMBER as u8);
        assert!(is_extended_search_needed(&data, true, false, false));
    }

    #[test]
    fn extended_search_needed_for_any_pseudo_atom_not_just_r_group() {
        // `Q` (any-heteroatom) is just as much a pseudo-atom as `R`: any negative atomic number
        // triggers condition (a), not only the R-group sentinel.
        let mut data = header_bytes(1, 0, 0, 0, 0);
        data.push(crate::core::constants::ANY_HETERO_ATOM_NUMBER as u8);
        assert!(is_extended_search_needed(&data, true, false, false));
    }

    #[test]
    fn extended_search_needed_for_absent_hydrogen_record() {
        // A hydrogen record whose packed value is exactly 0 is the wire format's "absent"
        // sentinel, which itself demands extension per condition (c).
        let mut data = header_bytes(1, 0, 1, 0, 0);
        data.push(8);
        data.extend_from_slice(&[0x00, 0x00]);
        assert!(is_extended_search_needed(&data, false, false, false));
    }

    #[test]
    fn extended_search_needed_for_hydrogen_made_multivalent_by_a_heavy_bond_record() {
        // One heavy atom, one hydrogen. A heavy-bond record's second endpoint (index 1) lands
        // in the hydrogen index range, and the hydrogen also has its own ordinary record
        // pointing at the heavy atom — two bonds total for that hydrogen, tripping condition
        // (b)/(d) even though no hydrogen record by itself looks multivalent.
        let mut data = header_bytes(1, 0, 1, 1, 0);
        data.push(8);
        data.extend_from_slice(&[0x00, 0x00, 0x01, 1]); // heavy bond 0-1, single
        data.extend_from_slice(&[0x10, 0x00]); // hydrogen 0: bound to heavy atom 0
        assert!(is_extended_search_needed(&data, false, false, false));
    }

    #[test]
    fn extended_search_needed_for_multivalent_hydrogen_even_with_charge_isotope_ignored() {
        // Two hydrogens, x-atom heavy_atom_count == 1; hydrogen 1 binds to hydrogen 0 (index 1),
        // not to the heavy atom: its bound_atom field (1) lands in the hydrogen index range.
        let mut data = header_bytes(1, 0, 2, 0, 0);
        data.push(8);
        data.extend_from_slice(&[0x10, 0x00]); // hydrogen 0: bound to heavy atom 0
        data.extend_from_slice(&[0x10, 0x01]); // hydrogen 1: bound to hydrogen 0 (atom index 1)
        assert!(is_extended_search_needed(&data, false, false, false));
    }
}
