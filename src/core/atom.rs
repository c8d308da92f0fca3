//! Small classification enums shared by the decoder, matcher, and extractor.

use std::fmt;

use crate::core::constants::{
    ANY_HALOGEN_ATOM_NUMBER, ANY_HETERO_ATOM_NUMBER, ANY_METAL_ATOM_NUMBER, R_GROUP_ATOM_NUMBER,
    UNKNOWN_ATOM_NUMBER, is_halogen, is_metal,
};

/// Classification of an atom's label, distinguishing real elements from the pseudo-atom
/// placeholders the wire format and the matcher's feasibility checks both recognize (§3.1, §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    /// A real element, identified by its atomic number.
    Element(i8),
    /// `?` — matches any atom.
    Unknown,
    /// `R` — matches any atom (ring-substituent placeholder).
    RGroup,
    /// `Q` — matches any heteroatom (any element other than carbon or hydrogen).
    AnyHetero,
    /// `M` — matches any metal.
    AnyMetal,
    /// `X` — matches any halogen.
    AnyHalogen,
}

impl AtomKind {
    /// Classifies a raw atomic-number value as read from the wire format.
    ///
    /// Negative values are pseudo-atom sentinels (§4.1); positive values are real atomic
    /// numbers.
    pub fn from_atomic_number(value: i8) -> Self {
        match value {
            UNKNOWN_ATOM_NUMBER => AtomKind::Unknown,
            R_GROUP_ATOM_NUMBER => AtomKind::RGroup,
            ANY_HETERO_ATOM_NUMBER => AtomKind::AnyHetero,
            ANY_METAL_ATOM_NUMBER => AtomKind::AnyMetal,
            ANY_HALOGEN_ATOM_NUMBER => AtomKind::AnyHalogen,
            n => AtomKind::Element(n),
        }
    }

    /// Returns true if this is a pseudo-atom wildcard rather than a concrete element.
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, AtomKind::Element(_))
    }

    /// Returns true if a target atom of the given real atomic number would satisfy this
    /// (possibly wildcard) query atom kind, per the label-matching cascade of §4.2.
    ///
    /// Only applies when the target is a concrete element; wildcard-to-wildcard matching is
    /// handled by the feasibility layer, which also consults charge/isotope state.
    pub fn accepts(&self, target_atomic_number: i8) -> bool {
        match self {
            AtomKind::Element(n) => *n == target_atomic_number,
            AtomKind::Unknown | AtomKind::RGroup => true,
            AtomKind::AnyHetero => target_atomic_number != 6 && target_atomic_number != 1,
            AtomKind::AnyMetal => is_metal(target_atomic_number),
            AtomKind::AnyHalogen => is_halogen(target_atomic_number),
        }
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomKind::Element(n) => write!(f, "{n}"),
            AtomKind::Unknown => write!(f, "?"),
            AtomKind::RGroup => write!(f, "R"),
            AtomKind::AnyHetero => write!(f, "Q"),
            AtomKind::AnyMetal => write!(f, "M"),
            AtomKind::AnyHalogen => write!(f, "X"),
        }
    }
}

/// Tetrahedral parity of a stereo center (§3.1, §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TetrahedralStereo {
    /// Parity is unspecified or not applicable.
    None = 0,
    /// Ligands in canonical order trace a clockwise arrangement.
    Clockwise = 1,
    /// Ligands in canonical order trace an anti-clockwise arrangement.
    AntiClockwise = 2,
    /// The center carries stereo information that cannot be classified either way.
    Undefined = 3,
}

impl fmt::Display for TetrahedralStereo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TetrahedralStereo::None => "none",
            TetrahedralStereo::Clockwise => "clockwise",
            TetrahedralStereo::AntiClockwise => "anti-clockwise",
            TetrahedralStereo::Undefined => "undefined",
        };
        f.write_str(label)
    }
}

/// Cis/trans (bond) stereo parity (§3.1, §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BondStereo {
    /// Parity is unspecified or not applicable.
    None = 0,
    /// Reference ligands lie on the same side of the double bond.
    Cis = 1,
    /// Reference ligands lie on opposite sides of the double bond.
    Trans = 2,
    /// The bond carries stereo information that cannot be classified either way.
    Undefined = 3,
}

impl fmt::Display for BondStereo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BondStereo::None => "none",
            BondStereo::Cis => "cis",
            BondStereo::Trans => "trans",
            BondStereo::Undefined => "undefined",
        };
        f.write_str(label)
    }
}

/// Bond order/class as carried by the wire format (§3.1).
///
/// The `*_OR_*` variants only ever appear on the query side: they are relaxed bond-semantics
/// wildcards consulted by [`crate::matcher::feasibility::bond_matches`], never produced for a
/// concrete target bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BondType {
    /// No bond (absence marker; never stored in the adjacency matrix as a present bond).
    None = 0,
    /// Single bond.
    Single = 1,
    /// Double bond.
    Double = 2,
    /// Triple bond.
    Triple = 3,
    /// Quadruple bond.
    Quadruple = 4,
    /// Quintuple bond.
    Quintuple = 5,
    /// Sextuple bond.
    Sextuple = 6,
    /// Aromatic bond.
    Aromatic = 11,
    /// Query wildcard matching `SINGLE` or `DOUBLE`.
    SingleOrDouble = 12,
    /// Query wildcard matching `SINGLE` or `AROMATIC`.
    SingleOrAromatic = 13,
    /// Query wildcard matching `DOUBLE` or `AROMATIC`.
    DoubleOrAromatic = 14,
    /// Query wildcard matching any bond order.
    Any = 15,
}

impl fmt::Display for BondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BondType::None => "none",
            BondType::Single => "single",
            BondType::Double => "double",
            BondType::Triple => "triple",
            BondType::Quadruple => "quadruple",
            BondType::Quintuple => "quintuple",
            BondType::Sextuple => "sextuple",
            BondType::Aromatic => "aromatic",
            BondType::SingleOrDouble => "single-or-double",
            BondType::SingleOrAromatic => "single-or-aromatic",
            BondType::DoubleOrAromatic => "double-or-aromatic",
            BondType::Any => "any",
        };
        f.write_str(label)
    }
}

impl BondType {
    /// Decodes a raw wire-format bond type tag.
    pub fn from_wire(value: u8) -> Option<Self> {
        Some(match value {
            0 => BondType::None,
            1 => BondType::Single,
            2 => BondType::Double,
            3 => BondType::Triple,
            4 => BondType::Quadruple,
            5 => BondType::Quintuple,
            6 => BondType::Sextuple,
            11 => BondType::Aromatic,
            12 => BondType::SingleOrDouble,
            13 => BondType::SingleOrAromatic,
            14 => BondType::DoubleOrAromatic,
            15 => BondType::Any,
            _ => return None,
        })
    }

    /// Returns true if a *query* bond of `self`'s type is satisfied by a concrete *target*
    /// bond of type `target`, per the relaxed bond-matching rules of §4.2.
    ///
    /// In `EXACT` mode callers should compare for equality directly instead of calling this;
    /// it implements only the substructure-mode relaxation.
    pub fn accepts(&self, target: BondType) -> bool {
        match self {
            BondType::Any => true,
            BondType::SingleOrDouble => matches!(target, BondType::Single | BondType::Double),
            BondType::SingleOrAromatic => matches!(target, BondType::Single | BondType::Aromatic),
            BondType::DoubleOrAromatic => matches!(target, BondType::Double | BondType::Aromatic),
            other => *other == target,
        }
    }
}
