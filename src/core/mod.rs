//! Core data model shared by the decoder, matcher, and extractor.
//!
//! This module defines the fundamental types used throughout the `molmatch`
//! crate: the wire-format and chemistry constants the decoder and matcher
//! agree on, the small enums that classify atoms and bonds, and the
//! in-memory `Molecule` graph that both the decoder produces and the
//! matcher consumes.

pub mod atom;
pub mod constants;
pub mod error;
pub mod molecule;

pub use atom::{AtomKind, BondStereo, BondType, TetrahedralStereo};
pub use error::{CanonError, DecodeError, MatchOutcome, MolmatchError};
pub use molecule::Molecule;
