#![doc = include_str!("../README.md")]

mod core;

pub mod config;
pub mod decode;
pub mod extract;
pub mod matcher;

pub use crate::config::MatcherConfig;
pub use crate::core::atom::{AtomKind, BondStereo, BondType, TetrahedralStereo};
pub use crate::core::error::{CanonError, DecodeError, MatchOutcome, MolmatchError};
pub use crate::core::molecule::Molecule;

pub use crate::decode::{decode, extend, is_extended_search_needed, DecodeOptions};
pub use crate::extract::canon::{CanonOutput, CanonRequest, Canonicalizer, ReferenceCanonicalizer, StereoAtomEntry, StereoBondEntry};
pub use crate::extract::tautomer::TautomerGroup;
pub use crate::extract::{extract, ExtractionSink, TautomerMode};
pub use crate::matcher::{ChargeMode, GraphMode, IsotopeMode, MatchConfig, MatcherHandle, StereoMode};
