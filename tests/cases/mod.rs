//! Named scenario modules, one file per spec.md §8 "Testable Properties" case, mirroring the
//! teacher crate's `tests/cases/{amino_acids,dreiding_paper,nucleic_acids}.rs` split.

pub mod benzene;
pub mod extended_hydrogens;
pub mod iteration_limit;
pub mod properties;
pub mod stereo;
pub mod wildcards;
