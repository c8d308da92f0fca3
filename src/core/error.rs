//! Error types describing the failure modes of decoding, matching, and extraction.
//!
//! These enums aggregate lower-level issues so that library consumers can bubble up a single
//! `MolmatchError` while still inspecting fine-grained context when needed. Ordinary,
//! non-exceptional match results (no mapping found, iteration budget spent) are not errors —
//! they are carried in [`MatchOutcome`] instead, returned inside `Ok`.

use thiserror::Error;

/// Root error emitted by every fallible operation in the crate.
///
/// Each variant wraps a more specific error that pinpoints the subsystem that failed, allowing
/// callers to recover or log richer diagnostics without losing ergonomic `Result` signatures.
#[derive(Debug, Error)]
pub enum MolmatchError {
    /// Decoding the packed binary molecule representation failed.
    #[error("failed to decode molecule")]
    Decode(#[from] DecodeError),

    /// The stereo/tautomer extractor's canonicalization collaborator failed.
    #[error("canonicalization failed")]
    Canon(#[from] CanonError),

    /// Parsing a `MatcherConfig` TOML payload did not succeed.
    #[error("failed to parse matcher configuration")]
    ConfigParse(#[from] toml::de::Error),

    /// A scratch buffer required by the matcher could not be sized within the
    /// configured memory ceiling.
    #[error("out of memory sizing match buffers for {atom_count} atoms")]
    OutOfMemory {
        /// Atom count the matcher was attempting to allocate scratch space for.
        atom_count: usize,
    },
}

/// Errors raised while decoding the packed binary molecule wire format (§4.1).
///
/// Each variant corresponds to a specific validation the decoder performs before or while
/// reading records, so malformed input fails fast with a precise diagnostic rather than
/// panicking deep in record parsing.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The byte buffer ended before the fixed-width header could be read.
    #[error("truncated header: expected {expected} bytes, found {found}")]
    TruncatedHeader {
        /// Number of header bytes required.
        expected: usize,
        /// Number of bytes actually available.
        found: usize,
    },

    /// The byte buffer ended in the middle of a bond, hydrogen, or special record.
    #[error("truncated {record} record at offset {offset}")]
    TruncatedRecord {
        /// Kind of record being read (`"bond"`, `"hydrogen"`, or `"special"`).
        record: &'static str,
        /// Byte offset at which the buffer ran out.
        offset: usize,
    },

    /// A header count exceeds the 12-bit atom index ceiling the wire format can pack.
    #[error("atom count {count} exceeds the maximum representable index {max}")]
    AtomIndexOverflow {
        /// Atom count declared by the header.
        count: usize,
        /// Maximum representable atom index.
        max: u16,
    },

    /// An atom accumulated more bonded neighbors than the fixed-width adjacency list allows.
    #[error("atom {atom_id} exceeds the maximum bond list size of {max}")]
    BondListOverflow {
        /// Identifier of the atom whose adjacency list overflowed.
        atom_id: usize,
        /// Maximum number of neighbors a single atom may record.
        max: usize,
    },

    /// A bond or hydrogen record referenced an atom index outside the declared atom count.
    #[error("record references out-of-range atom index {index}")]
    AtomIndexOutOfRange {
        /// The offending index.
        index: u16,
    },

    /// A special record carried a `kind` tag not recognized by this decoder version.
    #[error("unrecognized special record kind {kind}")]
    UnknownSpecialKind {
        /// The unrecognized tag byte.
        kind: u8,
    },
}

/// Errors raised by the stereo/tautomer extractor's canonicalization collaborator.
///
/// The canonicalizer itself is an opaque external collaborator (§1, §6); this enum captures the
/// failure modes a [`crate::extract::canon::Canonicalizer`] implementation is expected to surface.
#[derive(Debug, Error)]
pub enum CanonError {
    /// The canonicalizer could not produce a consistent numbering for a connected component.
    #[error("canonical numbering failed for component of {atom_count} atoms: {message}")]
    NumberingFailed {
        /// Size of the component that failed to canonicalize.
        atom_count: usize,
        /// Human-readable reason supplied by the canonicalizer.
        message: String,
    },

    /// Tautomer group detection encountered an inconsistent bond-order assignment.
    #[error("tautomer group detection failed: {0}")]
    TautomerGroupFailed(String),
}

/// Outcome of a single `match_target` invocation that is not itself an error.
///
/// Per §7, "no mapping exists" and "the iteration budget was spent before a mapping was found"
/// are ordinary results, not failures — both are returned as `Ok(MatchOutcome::...)` so that
/// callers do not need to special-case them out of a `Result`'s error path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchOutcome {
    /// A valid mapping was found; carries the similarity score (§4.2).
    Matched {
        /// Similarity score in `[0.0, 1.0]`.
        score: f64,
    },
    /// The search space was exhausted with no valid mapping found.
    NoMatch,
    /// The iteration budget was spent before the search could conclude either way.
    LimitExceeded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_outcome_variants_are_distinguishable() {
        assert_ne!(MatchOutcome::NoMatch, MatchOutcome::LimitExceeded);
        assert_eq!(
            MatchOutcome::Matched { score: 1.0 },
            MatchOutcome::Matched { score: 1.0 }
        );
    }
}
