//! The VF2-style substructure/exact matcher (§4.2).
//!
//! [`MatcherHandle`] owns a decoded query and its fixed traversal order, and is reused across
//! many `match_target` calls against different targets — exactly the "Matcher Handle" lifecycle
//! of §3.3. The handle is single-writer (§5); callers wanting parallelism clone it per worker.

pub mod feasibility;
pub mod order;
pub mod score;
pub mod stereo;
pub mod vf2;

use serde::Deserialize;

use crate::core::error::{DecodeError, MatchOutcome};
use crate::core::molecule::Molecule;
use crate::decode::{self, DecodeOptions};
use order::QueryOrder;

/// Substructure vs. exact-isomorphism search mode (§6).
///
/// Mirrors the teacher crate's `rules::Rule::result_type`-style config enums: a plain field-less
/// enum that also derives [`Deserialize`] so it can come straight out of a TOML config file
/// (see [`crate::config`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphMode {
    /// The query need only appear within the target.
    Substructure,
    /// Query and target must be isomorphic as whole graphs.
    Exact,
}

/// How formal charge participates in atom-label feasibility (§4.2, step 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeMode {
    /// Charge is not consulted.
    Ignore,
    /// Query and target charges must be equal.
    DefaultAsUncharged,
    /// Equal, except a query charge of `0` matches any target charge.
    DefaultAsAny,
}

/// How isotope mass delta participates in atom-label feasibility (§4.2, step 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsotopeMode {
    /// Isotope is not consulted.
    Ignore,
    /// Query and target isotopes must be equal.
    DefaultAsStandard,
    /// Equal, except a query isotope of `0` matches any target isotope.
    DefaultAsAny,
}

/// Whether stereo parities are validated at solution time (§4.2, "Solution validation").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StereoMode {
    /// Stereo parities are not consulted.
    Ignore,
    /// Every defined query stereo parity must be preserved by the match.
    Strict,
}

/// The mode flags a [`MatcherHandle`] is built with (§6's "mode flags").
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MatchConfig {
    pub graph_mode: GraphMode,
    pub charge_mode: ChargeMode,
    pub isotope_mode: IsotopeMode,
    pub stereo_mode: StereoMode,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            graph_mode: GraphMode::Substructure,
            charge_mode: ChargeMode::Ignore,
            isotope_mode: IsotopeMode::Ignore,
            stereo_mode: StereoMode::Ignore,
        }
    }
}

/// A reusable matcher built from one query, per §3.3.
///
/// Owns the decoded query (in whichever form — non-extended or extended — the query bytes and
/// mode flags call for) and the fixed traversal order computed once at construction.
#[derive(Debug, Clone)]
pub struct MatcherHandle {
    query: Molecule,
    order: QueryOrder,
    config: MatchConfig,
    with_r_groups: bool,
}

impl MatcherHandle {
    /// Decodes `query_data` and builds a handle ready for repeated `match_target` calls.
    ///
    /// `rest_h` is the optional per-atom `restH` flag array (§6); it is only meaningful on the
    /// query side and is retained for solution validation.
    pub fn new(query_data: &[u8], rest_h: Option<&[u8]>, config: MatchConfig) -> Result<Self, DecodeError> {
        let with_charges = !matches!(config.charge_mode, ChargeMode::Ignore);
        let with_isotopes = !matches!(config.isotope_mode, IsotopeMode::Ignore);
        let with_stereo = matches!(config.stereo_mode, StereoMode::Strict);

        let options = DecodeOptions {
            extended: false,
            with_charges,
            with_isotopes,
            with_stereo,
            ignore_charged_hydrogens: false,
            ignore_hydrogen_isotopes: false,
        };
        let query = decode::decode(query_data, rest_h, &options)?;
        let order = QueryOrder::build(&query);

        Ok(MatcherHandle {
            query,
            order,
            config,
            with_r_groups: query.has_pseudo_atom(),
        })
    }

    /// The decoded query molecule.
    pub fn query(&self) -> &Molecule {
        &self.query
    }

    /// The query's fixed traversal order.
    pub fn order(&self) -> &QueryOrder {
        &self.order
    }

    /// The mode flags this handle was built with.
    pub fn config(&self) -> MatchConfig {
        self.config
    }

    /// Decodes `target_data` and runs a DFS search for a mapping from the query into it,
    /// spending at most `iteration_limit` candidate examinations (`<= 0` meaning unlimited).
    ///
    /// Re-decodes the query in extended form first when [`decode::is_extended_search_needed`]
    /// calls for it against this particular target (§4.1's `extend` decision) — the handle's
    /// own stored query is never mutated; a local extended copy is used for that one call.
    pub fn match_target(&self, target_data: &[u8], iteration_limit: i64) -> Result<MatchOutcome, DecodeError> {
        let with_charges = !matches!(self.config.charge_mode, ChargeMode::Ignore);
        let with_isotopes = !matches!(self.config.isotope_mode, IsotopeMode::Ignore);
        let with_stereo = matches!(self.config.stereo_mode, StereoMode::Strict);

        let needs_extension = !self.query.is_extended()
            && self.query.hydrogen_atom_count() > 0
            && decode::is_extended_search_needed(target_data, self.with_r_groups, with_charges, with_isotopes);

        let target_options = DecodeOptions {
            extended: needs_extension,
            with_charges,
            with_isotopes,
            with_stereo,
            ignore_charged_hydrogens: false,
            ignore_hydrogen_isotopes: false,
        };
        let target = decode::decode(target_data, None, &target_options)?;

        if needs_extension {
            let extended_query = decode::extend(&self.query);
            let order = QueryOrder::build(&extended_query);
            return Ok(vf2::run(&extended_query, &order, &target, self.config, iteration_limit));
        }

        Ok(vf2::run(&self.query, &self.order, &target, self.config, iteration_limit))
    }
}
