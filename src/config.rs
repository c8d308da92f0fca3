//! TOML-loadable configuration (ambient stack), mirroring the teacher crate's
//! `rules::parse_rules` idiom: a thin `toml::from_str` wrapper over a `serde`-derived type, with
//! parse failures folded into the crate's error type rather than exposed as raw `toml` errors.

use serde::Deserialize;

use crate::core::error::MolmatchError;
use crate::extract::TautomerMode;
use crate::matcher::{ChargeMode, GraphMode, IsotopeMode, MatchConfig, StereoMode};

/// Mirrors `TautomerMode` for TOML purposes: the extractor's own enum has no reason to derive
/// `Deserialize` itself (it is never round-tripped through `serde` anywhere but here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TautomerModeField {
    Disabled,
    Enabled,
}

impl From<TautomerModeField> for TautomerMode {
    fn from(value: TautomerModeField) -> Self {
        match value {
            TautomerModeField::Disabled => TautomerMode::Disabled,
            TautomerModeField::Enabled => TautomerMode::Enabled,
        }
    }
}

/// A single TOML-loadable bundle of every mode flag `molmatch` exposes: the four [`MatchConfig`]
/// fields plus the extractor's [`TautomerMode`], mirroring the teacher's `rules::Rule`/
/// `Conditions` pattern of one `#[derive(Deserialize)]` struct with `deny_unknown_fields`.
///
/// ```toml
/// graph_mode = "substructure"
/// charge_mode = "ignore"
/// isotope_mode = "ignore"
/// stereo_mode = "strict"
/// tautomer_mode = "disabled"
/// ```
///
/// Any field omitted from the document takes [`MatcherConfig::default`]'s value for that field.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MatcherConfig {
    pub graph_mode: GraphMode,
    pub charge_mode: ChargeMode,
    pub isotope_mode: IsotopeMode,
    pub stereo_mode: StereoMode,
    tautomer_mode: TautomerModeField,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            graph_mode: GraphMode::Substructure,
            charge_mode: ChargeMode::Ignore,
            isotope_mode: IsotopeMode::Ignore,
            stereo_mode: StereoMode::Ignore,
            tautomer_mode: TautomerModeField::Disabled,
        }
    }
}

impl MatcherConfig {
    /// Parses a TOML document into a [`MatcherConfig`].
    pub fn from_toml(content: &str) -> Result<Self, MolmatchError> {
        Ok(toml::from_str(content)?)
    }

    /// The four fields [`MatcherHandle::new`](crate::MatcherHandle::new) takes as mode flags.
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            graph_mode: self.graph_mode,
            charge_mode: self.charge_mode,
            isotope_mode: self.isotope_mode,
            stereo_mode: self.stereo_mode,
        }
    }

    /// The flag [`extract`](crate::extract) takes to enable tautomer-group detection.
    pub fn tautomer_mode(&self) -> TautomerMode {
        self.tautomer_mode.into()
    }
}
