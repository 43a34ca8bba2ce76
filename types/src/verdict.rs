//! Oracle verdict records for both verification channels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel A verdict — the deterministic hard gate.
///
/// Binary PASS/FAIL plus the three sub-signals it was computed from.
/// Invariant: `pass = (complexity_score <= max) && !paradox_found && !cycle_found`.
/// An incorrect verdict is challengeable via fraud proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAVerdict {
    /// Whether the proposal passed all Channel A checks.
    pub pass: bool,
    /// Compressed size of the canonical payload.
    pub complexity_score: u64,
    /// Whether a self-referential paradox was detected in the text.
    pub paradox_found: bool,
    /// Whether a dependency cycle was detected in the logic AST.
    pub cycle_found: bool,
}

impl ChannelAVerdict {
    /// Create a passing verdict.
    pub fn pass(complexity_score: u64) -> Self {
        Self {
            pass: true,
            complexity_score,
            paradox_found: false,
            cycle_found: false,
        }
    }

    /// Create a failing verdict.
    pub fn fail(complexity_score: u64, paradox_found: bool, cycle_found: bool) -> Self {
        Self {
            pass: false,
            complexity_score,
            paradox_found,
            cycle_found,
        }
    }
}

/// Decidability classification assigned by the semantic assessor.
///
/// Routes a proposal through the governance pipeline; the ordering is
/// significant — ties in consensus aggregation resolve to the highest
/// (most conservative) class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DecidabilityClass {
    /// Formally verifiable — routed to external formal verification.
    I,
    /// Deterministically checkable — standard voting.
    II,
    /// Requires human judgment — constitutional jury.
    III,
    /// AI must recuse — human-majority jury.
    IV,
}

impl Default for DecidabilityClass {
    fn default() -> Self {
        Self::II
    }
}

impl fmt::Display for DecidabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
        };
        write!(f, "{s}")
    }
}

/// Epistemic qualifier attached to degraded assessor output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpistemicFlag {
    /// The verdict was produced without a functioning assessor.
    Uncertain,
}

/// Channel B verdict — the external semantic assessment.
///
/// Consumed opaquely: the core never recomputes it, and disagreement over
/// Channel B is never slashable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelBVerdict {
    /// Semantic alignment with the constitutional axioms, in [0, 1].
    pub alignment_score: f64,
    /// Classification for governance routing.
    pub decidability_class: DecidabilityClass,
    /// The assessor identified a conflict of interest for AI participation.
    pub ai_interest_conflict: bool,
    /// Set when the verdict is a degraded fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epistemic_flag: Option<EpistemicFlag>,
}

impl ChannelBVerdict {
    /// Create a new verdict, clamping the score into [0, 1].
    pub fn new(alignment_score: f64, decidability_class: DecidabilityClass) -> Self {
        Self {
            alignment_score: alignment_score.clamp(0.0, 1.0),
            decidability_class,
            ai_interest_conflict: false,
            epistemic_flag: None,
        }
    }

    /// Mark this verdict as carrying an AI interest conflict.
    pub fn with_conflict(mut self) -> Self {
        self.ai_interest_conflict = true;
        self
    }

    /// The conservative fallback used when the assessor fails.
    pub fn conservative() -> Self {
        Self {
            alignment_score: 0.5,
            decidability_class: DecidabilityClass::III,
            ai_interest_conflict: false,
            epistemic_flag: Some(EpistemicFlag::Uncertain),
        }
    }
}

/// The combined verdict an oracle commits to and later reveals:
/// its deterministic Channel A computation plus the Channel B assessment
/// it obtained from its assessor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OracleVerdict {
    pub channel_a: ChannelAVerdict,
    pub channel_b: ChannelBVerdict,
}
