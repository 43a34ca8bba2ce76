//! Governance friction derived from semantic alignment.
//!
//! Lower alignment with the constitutional axioms raises the bar for
//! passage: a larger quorum and a longer timelock. The router layers
//! class and layer floors on top of these base formulas.

use serde::{Deserialize, Serialize};

/// Quorum and timelock requirements for a proposal's voting stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrictionParams {
    /// Required participation quorum (fraction of total supply).
    pub required_quorum: f64,
    /// Timelock duration in seconds before execution.
    pub timelock_duration_s: u64,
    /// Quorum multiplier (1.0 to 1.5 before class overrides).
    pub quorum_multiplier: f64,
    /// Timelock multiplier (1.0 to 3.0 before class overrides).
    pub timelock_multiplier: f64,
    /// The alignment score the friction was derived from.
    pub alignment_score: f64,
}

impl FrictionParams {
    /// Base quorum: 10% of voting power.
    pub const BASE_QUORUM: f64 = 0.10;
    /// Base timelock: 24 hours.
    pub const BASE_TIMELOCK_SECS: u64 = 86_400;

    /// Derive friction from an alignment score.
    ///
    /// - quorum multiplier: `1.0 + (1.0 - score) * 0.5`
    /// - timelock multiplier: `1.0 + (1.0 - score) * 2.0`
    pub fn from_alignment_score(alignment_score: f64) -> Self {
        let score = alignment_score.clamp(0.0, 1.0);
        let quorum_multiplier = 1.0 + (1.0 - score) * 0.5;
        let timelock_multiplier = 1.0 + (1.0 - score) * 2.0;

        Self {
            required_quorum: Self::BASE_QUORUM * quorum_multiplier,
            timelock_duration_s: (Self::BASE_TIMELOCK_SECS as f64 * timelock_multiplier) as u64,
            quorum_multiplier,
            timelock_multiplier,
            alignment_score: score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_alignment_is_base_friction() {
        let f = FrictionParams::from_alignment_score(1.0);
        assert_eq!(f.quorum_multiplier, 1.0);
        assert_eq!(f.timelock_multiplier, 1.0);
        assert_eq!(f.required_quorum, 0.1);
        assert_eq!(f.timelock_duration_s, 86_400);
    }

    #[test]
    fn zero_alignment_is_maximum_friction() {
        let f = FrictionParams::from_alignment_score(0.0);
        assert_eq!(f.quorum_multiplier, 1.5);
        assert_eq!(f.timelock_multiplier, 3.0);
        assert!((f.required_quorum - 0.15).abs() < 1e-12);
        assert_eq!(f.timelock_duration_s, 259_200);
    }

    #[test]
    fn mid_alignment() {
        let f = FrictionParams::from_alignment_score(0.5);
        assert_eq!(f.quorum_multiplier, 1.25);
        assert_eq!(f.timelock_multiplier, 2.0);
    }

    #[test]
    fn out_of_range_scores_clamp() {
        assert_eq!(FrictionParams::from_alignment_score(7.0).alignment_score, 1.0);
        assert_eq!(FrictionParams::from_alignment_score(-2.0).alignment_score, 0.0);
    }
}
