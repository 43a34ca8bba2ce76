//! The four immutability-ordered governance layers.

use crate::error::ConcordError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Governance layer in the four-layer constitutional model.
///
/// Lower layers can only be modified through stricter procedures;
/// L0 is not modifiable at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GovernanceLayer {
    /// L0: immutable foundational axioms. Not targetable by proposals.
    L0Immutable,
    /// L1: constitutional rules. Supermajority quorum, month-long timelock.
    L1Constitutional,
    /// L2: day-to-day operational parameters.
    L2Operational,
    /// L3: execution-level changes.
    L3Execution,
}

impl GovernanceLayer {
    /// The wire name used in `PROPOSAL` memos.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L0Immutable => "L0-Immutable",
            Self::L1Constitutional => "L1-Constitutional",
            Self::L2Operational => "L2-Operational",
            Self::L3Execution => "L3-Execution",
        }
    }
}

impl Default for GovernanceLayer {
    fn default() -> Self {
        Self::L2Operational
    }
}

impl fmt::Display for GovernanceLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GovernanceLayer {
    type Err = ConcordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L0-Immutable" => Ok(Self::L0Immutable),
            "L1-Constitutional" => Ok(Self::L1Constitutional),
            "L2-Operational" => Ok(Self::L2Operational),
            "L3-Execution" => Ok(Self::L3Execution),
            other => Err(ConcordError::InvalidLayer(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_roundtrips_through_wire_name() {
        for layer in [
            GovernanceLayer::L0Immutable,
            GovernanceLayer::L1Constitutional,
            GovernanceLayer::L2Operational,
            GovernanceLayer::L3Execution,
        ] {
            assert_eq!(layer.as_str().parse::<GovernanceLayer>().unwrap(), layer);
        }
    }

    #[test]
    fn unknown_layer_rejected() {
        assert!("L4-Imaginary".parse::<GovernanceLayer>().is_err());
    }
}
