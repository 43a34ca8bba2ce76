//! Vote choices and tallies.

use concord_types::DropsAmount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A voter's choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteChoice {
    Yes,
    No,
    Abstain,
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Abstain => "Abstain",
        };
        write!(f, "{s}")
    }
}

/// The closed result of a voting period.
///
/// Abstentions count toward participation but not toward the yes/no
/// comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VotingTally {
    pub yes_power: DropsAmount,
    pub no_power: DropsAmount,
    pub abstain_power: DropsAmount,
    /// Voted power over total supply.
    pub participation_rate: f64,
    pub quorum_reached: bool,
    /// Quorum reached and yes strictly exceeds no.
    pub passed: bool,
}

impl VotingTally {
    /// Total power that participated.
    pub fn participating_power(&self) -> Option<DropsAmount> {
        self.yes_power
            .checked_add(self.no_power)?
            .checked_add(self.abstain_power)
    }
}
