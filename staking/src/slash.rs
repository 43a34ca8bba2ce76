//! Slash events.

use concord_types::{AccountAddress, DropsAmount, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

/// Why an operator was slashed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlashType {
    /// Committed but failed to reveal for a proposal.
    NonReveal,
    /// A fraud proof demonstrated an incorrect Channel A verdict.
    Fraud,
    /// Accumulated missed reveals within an epoch.
    Inactivity,
}

/// One slash applied to an operator's bond.
///
/// History is append-only: an event is never mutated once `executed`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashEvent {
    pub id: u64,
    pub oracle: AccountAddress,
    pub slash_type: SlashType,
    pub amount: DropsAmount,
    /// The proposal that triggered the slash, where applicable.
    pub proposal_id: Option<ProposalId>,
    pub timestamp: Timestamp,
    pub executed: bool,
}
