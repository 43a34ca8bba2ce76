//! The orchestrator's per-proposal envelope.

use crate::router::RoutingDecision;
use concord_jury::JuryVerdict;
use concord_types::{
    ChannelAVerdict, ChannelBVerdict, LedgerIndex, Proposal, Timestamp, TxHash,
};
use concord_voting::VotingTally;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a governance proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernancePhase {
    /// Accepted; the oracle round is about to open.
    Submitted,
    /// Commit–reveal in progress.
    OracleReview,
    /// Oracle consensus reached; routing pending.
    Routing,
    /// External formal verification pending.
    FormalVerification,
    /// Token-weighted voting open.
    Voting,
    /// Constitutional jury convened or awaited.
    JuryReview,
    /// Human-majority jury convened or awaited (Class IV).
    HumanMajorityJury,
    /// Passed; waiting out the timelock.
    Timelock,
    /// Timelock expired; awaiting execution.
    ReadyToExecute,
    /// Terminal: executed on the substrate.
    Executed,
    /// Terminal: rejected, with a recorded reason.
    Rejected,
}

impl GovernancePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::OracleReview => "oracle-review",
            Self::Routing => "routing",
            Self::FormalVerification => "formal-verification",
            Self::Voting => "voting",
            Self::JuryReview => "jury-review",
            Self::HumanMajorityJury => "human-majority-jury",
            Self::Timelock => "timelock",
            Self::ReadyToExecute => "ready-to-execute",
            Self::Executed => "executed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for GovernancePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A proposal plus everything the orchestrator has learned about it.
///
/// Owned exclusively by the orchestrator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceProposal {
    pub proposal: Proposal,
    pub phase: GovernancePhase,
    /// Ledger index at submission; seeds jury selection.
    pub submitted_at_ledger: LedgerIndex,
    /// The Channel A consensus copied from the oracle round.
    pub channel_a: Option<ChannelAVerdict>,
    /// The external Channel B verdict used for routing.
    pub channel_b: Option<ChannelBVerdict>,
    pub routing: Option<RoutingDecision>,
    pub voting_tally: Option<VotingTally>,
    pub jury_verdict: Option<JuryVerdict>,
    pub timelock_expiry: Option<Timestamp>,
    pub execution_tx: Option<TxHash>,
    /// Terminal rejection reason, if rejected.
    pub rejection_reason: Option<String>,
}

impl GovernanceProposal {
    pub fn new(proposal: Proposal, submitted_at_ledger: LedgerIndex) -> Self {
        Self {
            proposal,
            phase: GovernancePhase::Submitted,
            submitted_at_ledger,
            channel_a: None,
            channel_b: None,
            routing: None,
            voting_tally: None,
            jury_verdict: None,
            timelock_expiry: None,
            execution_tx: None,
            rejection_reason: None,
        }
    }
}
