//! Lifecycle events.
//!
//! The orchestrator emits one event per observable transition. Events are
//! queued internally (drain with `take_events`) and forwarded to every
//! registered observer; the core does not depend on any particular
//! delivery mechanism.

use crate::router::Route;
use concord_jury::JuryVerdict;
use concord_types::{
    AccountAddress, ChannelAVerdict, DropsAmount, ProposalId, Timestamp, TxHash,
};

/// An observable governance lifecycle event.
#[derive(Clone, Debug, PartialEq)]
pub enum GovernanceEvent {
    Submitted {
        id: ProposalId,
        proposer: AccountAddress,
    },
    /// Oracle review finished aggregating.
    ReviewComplete {
        id: ProposalId,
        channel_a: Option<ChannelAVerdict>,
        quorum_reached: bool,
    },
    Routed {
        id: ProposalId,
        route: Route,
    },
    VotingOpened {
        id: ProposalId,
    },
    VoteCast {
        id: ProposalId,
        voter: AccountAddress,
        power: DropsAmount,
    },
    VotingClosed {
        id: ProposalId,
        passed: bool,
    },
    JurySelected {
        id: ProposalId,
        members: Vec<AccountAddress>,
    },
    JuryVerdictReached {
        id: ProposalId,
        verdict: JuryVerdict,
    },
    Passed {
        id: ProposalId,
    },
    Rejected {
        id: ProposalId,
        reason: String,
    },
    TimelockStarted {
        id: ProposalId,
        expires_at: Timestamp,
    },
    TimelockExpired {
        id: ProposalId,
    },
    Executed {
        id: ProposalId,
        tx_hash: TxHash,
    },
}

/// Pluggable observer for lifecycle events.
pub trait GovernanceObserver {
    fn on_event(&self, event: &GovernanceEvent);
}
