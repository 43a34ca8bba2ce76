//! Per-proposal protocol state for commit–reveal.

use crate::aggregate::AggregatedVerdict;
use concord_types::{AccountAddress, LedgerIndex, OracleVerdict, ProposalId};
use serde::{Deserialize, Serialize};

/// The phase of a commit–reveal round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolPhase {
    /// Collecting commitment hashes.
    Commit,
    /// Collecting verdict reveals.
    Reveal,
    /// Aggregating revealed verdicts.
    Tallying,
    /// Aggregation done; the round is immutable.
    Complete,
}

/// An oracle's commitment to a verdict it has not yet disclosed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub oracle: AccountAddress,
    /// `sha256(canonical_json(verdict) ++ nonce)`.
    pub commitment_hash: [u8; 32],
    /// Ledger index the commitment was observed at.
    pub ledger_index: LedgerIndex,
}

/// An oracle's revealed verdict and nonce.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    pub oracle: AccountAddress,
    pub verdict: OracleVerdict,
    pub nonce: [u8; 32],
    /// Ledger index the reveal was observed at; aggregation order.
    pub ledger_index: LedgerIndex,
}

/// The full protocol state of one proposal's oracle review.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsensusRound {
    pub proposal_id: ProposalId,
    pub phase: ProtocolPhase,
    /// The active oracle set captured when the round opened.
    pub active_set: Vec<AccountAddress>,
    pub commit_deadline: LedgerIndex,
    pub reveal_deadline: LedgerIndex,
    pub commitments: Vec<Commitment>,
    pub reveals: Vec<Reveal>,
    /// Set once the round completes.
    pub aggregated: Option<AggregatedVerdict>,
}

impl ConsensusRound {
    /// Open a new round with deadlines derived from the current ledger index.
    pub fn open(
        proposal_id: ProposalId,
        active_set: Vec<AccountAddress>,
        now: LedgerIndex,
        oracle_window: u64,
    ) -> Self {
        Self {
            proposal_id,
            phase: ProtocolPhase::Commit,
            active_set,
            commit_deadline: now.plus(oracle_window),
            reveal_deadline: now.plus(2 * oracle_window),
            commitments: Vec::new(),
            reveals: Vec::new(),
            aggregated: None,
        }
    }

    pub fn has_committed(&self, oracle: &AccountAddress) -> bool {
        self.commitments.iter().any(|c| &c.oracle == oracle)
    }

    pub fn has_revealed(&self, oracle: &AccountAddress) -> bool {
        self.reveals.iter().any(|r| &r.oracle == oracle)
    }

    pub fn commitment_for(&self, oracle: &AccountAddress) -> Option<&Commitment> {
        self.commitments.iter().find(|c| &c.oracle == oracle)
    }

    /// Committers that never revealed — slashing candidates.
    pub fn non_revealers(&self) -> Vec<AccountAddress> {
        self.commitments
            .iter()
            .filter(|c| !self.has_revealed(&c.oracle))
            .map(|c| c.oracle.clone())
            .collect()
    }
}
