//! Oracle operator records.

use concord_substrate::EscrowSeq;
use concord_types::{AccountAddress, DropsAmount, LedgerIndex};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an oracle operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatorStatus {
    /// Bonded but outside the active set.
    Candidate,
    /// In the current epoch's active set.
    Active,
    /// Withdrawal initiated; bond locked for one more epoch.
    Unbonding,
    /// Permanently removed for fraud. The address is burned.
    Ejected,
}

/// Participation metrics for one operator.
///
/// Reveal counters reset at every epoch rotation; `fraud_proofs` is
/// cumulative for the operator's lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorMetrics {
    pub total_participations: u64,
    pub successful_reveals: u64,
    pub missed_reveals: u64,
    pub fraud_proofs: u64,
    pub last_active_epoch: u64,
}

/// A registered oracle operator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OracleOperator {
    pub address: AccountAddress,
    /// Current bond. At least the protocol bond while Candidate/Active/
    /// Unbonding; zero after ejection.
    pub bond: DropsAmount,
    /// Substrate escrow holding the bond.
    pub escrow_seq: EscrowSeq,
    /// Ledger index of registration; active-set tie-break.
    pub registered_at: LedgerIndex,
    pub status: OperatorStatus,
    pub metrics: OperatorMetrics,
    /// Set when unbonding was initiated.
    pub unbonding_at: Option<LedgerIndex>,
}

impl OracleOperator {
    /// Whether this operator competes for active-set slots.
    pub fn is_selectable(&self) -> bool {
        matches!(self.status, OperatorStatus::Candidate | OperatorStatus::Active)
    }
}
