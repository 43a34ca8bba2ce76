//! The ledger substrate interface.

use crate::error::SubstrateError;
use concord_types::{AccountAddress, DropsAmount, LedgerIndex, Timestamp, TxHash};

/// Escrow sequence number assigned by the substrate.
pub type EscrowSeq = u64;

/// Receipt returned when a memo transaction is submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub tx_hash: TxHash,
    pub ledger_index: LedgerIndex,
    /// Whether the carrying ledger has been validated.
    pub validated: bool,
}

/// The ledger substrate consumed by the core.
///
/// Provides validated-ledger indexes for deadline arithmetic, memo
/// submission for protocol messages, escrow primitives for oracle bonds,
/// and ledger hashes for VRF seeding. The core trusts the substrate's
/// validated-ledger signal; it does not enforce finality itself.
pub trait LedgerSubstrate {
    /// The most recent validated ledger index.
    fn current_ledger_index(&self) -> LedgerIndex;

    /// Submit a memo transaction carrying a protocol payload.
    fn submit_memo(
        &self,
        destination: &AccountAddress,
        memo_type: &str,
        payload: &[u8],
    ) -> Result<SubmitReceipt, SubstrateError>;

    /// Create an escrow of `amount` releasable after `finish_after`.
    fn create_escrow(
        &self,
        owner: &AccountAddress,
        amount: DropsAmount,
        finish_after: Timestamp,
    ) -> Result<EscrowSeq, SubstrateError>;

    /// Finish (release) a previously created escrow.
    fn finish_escrow(&self, owner: &AccountAddress, seq: EscrowSeq) -> Result<(), SubstrateError>;

    /// Cancel an escrow, returning the funds to the protocol treasury.
    fn cancel_escrow(&self, owner: &AccountAddress, seq: EscrowSeq) -> Result<(), SubstrateError>;

    /// The hash of a validated ledger, for VRF seeding.
    fn ledger_hash(&self, index: LedgerIndex) -> Result<[u8; 32], SubstrateError>;
}
