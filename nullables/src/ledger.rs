//! Nullable ledger substrate — an in-memory ledger for testing.

use concord_substrate::{EscrowSeq, LedgerSubstrate, SubmitReceipt, SubstrateError};
use concord_types::{AccountAddress, DropsAmount, LedgerIndex, Timestamp, TxHash};
use std::cell::{Cell, RefCell};

/// State of a nullable escrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscrowState {
    Held,
    Finished,
    Cancelled,
}

/// A recorded escrow.
#[derive(Clone, Debug)]
pub struct EscrowRecord {
    pub owner: AccountAddress,
    pub seq: EscrowSeq,
    pub amount: DropsAmount,
    pub finish_after: Timestamp,
    pub state: EscrowState,
}

/// A memo captured by the nullable ledger.
#[derive(Clone, Debug)]
pub struct SubmittedMemo {
    pub destination: AccountAddress,
    pub memo_type: String,
    pub payload: Vec<u8>,
    pub ledger_index: LedgerIndex,
}

/// An in-memory ledger substrate.
///
/// The index only advances when told to; escrows and memos are recorded
/// for assertions. Submission failure can be switched on to exercise the
/// absorb-and-continue path.
pub struct NullLedger {
    index: Cell<u64>,
    next_escrow: Cell<EscrowSeq>,
    escrows: RefCell<Vec<EscrowRecord>>,
    memos: RefCell<Vec<SubmittedMemo>>,
    fail_submissions: Cell<bool>,
}

impl NullLedger {
    pub fn new(initial_index: u64) -> Self {
        Self {
            index: Cell::new(initial_index),
            next_escrow: Cell::new(1),
            escrows: RefCell::new(Vec::new()),
            memos: RefCell::new(Vec::new()),
            fail_submissions: Cell::new(false),
        }
    }

    /// Advance the validated-ledger index.
    pub fn advance(&self, intervals: u64) {
        self.index.set(self.index.get() + intervals);
    }

    pub fn set_index(&self, index: u64) {
        self.index.set(index);
    }

    /// Make subsequent `submit_memo` calls fail.
    pub fn fail_submissions(&self, fail: bool) {
        self.fail_submissions.set(fail);
    }

    /// All memos submitted so far.
    pub fn memos(&self) -> Vec<SubmittedMemo> {
        self.memos.borrow().clone()
    }

    /// All escrows, in creation order.
    pub fn escrows(&self) -> Vec<EscrowRecord> {
        self.escrows.borrow().clone()
    }
}

impl LedgerSubstrate for NullLedger {
    fn current_ledger_index(&self) -> LedgerIndex {
        LedgerIndex::new(self.index.get())
    }

    fn submit_memo(
        &self,
        destination: &AccountAddress,
        memo_type: &str,
        payload: &[u8],
    ) -> Result<SubmitReceipt, SubstrateError> {
        if self.fail_submissions.get() {
            return Err(SubstrateError::SubmissionFailed(
                "nullable ledger configured to fail".into(),
            ));
        }
        let ledger_index = self.current_ledger_index();
        let count = self.memos.borrow().len() as u64;
        let tx_hash = TxHash::new(concord_crypto::sha256_multi(&[
            payload,
            &count.to_be_bytes(),
        ]));
        self.memos.borrow_mut().push(SubmittedMemo {
            destination: destination.clone(),
            memo_type: memo_type.to_string(),
            payload: payload.to_vec(),
            ledger_index,
        });
        Ok(SubmitReceipt {
            tx_hash,
            ledger_index,
            validated: true,
        })
    }

    fn create_escrow(
        &self,
        owner: &AccountAddress,
        amount: DropsAmount,
        finish_after: Timestamp,
    ) -> Result<EscrowSeq, SubstrateError> {
        let seq = self.next_escrow.get();
        self.next_escrow.set(seq + 1);
        self.escrows.borrow_mut().push(EscrowRecord {
            owner: owner.clone(),
            seq,
            amount,
            finish_after,
            state: EscrowState::Held,
        });
        Ok(seq)
    }

    fn finish_escrow(&self, owner: &AccountAddress, seq: EscrowSeq) -> Result<(), SubstrateError> {
        self.transition_escrow(owner, seq, EscrowState::Finished)
    }

    fn cancel_escrow(&self, owner: &AccountAddress, seq: EscrowSeq) -> Result<(), SubstrateError> {
        self.transition_escrow(owner, seq, EscrowState::Cancelled)
    }

    fn ledger_hash(&self, index: LedgerIndex) -> Result<[u8; 32], SubstrateError> {
        Ok(concord_crypto::sha256_multi(&[
            b"ledger",
            &index.value().to_be_bytes(),
        ]))
    }
}

impl NullLedger {
    fn transition_escrow(
        &self,
        owner: &AccountAddress,
        seq: EscrowSeq,
        to: EscrowState,
    ) -> Result<(), SubstrateError> {
        let mut escrows = self.escrows.borrow_mut();
        let record = escrows
            .iter_mut()
            .find(|e| &e.owner == owner && e.seq == seq)
            .ok_or_else(|| SubstrateError::Escrow(format!("no escrow {seq} for {owner}")))?;
        if record.state != EscrowState::Held {
            return Err(SubstrateError::Escrow(format!(
                "escrow {seq} already settled"
            )));
        }
        record.state = to;
        Ok(())
    }
}
