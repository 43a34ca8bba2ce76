//! External collaborators of the CONCORD core.
//!
//! The core performs no I/O. The ledger substrate (timestamped memo
//! transactions, escrow, validated-ledger index) and the semantic assessor
//! (Channel B) are consumed through the traits defined here; adapters
//! implement them against real backends, and `concord_nullables` provides
//! deterministic in-memory versions for tests.

pub mod assessor;
pub mod error;
pub mod ledger;
pub mod memo;

pub use assessor::SemanticAssessor;
pub use error::SubstrateError;
pub use ledger::{EscrowSeq, LedgerSubstrate, SubmitReceipt};
pub use memo::MemoPayload;
