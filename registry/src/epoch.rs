//! Epoch accounting.

use concord_types::{AccountAddress, LedgerIndex};
use serde::{Deserialize, Serialize};

/// A fixed ledger-interval window over which the active set, participation
/// metrics, and rewards are accounted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epoch {
    pub number: u64,
    pub start_ledger: LedgerIndex,
    pub end_ledger: LedgerIndex,
    /// The top operators by bond for this epoch, at most the protocol
    /// active-set size.
    pub active_set: Vec<AccountAddress>,
}
