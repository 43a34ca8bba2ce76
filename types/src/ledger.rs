//! Ledger index type.
//!
//! The substrate assigns a monotonically increasing index to each validated
//! ledger. Oracle windows, epochs, and unbonding periods are measured in
//! ledger intervals, never in wall-clock time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated-ledger sequence number on the substrate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LedgerIndex(u64);

impl LedgerIndex {
    pub const GENESIS: Self = Self(0);

    pub fn new(index: u64) -> Self {
        Self(index)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// This index advanced by `intervals` (saturating).
    pub fn plus(&self, intervals: u64) -> Self {
        Self(self.0.saturating_add(intervals))
    }

    /// Ledger intervals elapsed since `earlier` (saturating).
    pub fn since(&self, earlier: LedgerIndex) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for LedgerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
