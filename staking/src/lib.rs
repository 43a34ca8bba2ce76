//! Staking and slashing ledger.
//!
//! Binds oracle behavior to economic penalties: missed reveals, sustained
//! inactivity, and proven fraud each burn a fraction of the operator's
//! bond into the protocol treasury, and epoch-end rewards weight each
//! active operator's pool share by its participation record.
//!
//! All monetary arithmetic is checked; an overflow is an invariant
//! violation surfaced to the caller, never silently wrapped. The ledger is
//! the only component besides the registry that writes operator records,
//! and the slash history is append-only.

pub mod error;
pub mod ledger;
pub mod rewards;
pub mod slash;

pub use error::StakingError;
pub use ledger::{SlashOutcome, StakingLedger};
pub use rewards::performance_multiplier_centi;
pub use slash::{SlashEvent, SlashType};
