//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the core (clock, ledger substrate,
//! semantic assessor) are abstracted behind traits. This crate provides
//! test-friendly implementations that return deterministic values, can be
//! controlled programmatically, and never touch the network.
//!
//! Usage: swap real adapters for nullables in tests.

pub mod assessor;
pub mod clock;
pub mod ledger;

pub use assessor::NullAssessor;
pub use clock::NullClock;
pub use ledger::NullLedger;
