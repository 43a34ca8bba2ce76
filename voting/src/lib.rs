//! Token-weighted voting.
//!
//! Each proposal that routes to a vote gets a voting period carrying its
//! friction parameters. Voters cast once; a cast's effective power is the
//! voter's own power plus all delegations currently pointing at them.
//! Delegated power counts only when the delegate actually votes, and the
//! delegator keeps their own power for their own cast.

pub mod delegation;
pub mod engine;
pub mod error;
pub mod tally;

pub use delegation::DelegationEngine;
pub use engine::{VotingEngine, VotingPeriod};
pub use error::VotingError;
pub use tally::{VoteChoice, VotingTally};
