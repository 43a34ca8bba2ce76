//! Fundamental types for the CONCORD governance protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account addresses, hashes, drop amounts, timestamps, ledger
//! indexes, proposals, oracle verdicts, friction parameters, and the
//! protocol parameter set.

pub mod address;
pub mod amount;
pub mod error;
pub mod friction;
pub mod hash;
pub mod layer;
pub mod ledger;
pub mod params;
pub mod proposal;
pub mod time;
pub mod verdict;

pub use address::AccountAddress;
pub use amount::DropsAmount;
pub use error::ConcordError;
pub use friction::FrictionParams;
pub use hash::{ProposalId, TxHash};
pub use layer::GovernanceLayer;
pub use ledger::LedgerIndex;
pub use params::ProtocolParams;
pub use proposal::Proposal;
pub use time::Timestamp;
pub use verdict::{
    ChannelAVerdict, ChannelBVerdict, DecidabilityClass, EpistemicFlag, OracleVerdict,
};
