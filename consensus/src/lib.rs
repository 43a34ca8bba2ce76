//! Commit–reveal oracle consensus.
//!
//! Oracles first publish the hash of their verdict (commit), then the
//! verdict and nonce (reveal). Committing before revealing prevents
//! copying; the deadline pair bounds each phase in ledger intervals.
//! Aggregation is a pure function of the ordered multiset of reveals, so
//! every node that observes the same substrate history reaches the same
//! consensus record.

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod round;

pub use aggregate::{aggregate_reveals, AggregatedVerdict, ChannelBConsensus};
pub use engine::{commitment_digest, ConsensusEngine};
pub use error::ConsensusError;
pub use round::{Commitment, ConsensusRound, ProtocolPhase, Reveal};
