//! Channel A — the deterministic hard gate.
//!
//! Channel A performs computationally reproducible checks on a proposal.
//! Its verdict is binary (PASS/FAIL) plus three sub-signals, and every
//! conforming implementation must compute the same verdict bits from the
//! same inputs: an incorrect verdict submitted by an oracle can be
//! challenged with an on-chain fraud proof and slashed.
//!
//! - `canonicalize`: byte-exact canonical form and proposal identifier
//! - `complexity`: compressed-size complexity bound
//! - `paradox`: pinned regex detection of self-referential paradoxes
//! - `cycles`: Tarjan SCC over the AST dependency graph
//! - `fraud`: re-execution of the pipeline from a witness

pub mod canonicalize;
pub mod complexity;
pub mod cycles;
pub mod engine;
pub mod error;
pub mod fraud;
pub mod paradox;

pub use canonicalize::{canonical_json_bytes, canonicalize, CanonicalPayload};
pub use complexity::{check_complexity, compute_complexity};
pub use cycles::{detect_cycles, find_cycles_detail};
pub use engine::verify_proposal;
pub use error::VerificationError;
pub use fraud::{
    recompute_channel_a, verify_fraud_proof, Discrepancy, FraudProof, FraudProofResult,
    FraudProofWitness,
};
pub use paradox::{detect_paradox, find_paradox_matches};
