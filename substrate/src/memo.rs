//! Bit-stable memo payload formats.
//!
//! Every protocol message the core emits rides in a substrate memo as JSON
//! with a fixed `type` tag and a fixed field order. These layouts are wire
//! contracts: reorder or rename nothing.

use crate::error::SubstrateError;
use concord_types::{ChannelAVerdict, OracleVerdict};
use serde::{Deserialize, Serialize};

/// Current STATE_ANCHOR layout version.
pub const STATE_ANCHOR_VERSION: u32 = 1;

/// A protocol memo payload, externally tagged with its memo type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MemoPayload {
    /// An oracle's commitment hash for a proposal.
    #[serde(rename = "ORACLE_COMMIT")]
    OracleCommit {
        proposal_id: String,
        commitment_hash: String,
        timestamp: u64,
    },
    /// An oracle's revealed verdict and nonce.
    #[serde(rename = "ORACLE_REVEAL")]
    OracleReveal {
        proposal_id: String,
        verdict: OracleVerdict,
        nonce: String,
        timestamp: u64,
    },
    /// A token-weighted governance vote.
    #[serde(rename = "VOTE")]
    Vote {
        proposal_id: String,
        vote: String,
        power: String,
        timestamp: u64,
    },
    /// A proposal submission.
    #[serde(rename = "PROPOSAL")]
    Proposal {
        id: String,
        logic_ast: String,
        text: String,
        layer: String,
    },
    /// An oracle registering its bond escrow.
    #[serde(rename = "ORACLE_REGISTER")]
    OracleRegister {
        address: String,
        bond_drops: String,
        escrow_seq: u64,
        timestamp: u64,
    },
    /// A fraud-proof challenge against a revealed verdict.
    #[serde(rename = "FRAUD_PROOF")]
    FraudProof {
        proposal_id: String,
        claimed_verdict: ChannelAVerdict,
        canonical_payload_hex: String,
        timestamp: u64,
    },
    /// A periodic anchor of the core's state roots.
    #[serde(rename = "STATE_ANCHOR")]
    StateAnchor {
        version: u32,
        root: String,
        proposals_root: String,
        oracles_root: String,
        proposal_count: u64,
        oracle_count: u64,
        timestamp: u64,
    },
}

impl MemoPayload {
    /// The memo type tag, also used as the substrate memo type field.
    pub fn memo_type(&self) -> &'static str {
        match self {
            Self::OracleCommit { .. } => "ORACLE_COMMIT",
            Self::OracleReveal { .. } => "ORACLE_REVEAL",
            Self::Vote { .. } => "VOTE",
            Self::Proposal { .. } => "PROPOSAL",
            Self::OracleRegister { .. } => "ORACLE_REGISTER",
            Self::FraudProof { .. } => "FRAUD_PROOF",
            Self::StateAnchor { .. } => "STATE_ANCHOR",
        }
    }

    /// Serialize to the wire JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SubstrateError> {
        Ok(serde_json::to_vec(self)?)
    }
}
