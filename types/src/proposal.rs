//! Policy proposals — the immutable input to the governance pipeline.

use crate::address::AccountAddress;
use crate::hash::ProposalId;
use crate::layer::GovernanceLayer;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// A policy proposal submitted for governance.
///
/// The `id` is derived from the canonical payload (sorted-key AST JSON plus
/// normalized text) and is set by the verification engine during
/// canonicalization; two semantically equivalent proposals share an id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// SHA-256 of the canonical payload. Zero until canonicalized.
    pub id: ProposalId,
    /// Substrate account of the proposer.
    pub proposer: AccountAddress,
    /// JSON-serialized abstract syntax tree of the proposal logic.
    pub logic_ast: String,
    /// Natural-language description.
    pub text: String,
    /// Target governance layer.
    pub layer: GovernanceLayer,
    /// Wall-clock submission time, milliseconds since epoch.
    pub created_at_ms: u64,
}

impl Proposal {
    /// Create a new proposal. The id is left zero until canonicalization.
    pub fn new(
        proposer: AccountAddress,
        logic_ast: impl Into<String>,
        text: impl Into<String>,
        layer: GovernanceLayer,
        now: Timestamp,
    ) -> Self {
        Self {
            id: ProposalId::ZERO,
            proposer,
            logic_ast: logic_ast.into(),
            text: text.into(),
            layer,
            created_at_ms: now.as_millis(),
        }
    }

    /// Set the proposal id (computed by the canonicalizer).
    pub fn with_id(mut self, id: ProposalId) -> Self {
        self.id = id;
        self
    }
}
