//! The semantic assessor interface (Channel B).

use crate::error::SubstrateError;
use concord_types::{ChannelBVerdict, Proposal};

/// The external reasoning service that scores semantic alignment.
///
/// A black box to the core: the verdict tuple is consumed opaquely and
/// never recomputed, and Channel B disagreement is never slashable.
/// Callers degrade an assessor failure to `ChannelBVerdict::conservative()`.
pub trait SemanticAssessor {
    /// Assess a proposal's alignment and decidability.
    fn analyze(&self, proposal: &Proposal) -> Result<ChannelBVerdict, SubstrateError>;
}
