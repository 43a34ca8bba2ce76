//! Nullable semantic assessor — scripted Channel B verdicts.

use concord_substrate::{SemanticAssessor, SubstrateError};
use concord_types::{ChannelBVerdict, DecidabilityClass, Proposal};
use std::cell::{Cell, RefCell};

/// A scripted assessor that returns a configured verdict.
pub struct NullAssessor {
    verdict: RefCell<ChannelBVerdict>,
    failing: Cell<bool>,
}

impl NullAssessor {
    /// An assessor returning a benign Class II verdict with the given score.
    pub fn aligned(score: f64) -> Self {
        Self::returning(ChannelBVerdict::new(score, DecidabilityClass::II))
    }

    pub fn returning(verdict: ChannelBVerdict) -> Self {
        Self {
            verdict: RefCell::new(verdict),
            failing: Cell::new(false),
        }
    }

    /// Change the scripted verdict.
    pub fn set_verdict(&self, verdict: ChannelBVerdict) {
        *self.verdict.borrow_mut() = verdict;
    }

    /// Make `analyze` fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl SemanticAssessor for NullAssessor {
    fn analyze(&self, _proposal: &Proposal) -> Result<ChannelBVerdict, SubstrateError> {
        if self.failing.get() {
            return Err(SubstrateError::AssessorUnavailable(
                "nullable assessor configured to fail".into(),
            ));
        }
        Ok(self.verdict.borrow().clone())
    }
}
