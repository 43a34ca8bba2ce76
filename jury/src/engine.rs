//! The jury engine — owns convened panels.

use crate::error::JuryError;
use crate::panel::{JuryPanel, JuryVerdict, JuryVote};
use crate::selection::{select_jury, EligibleAccount};
use concord_types::{AccountAddress, ProposalId, ProtocolParams, Timestamp};
use std::collections::HashMap;

/// Owns every convened jury panel, keyed by proposal.
#[derive(Default)]
pub struct JuryEngine {
    panels: HashMap<ProposalId, JuryPanel>,
}

impl JuryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convene a panel for a proposal by sampling the eligible pool.
    pub fn convene(
        &mut self,
        proposal_id: ProposalId,
        seed: &[u8; 32],
        eligible: &[EligibleAccount],
        now: Timestamp,
        human_only: bool,
        params: &ProtocolParams,
    ) -> Result<&JuryPanel, JuryError> {
        if self.panels.contains_key(&proposal_id) {
            return Err(JuryError::PanelExists(proposal_id.to_string()));
        }
        let members = select_jury(seed, eligible, now, human_only, params)?;
        tracing::debug!(
            proposal = %proposal_id,
            jurors = members.len(),
            human_only,
            "jury convened"
        );
        let panel = JuryPanel::new(proposal_id, members, now, human_only);
        Ok(self.panels.entry(proposal_id).or_insert(panel))
    }

    /// Record a juror's vote on a convened panel.
    pub fn cast_vote(
        &mut self,
        proposal_id: &ProposalId,
        juror: AccountAddress,
        vote: JuryVote,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<(), JuryError> {
        let panel = self
            .panels
            .get_mut(proposal_id)
            .ok_or_else(|| JuryError::PanelNotFound(proposal_id.to_string()))?;
        panel.cast_vote(juror, vote, now, params)
    }

    /// Resolve a panel's verdict.
    pub fn resolve(
        &self,
        proposal_id: &ProposalId,
        params: &ProtocolParams,
    ) -> Result<JuryVerdict, JuryError> {
        let panel = self
            .panels
            .get(proposal_id)
            .ok_or_else(|| JuryError::PanelNotFound(proposal_id.to_string()))?;
        Ok(panel.resolve(params))
    }

    pub fn panel(&self, proposal_id: &ProposalId) -> Option<&JuryPanel> {
        self.panels.get(proposal_id)
    }
}
