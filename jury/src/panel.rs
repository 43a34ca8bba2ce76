//! Jury panels and verdict resolution.

use crate::error::JuryError;
use concord_types::{AccountAddress, ProposalId, ProtocolParams, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A juror's vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JuryVote {
    Yes,
    No,
    Abstain,
}

/// The resolution of a jury panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JuryVerdict {
    /// Yes votes reached the supermajority of decided votes.
    Approved,
    /// No votes reached the supermajority of decided votes.
    Rejected,
    /// Neither side reached the supermajority. The orchestrator treats
    /// this as a rejection.
    NoVerdict,
}

/// A convened jury for one proposal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JuryPanel {
    pub proposal_id: ProposalId,
    pub members: Vec<AccountAddress>,
    pub votes: HashMap<AccountAddress, JuryVote>,
    pub opened_at: Timestamp,
    /// Whether this is the Class IV human-majority variant.
    pub human_majority: bool,
}

impl JuryPanel {
    pub fn new(
        proposal_id: ProposalId,
        members: Vec<AccountAddress>,
        opened_at: Timestamp,
        human_majority: bool,
    ) -> Self {
        Self {
            proposal_id,
            members,
            votes: HashMap::new(),
            opened_at,
            human_majority,
        }
    }

    /// Record a juror's vote. One vote per juror, inside the voting period.
    pub fn cast_vote(
        &mut self,
        juror: AccountAddress,
        vote: JuryVote,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<(), JuryError> {
        if self
            .opened_at
            .has_expired(params.jury_voting_period_secs, now)
        {
            return Err(JuryError::VotingClosed);
        }
        if !self.members.contains(&juror) {
            return Err(JuryError::NotAJuror(juror.to_string()));
        }
        if self.votes.contains_key(&juror) {
            return Err(JuryError::AlreadyVoted(juror.to_string()));
        }
        self.votes.insert(juror, vote);
        Ok(())
    }

    /// Whether every member has voted.
    pub fn all_voted(&self) -> bool {
        self.votes.len() == self.members.len()
    }

    /// Resolve the panel by supermajority over the decided (yes/no) votes.
    ///
    /// `Approved` when `yes >= ceil((yes+no) * 2/3)`, `Rejected` for the
    /// mirror condition, otherwise `NoVerdict`. Abstentions never count
    /// toward either side.
    pub fn resolve(&self, params: &ProtocolParams) -> JuryVerdict {
        let yes = self.votes.values().filter(|v| **v == JuryVote::Yes).count() as u64;
        let no = self.votes.values().filter(|v| **v == JuryVote::No).count() as u64;
        let decided = yes + no;
        if decided == 0 {
            return JuryVerdict::NoVerdict;
        }
        let threshold = (decided * params.jury_supermajority_num)
            .div_ceil(params.jury_supermajority_den);
        if yes >= threshold {
            JuryVerdict::Approved
        } else if no >= threshold {
            JuryVerdict::Rejected
        } else {
            JuryVerdict::NoVerdict
        }
    }
}
