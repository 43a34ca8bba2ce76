//! The voting engine — owns voting periods and the delegation graph.

use crate::delegation::DelegationEngine;
use crate::error::VotingError;
use crate::tally::{VoteChoice, VotingTally};
use concord_types::{AccountAddress, DropsAmount, FrictionParams, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One proposal's voting period.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VotingPeriod {
    pub proposal_id: ProposalId,
    /// Quorum and timelock requirements for this vote.
    pub friction: FrictionParams,
    /// Accepted casts: voter → (choice, effective power at cast time).
    pub votes: HashMap<AccountAddress, (VoteChoice, DropsAmount)>,
    pub opened_at: Timestamp,
    /// Set when the period closes; makes close idempotent.
    pub tally: Option<VotingTally>,
}

/// Owns every voting period and the delegation graph.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VotingEngine {
    periods: HashMap<ProposalId, VotingPeriod>,
    delegation: DelegationEngine,
}

impl VotingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a voting period for a routed proposal.
    pub fn open_period(
        &mut self,
        proposal_id: ProposalId,
        friction: FrictionParams,
        now: Timestamp,
    ) -> Result<(), VotingError> {
        if self.periods.contains_key(&proposal_id) {
            return Err(VotingError::PeriodExists(proposal_id.to_string()));
        }
        tracing::debug!(
            proposal = %proposal_id,
            quorum = friction.required_quorum,
            "voting period opened"
        );
        self.periods.insert(
            proposal_id,
            VotingPeriod {
                proposal_id,
                friction,
                votes: HashMap::new(),
                opened_at: now,
                tally: None,
            },
        );
        Ok(())
    }

    /// Cast a vote. One cast per voter per proposal; the effective power is
    /// the voter's own power plus all delegations currently pointing at it.
    ///
    /// Returns the effective power that was recorded.
    pub fn cast_vote(
        &mut self,
        proposal_id: &ProposalId,
        voter: AccountAddress,
        choice: VoteChoice,
        own_power: DropsAmount,
    ) -> Result<DropsAmount, VotingError> {
        let delegated = self.delegation.delegated_to(&voter)?;
        let period = self
            .periods
            .get_mut(proposal_id)
            .ok_or_else(|| VotingError::PeriodNotFound(proposal_id.to_string()))?;
        if period.tally.is_some() {
            return Err(VotingError::VotingClosed);
        }
        if period.votes.contains_key(&voter) {
            return Err(VotingError::AlreadyVoted(voter.to_string()));
        }

        let effective = own_power.checked_add(delegated).ok_or(VotingError::Overflow)?;
        tracing::debug!(proposal = %proposal_id, voter = %voter, %choice, power = %effective, "vote cast");
        period.votes.insert(voter, (choice, effective));
        Ok(effective)
    }

    /// Delegate voting power. Takes effect for casts made after this call.
    pub fn delegate(
        &mut self,
        from: AccountAddress,
        to: AccountAddress,
        amount: DropsAmount,
    ) -> Result<(), VotingError> {
        self.delegation.delegate(from, to, amount)
    }

    /// Revoke a delegation entirely.
    pub fn undelegate(
        &mut self,
        from: &AccountAddress,
        to: &AccountAddress,
    ) -> Result<DropsAmount, VotingError> {
        self.delegation.undelegate(from, to)
    }

    /// Close a voting period and compute its tally.
    ///
    /// Idempotent: closing an already-closed period returns the stored
    /// tally unchanged.
    pub fn close_period(
        &mut self,
        proposal_id: &ProposalId,
        total_supply: DropsAmount,
    ) -> Result<VotingTally, VotingError> {
        let period = self
            .periods
            .get_mut(proposal_id)
            .ok_or_else(|| VotingError::PeriodNotFound(proposal_id.to_string()))?;
        if let Some(tally) = &period.tally {
            return Ok(tally.clone());
        }

        let mut yes = DropsAmount::ZERO;
        let mut no = DropsAmount::ZERO;
        let mut abstain = DropsAmount::ZERO;
        for (choice, power) in period.votes.values() {
            let bucket = match choice {
                VoteChoice::Yes => &mut yes,
                VoteChoice::No => &mut no,
                VoteChoice::Abstain => &mut abstain,
            };
            *bucket = bucket.checked_add(*power).ok_or(VotingError::Overflow)?;
        }

        let participating = yes
            .checked_add(no)
            .and_then(|p| p.checked_add(abstain))
            .ok_or(VotingError::Overflow)?;
        let participation_rate = if total_supply.is_zero() {
            0.0
        } else {
            participating.drops() as f64 / total_supply.drops() as f64
        };
        let quorum_reached = participation_rate >= period.friction.required_quorum;
        let passed = quorum_reached && yes > no;

        tracing::debug!(
            proposal = %proposal_id,
            yes = %yes,
            no = %no,
            abstain = %abstain,
            participation_rate,
            quorum_reached,
            passed,
            "voting period closed"
        );
        let tally = VotingTally {
            yes_power: yes,
            no_power: no,
            abstain_power: abstain,
            participation_rate,
            quorum_reached,
            passed,
        };
        period.tally = Some(tally.clone());
        Ok(tally)
    }

    pub fn period(&self, proposal_id: &ProposalId) -> Option<&VotingPeriod> {
        self.periods.get(proposal_id)
    }

    pub fn tally(&self, proposal_id: &ProposalId) -> Option<&VotingTally> {
        self.periods.get(proposal_id).and_then(|p| p.tally.as_ref())
    }
}
