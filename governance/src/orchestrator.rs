//! The governance orchestrator.
//!
//! Drives each proposal through the lifecycle state machine as external
//! events arrive: oracle verdicts aggregate, the assessor responds, votes
//! close, juries resolve, timelocks expire. Time-based transitions happen
//! on `check_phase_transitions`, which a host ticker calls periodically;
//! the tick is idempotent.

use crate::error::GovernanceError;
use crate::events::{GovernanceEvent, GovernanceObserver};
use crate::proposal::{GovernancePhase, GovernanceProposal};
use crate::router::{route_proposal, Route};
use concord_consensus::ConsensusEngine;
use concord_jury::{jury_seed, EligibleAccount, JuryEngine, JuryVerdict, JuryVote};
use concord_substrate::{LedgerSubstrate, MemoPayload, SemanticAssessor};
use concord_types::{
    AccountAddress, ChannelBVerdict, DropsAmount, FrictionParams, GovernanceLayer, LedgerIndex,
    OracleVerdict, Proposal, ProposalId, ProtocolParams, Timestamp, TxHash,
};
use concord_voting::{VoteChoice, VotingEngine};
use std::collections::HashMap;

/// Sequences proposals through review, routing, resolution, timelock, and
/// execution. Sole writer of [`GovernanceProposal`] records.
pub struct GovernanceOrchestrator {
    proposals: HashMap<ProposalId, GovernanceProposal>,
    consensus: ConsensusEngine,
    voting: VotingEngine,
    jury: JuryEngine,
    observers: Vec<Box<dyn GovernanceObserver>>,
    pending_events: Vec<GovernanceEvent>,
}

impl GovernanceOrchestrator {
    pub fn new() -> Self {
        Self {
            proposals: HashMap::new(),
            consensus: ConsensusEngine::new(),
            voting: VotingEngine::new(),
            jury: JuryEngine::new(),
            observers: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    /// Register an observer for lifecycle events.
    pub fn subscribe(&mut self, observer: Box<dyn GovernanceObserver>) {
        self.observers.push(observer);
    }

    /// Drain the queued lifecycle events.
    pub fn take_events(&mut self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Accept a proposal, derive its canonical id, announce it on the
    /// substrate, and open its oracle review round.
    ///
    /// A memo submission failure is absorbed: the proposal still enters
    /// review with local state.
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &mut self,
        proposer: AccountAddress,
        logic_ast: String,
        text: String,
        layer: GovernanceLayer,
        active_set: Vec<AccountAddress>,
        substrate: &dyn LedgerSubstrate,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<ProposalId, GovernanceError> {
        let proposal = Proposal::new(proposer, logic_ast, text, layer, now);
        let canonical = concord_verification::canonicalize(&proposal)
            .map_err(|e| GovernanceError::MalformedProposal(e.to_string()))?;
        let id = canonical.proposal_id();
        if self.proposals.contains_key(&id) {
            return Err(GovernanceError::DuplicateProposal(id.to_string()));
        }
        let proposal = proposal.with_id(id);
        let ledger_now = substrate.current_ledger_index();

        let memo = MemoPayload::Proposal {
            id: id.to_hex(),
            logic_ast: proposal.logic_ast.clone(),
            text: proposal.text.clone(),
            layer: layer.as_str().to_string(),
        };
        self.publish_memo(substrate, &proposal.proposer, &memo);

        let proposer_addr = proposal.proposer.clone();
        self.proposals
            .insert(id, GovernanceProposal::new(proposal, ledger_now));
        self.emit(GovernanceEvent::Submitted {
            id,
            proposer: proposer_addr,
        });

        self.consensus.open_round(id, active_set, ledger_now, params)?;
        self.set_phase(&id, GovernancePhase::OracleReview);
        Ok(id)
    }

    // ── Oracle review ────────────────────────────────────────────────────

    /// Record an oracle's commitment for a proposal under review.
    pub fn record_commit(
        &mut self,
        id: &ProposalId,
        oracle: AccountAddress,
        commitment_hash: [u8; 32],
        ledger_now: LedgerIndex,
    ) -> Result<(), GovernanceError> {
        self.consensus
            .submit_commit(id, oracle, commitment_hash, ledger_now)?;
        Ok(())
    }

    /// Record an oracle's reveal for a proposal under review.
    pub fn record_reveal(
        &mut self,
        id: &ProposalId,
        oracle: AccountAddress,
        verdict: OracleVerdict,
        nonce: [u8; 32],
        ledger_now: LedgerIndex,
        params: &ProtocolParams,
    ) -> Result<(), GovernanceError> {
        self.consensus
            .submit_reveal(id, oracle, verdict, nonce, ledger_now, params)?;
        Ok(())
    }

    /// The idempotent tick: expire commit/reveal windows, route proposals
    /// whose oracle round has completed, and release expired timelocks.
    pub fn check_phase_transitions(
        &mut self,
        now: Timestamp,
        ledger_now: LedgerIndex,
        assessor: &dyn SemanticAssessor,
        params: &ProtocolParams,
    ) {
        self.consensus.tick(ledger_now, params);

        let ready: Vec<ProposalId> = self
            .proposals
            .iter()
            .filter(|(id, p)| {
                p.phase == GovernancePhase::OracleReview && self.consensus.aggregated(id).is_some()
            })
            .map(|(id, _)| *id)
            .collect();
        for id in ready {
            if let Err(e) = self.complete_oracle_review(&id, assessor, now, params) {
                tracing::warn!(proposal = %id, error = %e, "oracle review completion failed");
            }
        }

        let expired: Vec<ProposalId> = self
            .proposals
            .iter()
            .filter(|(_, p)| {
                p.phase == GovernancePhase::Timelock
                    && p.timelock_expiry.map(|e| now >= e).unwrap_or(false)
            })
            .map(|(id, _)| *id)
            .collect();
        for id in expired {
            self.set_phase(&id, GovernancePhase::ReadyToExecute);
            self.emit(GovernanceEvent::TimelockExpired { id });
        }
    }

    /// Consume the aggregated oracle verdict and the assessor's Channel B
    /// verdict, then route.
    fn complete_oracle_review(
        &mut self,
        id: &ProposalId,
        assessor: &dyn SemanticAssessor,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<(), GovernanceError> {
        let aggregated = self
            .consensus
            .aggregated(id)
            .cloned()
            .ok_or(GovernanceError::ReviewIncomplete)?;

        let (proposal, layer) = {
            let record = self.proposal_mut(id)?;
            if record.phase != GovernancePhase::OracleReview {
                return Err(GovernanceError::WrongPhase(record.phase.as_str()));
            }
            record.phase = GovernancePhase::Routing;
            record.channel_a = aggregated.channel_a.clone();
            (record.proposal.clone(), record.proposal.layer)
        };
        self.emit(GovernanceEvent::ReviewComplete {
            id: *id,
            channel_a: aggregated.channel_a.clone(),
            quorum_reached: aggregated.quorum_reached,
        });

        let channel_a = match (&aggregated.channel_a, aggregated.quorum_reached) {
            (Some(verdict), true) => verdict.clone(),
            _ => {
                return self.reject(id, "oracle quorum not reached".to_string());
            }
        };

        let channel_b = match assessor.analyze(&proposal) {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(proposal = %id, error = %e, "assessor failed, using conservative verdict");
                ChannelBVerdict::conservative()
            }
        };

        let decision = route_proposal(layer, &channel_a, &channel_b, params);
        {
            let record = self.proposal_mut(id)?;
            record.channel_b = Some(channel_b);
            record.routing = Some(decision.clone());
        }
        self.emit(GovernanceEvent::Routed {
            id: *id,
            route: decision.route,
        });

        match decision.route {
            Route::Rejected => self.reject(id, decision.reason),
            Route::StandardVoting => self.open_voting(id, decision.friction, now),
            Route::ConstitutionalJury => {
                self.set_phase(id, GovernancePhase::JuryReview);
                Ok(())
            }
            Route::HumanMajorityJury => {
                self.set_phase(id, GovernancePhase::HumanMajorityJury);
                Ok(())
            }
            Route::FormalVerification => {
                self.set_phase(id, GovernancePhase::FormalVerification);
                Ok(())
            }
        }
    }

    // ── Formal verification ──────────────────────────────────────────────

    /// Apply the outcome of external formal verification: approval sends
    /// the proposal to voting, anything else rejects it.
    pub fn formal_verification_result(
        &mut self,
        id: &ProposalId,
        approved: bool,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let friction = {
            let record = self.proposal(id)?;
            if record.phase != GovernancePhase::FormalVerification {
                return Err(GovernanceError::WrongPhase(record.phase.as_str()));
            }
            self.routing_friction(record)?
        };
        if approved {
            self.open_voting(id, friction, now)
        } else {
            self.reject(id, "external formal verification failed".to_string())
        }
    }

    // ── Jury ─────────────────────────────────────────────────────────────

    /// Convene the jury for a proposal routed to jury review, seeded from
    /// the ledger hash at submission.
    pub fn convene_jury(
        &mut self,
        id: &ProposalId,
        eligible: &[EligibleAccount],
        substrate: &dyn LedgerSubstrate,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<(), GovernanceError> {
        let (human_only, submitted_at) = {
            let record = self.proposal(id)?;
            let human_only = match record.phase {
                GovernancePhase::JuryReview => false,
                GovernancePhase::HumanMajorityJury => true,
                _ => return Err(GovernanceError::WrongPhase(record.phase.as_str())),
            };
            (human_only, record.submitted_at_ledger)
        };

        let seed = jury_seed(id, &substrate.ledger_hash(submitted_at)?);
        let members = self
            .jury
            .convene(*id, &seed, eligible, now, human_only, params)?
            .members
            .clone();
        self.emit(GovernanceEvent::JurySelected { id: *id, members });
        Ok(())
    }

    /// Record a juror's vote.
    pub fn jury_vote(
        &mut self,
        id: &ProposalId,
        juror: AccountAddress,
        vote: JuryVote,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<(), GovernanceError> {
        let record = self.proposal(id)?;
        match record.phase {
            GovernancePhase::JuryReview | GovernancePhase::HumanMajorityJury => {}
            _ => return Err(GovernanceError::WrongPhase(record.phase.as_str())),
        }
        self.jury.cast_vote(id, juror, vote, now, params)?;
        Ok(())
    }

    /// Resolve a convened jury. Approval on an L1 proposal continues to a
    /// constitutional vote; approval elsewhere starts the timelock; no
    /// verdict counts as rejection.
    pub fn resolve_jury(
        &mut self,
        id: &ProposalId,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<JuryVerdict, GovernanceError> {
        let (layer, friction) = {
            let record = self.proposal(id)?;
            match record.phase {
                GovernancePhase::JuryReview | GovernancePhase::HumanMajorityJury => {}
                _ => return Err(GovernanceError::WrongPhase(record.phase.as_str())),
            }
            (record.proposal.layer, self.routing_friction(record)?)
        };

        let verdict = self.jury.resolve(id, params)?;
        self.proposal_mut(id)?.jury_verdict = Some(verdict);
        self.emit(GovernanceEvent::JuryVerdictReached { id: *id, verdict });

        match verdict {
            JuryVerdict::Approved => {
                if layer == GovernanceLayer::L1Constitutional {
                    self.open_voting(id, friction, now)?;
                } else {
                    self.start_timelock(id, now)?;
                }
            }
            JuryVerdict::Rejected => {
                self.reject(id, "rejected by jury supermajority".to_string())?;
            }
            JuryVerdict::NoVerdict => {
                self.reject(id, "jury reached no verdict".to_string())?;
            }
        }
        Ok(verdict)
    }

    // ── Voting ───────────────────────────────────────────────────────────

    /// Cast a token-weighted vote on a proposal in its voting phase.
    pub fn cast_vote(
        &mut self,
        id: &ProposalId,
        voter: AccountAddress,
        choice: VoteChoice,
        own_power: DropsAmount,
    ) -> Result<(), GovernanceError> {
        let record = self.proposal(id)?;
        if record.phase != GovernancePhase::Voting {
            return Err(GovernanceError::WrongPhase(record.phase.as_str()));
        }
        let power = self.voting.cast_vote(id, voter.clone(), choice, own_power)?;
        self.emit(GovernanceEvent::VoteCast {
            id: *id,
            voter,
            power,
        });
        Ok(())
    }

    /// Delegate voting power.
    pub fn delegate(
        &mut self,
        from: AccountAddress,
        to: AccountAddress,
        amount: DropsAmount,
    ) -> Result<(), GovernanceError> {
        self.voting.delegate(from, to, amount)?;
        Ok(())
    }

    /// Revoke a delegation.
    pub fn undelegate(
        &mut self,
        from: &AccountAddress,
        to: &AccountAddress,
    ) -> Result<(), GovernanceError> {
        self.voting.undelegate(from, to)?;
        Ok(())
    }

    /// Close the voting period: a passing tally starts the timelock,
    /// anything else rejects. Closing twice is rejected by the phase gate.
    pub fn close_voting(
        &mut self,
        id: &ProposalId,
        total_supply: DropsAmount,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        {
            let record = self.proposal(id)?;
            if record.phase != GovernancePhase::Voting {
                return Err(GovernanceError::WrongPhase(record.phase.as_str()));
            }
        }
        let tally = self.voting.close_period(id, total_supply)?;
        let passed = tally.passed;
        let quorum_reached = tally.quorum_reached;
        self.proposal_mut(id)?.voting_tally = Some(tally);
        self.emit(GovernanceEvent::VotingClosed { id: *id, passed });

        if passed {
            self.start_timelock(id, now)
        } else if !quorum_reached {
            self.reject(id, "voting quorum not reached".to_string())
        } else {
            self.reject(id, "majority voted against".to_string())
        }
    }

    // ── Timelock & execution ─────────────────────────────────────────────

    /// Mark a proposal executed, recording the substrate transaction.
    pub fn execute(&mut self, id: &ProposalId, tx_hash: TxHash) -> Result<(), GovernanceError> {
        {
            let record = self.proposal_mut(id)?;
            if record.phase != GovernancePhase::ReadyToExecute {
                return Err(GovernanceError::WrongPhase(record.phase.as_str()));
            }
            record.phase = GovernancePhase::Executed;
            record.execution_tx = Some(tx_hash);
        }
        self.emit(GovernanceEvent::Executed { id: *id, tx_hash });
        Ok(())
    }

    // ── State anchoring ──────────────────────────────────────────────────

    /// Anchor the current proposal and oracle sets on the substrate.
    pub fn anchor_state(
        &mut self,
        substrate: &dyn LedgerSubstrate,
        anchor_account: &AccountAddress,
        oracle_addresses: &[AccountAddress],
        now: Timestamp,
    ) -> Result<TxHash, GovernanceError> {
        let mut proposal_ids: Vec<&ProposalId> = self.proposals.keys().collect();
        proposal_ids.sort();
        let mut proposal_bytes = Vec::with_capacity(proposal_ids.len() * 32);
        for pid in &proposal_ids {
            proposal_bytes.extend_from_slice(pid.as_bytes());
        }
        let proposals_root = concord_crypto::sha256(&proposal_bytes);

        let mut oracles: Vec<&AccountAddress> = oracle_addresses.iter().collect();
        oracles.sort();
        let mut oracle_bytes = Vec::new();
        for addr in &oracles {
            oracle_bytes.extend_from_slice(addr.as_str().as_bytes());
            oracle_bytes.push(0);
        }
        let oracles_root = concord_crypto::sha256(&oracle_bytes);
        let root = concord_crypto::sha256_multi(&[&proposals_root, &oracles_root]);

        let memo = MemoPayload::StateAnchor {
            version: concord_substrate::memo::STATE_ANCHOR_VERSION,
            root: hex::encode(root),
            proposals_root: hex::encode(proposals_root),
            oracles_root: hex::encode(oracles_root),
            proposal_count: proposal_ids.len() as u64,
            oracle_count: oracles.len() as u64,
            timestamp: now.as_secs(),
        };
        let receipt = substrate.submit_memo(anchor_account, memo.memo_type(), &memo.to_bytes()?)?;
        Ok(receipt.tx_hash)
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// The current state of a proposal.
    pub fn proposal(&self, id: &ProposalId) -> Result<&GovernanceProposal, GovernanceError> {
        self.proposals
            .get(id)
            .ok_or_else(|| GovernanceError::ProposalNotFound(id.to_string()))
    }

    /// All proposals, in unspecified order.
    pub fn proposals(&self) -> impl Iterator<Item = &GovernanceProposal> {
        self.proposals.values()
    }

    /// The commit–reveal state of a proposal's oracle round.
    pub fn consensus(&self) -> &ConsensusEngine {
        &self.consensus
    }

    /// The jury panel for a proposal, if convened.
    pub fn jury(&self) -> &JuryEngine {
        &self.jury
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn open_voting(
        &mut self,
        id: &ProposalId,
        friction: FrictionParams,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.voting.open_period(*id, friction, now)?;
        self.set_phase(id, GovernancePhase::Voting);
        self.emit(GovernanceEvent::VotingOpened { id: *id });
        Ok(())
    }

    fn start_timelock(&mut self, id: &ProposalId, now: Timestamp) -> Result<(), GovernanceError> {
        let duration = {
            let record = self.proposal(id)?;
            self.routing_friction(record)?.timelock_duration_s
        };
        let expires_at = now.plus_secs(duration);
        {
            let record = self.proposal_mut(id)?;
            record.phase = GovernancePhase::Timelock;
            record.timelock_expiry = Some(expires_at);
        }
        self.emit(GovernanceEvent::Passed { id: *id });
        self.emit(GovernanceEvent::TimelockStarted { id: *id, expires_at });
        Ok(())
    }

    fn reject(&mut self, id: &ProposalId, reason: String) -> Result<(), GovernanceError> {
        {
            let record = self.proposal_mut(id)?;
            record.phase = GovernancePhase::Rejected;
            record.rejection_reason = Some(reason.clone());
        }
        tracing::debug!(proposal = %id, reason = %reason, "proposal rejected");
        self.emit(GovernanceEvent::Rejected { id: *id, reason });
        Ok(())
    }

    fn routing_friction(
        &self,
        record: &GovernanceProposal,
    ) -> Result<FrictionParams, GovernanceError> {
        record
            .routing
            .as_ref()
            .map(|r| r.friction.clone())
            .ok_or(GovernanceError::ReviewIncomplete)
    }

    fn set_phase(&mut self, id: &ProposalId, phase: GovernancePhase) {
        if let Some(record) = self.proposals.get_mut(id) {
            tracing::debug!(proposal = %id, from = %record.phase, to = %phase, "phase transition");
            record.phase = phase;
        }
    }

    fn proposal_mut(
        &mut self,
        id: &ProposalId,
    ) -> Result<&mut GovernanceProposal, GovernanceError> {
        self.proposals
            .get_mut(id)
            .ok_or_else(|| GovernanceError::ProposalNotFound(id.to_string()))
    }

    fn publish_memo(
        &self,
        substrate: &dyn LedgerSubstrate,
        destination: &AccountAddress,
        memo: &MemoPayload,
    ) {
        match memo.to_bytes() {
            Ok(bytes) => {
                if let Err(e) = substrate.submit_memo(destination, memo.memo_type(), &bytes) {
                    tracing::warn!(error = %e, "memo submission failed, continuing with local state");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "memo serialization failed, continuing with local state");
            }
        }
    }

    fn emit(&mut self, event: GovernanceEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
        self.pending_events.push(event);
    }
}

impl Default for GovernanceOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
