//! The consensus engine — owns every proposal's commit–reveal round.

use crate::aggregate::{aggregate_reveals, AggregatedVerdict};
use crate::error::ConsensusError;
use crate::round::{Commitment, ConsensusRound, ProtocolPhase, Reveal};
use concord_types::{
    AccountAddress, LedgerIndex, OracleVerdict, ProposalId, ProtocolParams,
};
use std::collections::HashMap;

/// Compute the commitment hash for a verdict and nonce:
/// `sha256(canonical_json(verdict) ++ nonce)`.
///
/// Oracles call this to build their commitment; the engine calls it to
/// validate reveals.
pub fn commitment_digest(
    verdict: &OracleVerdict,
    nonce: &[u8; 32],
) -> Result<[u8; 32], ConsensusError> {
    let canonical = concord_verification::canonical_json_bytes(verdict)
        .map_err(|e| ConsensusError::Serialization(e.to_string()))?;
    Ok(concord_crypto::sha256_multi(&[&canonical, nonce]))
}

/// Owns the per-proposal protocol state and drives phase transitions.
///
/// Commits and reveals are processed in submission order; deadline-driven
/// transitions happen on `tick`, which is idempotent. Late messages are
/// rejected without mutating the round.
pub struct ConsensusEngine {
    rounds: HashMap<ProposalId, ConsensusRound>,
}

impl ConsensusEngine {
    pub fn new() -> Self {
        Self {
            rounds: HashMap::new(),
        }
    }

    /// Open a round for a proposal with the current active oracle set.
    pub fn open_round(
        &mut self,
        proposal_id: ProposalId,
        active_set: Vec<AccountAddress>,
        now: LedgerIndex,
        params: &ProtocolParams,
    ) -> Result<(), ConsensusError> {
        if self.rounds.contains_key(&proposal_id) {
            return Err(ConsensusError::RoundExists(proposal_id.to_string()));
        }
        let round = ConsensusRound::open(proposal_id, active_set, now, params.oracle_window);
        tracing::debug!(
            proposal = %proposal_id,
            commit_deadline = %round.commit_deadline,
            reveal_deadline = %round.reveal_deadline,
            "opened commit-reveal round"
        );
        self.rounds.insert(proposal_id, round);
        Ok(())
    }

    /// Record a commitment. One per oracle per proposal; late or duplicate
    /// commits are rejected.
    pub fn submit_commit(
        &mut self,
        proposal_id: &ProposalId,
        oracle: AccountAddress,
        commitment_hash: [u8; 32],
        now: LedgerIndex,
    ) -> Result<(), ConsensusError> {
        let round = self.round_mut(proposal_id)?;
        match round.phase {
            ProtocolPhase::Commit => {}
            ProtocolPhase::Reveal => return Err(ConsensusError::CommitWindowClosed),
            _ => return Err(ConsensusError::OutOfPhase("tallying/complete")),
        }
        if now > round.commit_deadline {
            return Err(ConsensusError::CommitWindowClosed);
        }
        if !round.active_set.contains(&oracle) {
            return Err(ConsensusError::NotInActiveSet(oracle.to_string()));
        }
        if round.has_committed(&oracle) {
            return Err(ConsensusError::AlreadyCommitted(oracle.to_string()));
        }

        round.commitments.push(Commitment {
            oracle,
            commitment_hash,
            ledger_index: now,
        });

        // All active oracles in — no reason to wait out the window.
        if round.commitments.len() == round.active_set.len() {
            round.phase = ProtocolPhase::Reveal;
            tracing::debug!(proposal = %proposal_id, "all oracles committed, reveal phase open");
        }
        Ok(())
    }

    /// Record a reveal. Accepted only with a matching commitment whose hash
    /// equals `sha256(canonical_json(verdict) ++ nonce)`, inside the reveal
    /// window. A mismatch leaves the round unchanged and the oracle counted
    /// as non-revealing.
    pub fn submit_reveal(
        &mut self,
        proposal_id: &ProposalId,
        oracle: AccountAddress,
        verdict: OracleVerdict,
        nonce: [u8; 32],
        now: LedgerIndex,
        params: &ProtocolParams,
    ) -> Result<(), ConsensusError> {
        let digest = commitment_digest(&verdict, &nonce)?;
        let round = self.round_mut(proposal_id)?;
        match round.phase {
            ProtocolPhase::Reveal => {}
            ProtocolPhase::Commit => return Err(ConsensusError::OutOfPhase("commit")),
            _ => return Err(ConsensusError::OutOfPhase("tallying/complete")),
        }
        if now > round.reveal_deadline {
            return Err(ConsensusError::RevealWindowClosed);
        }
        if round.has_revealed(&oracle) {
            return Err(ConsensusError::AlreadyRevealed(oracle.to_string()));
        }
        let commitment = round
            .commitment_for(&oracle)
            .ok_or_else(|| ConsensusError::NoMatchingCommitment(oracle.to_string()))?;
        if commitment.commitment_hash != digest {
            tracing::warn!(
                proposal = %proposal_id,
                oracle = %oracle,
                "reveal does not match commitment, dropping"
            );
            return Err(ConsensusError::RevealMismatch);
        }

        round.reveals.push(Reveal {
            oracle,
            verdict,
            nonce,
            ledger_index: now,
        });

        // Every committer has revealed — tally immediately.
        if round.reveals.len() == round.commitments.len() {
            Self::finalize(round, params);
        }
        Ok(())
    }

    /// Drive deadline-based phase transitions for every open round.
    ///
    /// Idempotent; returns the proposals whose rounds completed this tick.
    pub fn tick(&mut self, now: LedgerIndex, params: &ProtocolParams) -> Vec<ProposalId> {
        let mut completed = Vec::new();
        for round in self.rounds.values_mut() {
            if round.phase == ProtocolPhase::Commit && now >= round.commit_deadline {
                round.phase = ProtocolPhase::Reveal;
                tracing::debug!(proposal = %round.proposal_id, "commit window expired");
            }
            if round.phase == ProtocolPhase::Reveal && now >= round.reveal_deadline {
                Self::finalize(round, params);
                completed.push(round.proposal_id);
            }
        }
        completed
    }

    fn finalize(round: &mut ConsensusRound, params: &ProtocolParams) {
        round.phase = ProtocolPhase::Tallying;
        let aggregated = aggregate_reveals(
            &round.reveals,
            round.non_revealers(),
            round.active_set.len(),
            params,
        );
        tracing::debug!(
            proposal = %round.proposal_id,
            participation = aggregated.participation,
            quorum_reached = aggregated.quorum_reached,
            "round aggregated"
        );
        round.aggregated = Some(aggregated);
        round.phase = ProtocolPhase::Complete;
    }

    /// The protocol state of a proposal's round.
    pub fn round(&self, proposal_id: &ProposalId) -> Option<&ConsensusRound> {
        self.rounds.get(proposal_id)
    }

    /// The aggregated verdict, once the round is complete.
    pub fn aggregated(&self, proposal_id: &ProposalId) -> Option<&AggregatedVerdict> {
        self.rounds
            .get(proposal_id)
            .and_then(|r| r.aggregated.as_ref())
    }

    fn round_mut(&mut self, proposal_id: &ProposalId) -> Result<&mut ConsensusRound, ConsensusError> {
        self.rounds
            .get_mut(proposal_id)
            .ok_or_else(|| ConsensusError::RoundNotFound(proposal_id.to_string()))
    }
}

impl Default for ConsensusEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_types::{ChannelAVerdict, ChannelBVerdict, DecidabilityClass};

    fn addr(i: usize) -> AccountAddress {
        AccountAddress::new(format!("rOracle{i}"))
    }

    fn active_set(n: usize) -> Vec<AccountAddress> {
        (0..n).map(addr).collect()
    }

    fn verdict(pass: bool, score: f64) -> OracleVerdict {
        OracleVerdict {
            channel_a: if pass {
                ChannelAVerdict::pass(80)
            } else {
                ChannelAVerdict::fail(80, true, false)
            },
            channel_b: ChannelBVerdict::new(score, DecidabilityClass::II),
        }
    }

    fn nonce(i: u8) -> [u8; 32] {
        [i; 32]
    }

    fn open_small_round(engine: &mut ConsensusEngine, n: usize) -> ProposalId {
        let pid = ProposalId::new([7u8; 32]);
        engine
            .open_round(pid, active_set(n), LedgerIndex::new(100), &ProtocolParams::default())
            .unwrap();
        pid
    }

    #[test]
    fn full_round_reaches_consensus() {
        let params = ProtocolParams::default();
        let mut engine = ConsensusEngine::new();
        let pid = open_small_round(&mut engine, 3);

        for i in 0..3 {
            let digest = commitment_digest(&verdict(true, 0.9), &nonce(i as u8)).unwrap();
            engine
                .submit_commit(&pid, addr(i), digest, LedgerIndex::new(101 + i as u64))
                .unwrap();
        }
        // All committed — reveal phase opened early.
        assert_eq!(engine.round(&pid).unwrap().phase, ProtocolPhase::Reveal);

        for i in 0..3 {
            engine
                .submit_reveal(
                    &pid,
                    addr(i),
                    verdict(true, 0.9),
                    nonce(i as u8),
                    LedgerIndex::new(110 + i as u64),
                    &params,
                )
                .unwrap();
        }
        let round = engine.round(&pid).unwrap();
        assert_eq!(round.phase, ProtocolPhase::Complete);
        let agg = engine.aggregated(&pid).unwrap();
        assert!(agg.quorum_reached);
        assert!(agg.channel_a.as_ref().unwrap().pass);
        assert!(agg.non_revealers.is_empty());
    }

    #[test]
    fn mismatched_reveal_is_dropped_and_oracle_marked() {
        let params = ProtocolParams::default();
        let mut engine = ConsensusEngine::new();
        let pid = open_small_round(&mut engine, 2);

        for i in 0..2 {
            let digest = commitment_digest(&verdict(true, 0.9), &nonce(i as u8)).unwrap();
            engine
                .submit_commit(&pid, addr(i), digest, LedgerIndex::new(101))
                .unwrap();
        }

        // Oracle 1 reveals a different verdict than it committed to.
        let err = engine
            .submit_reveal(
                &pid,
                addr(1),
                verdict(false, 0.1),
                nonce(1),
                LedgerIndex::new(150),
                &params,
            )
            .unwrap_err();
        assert!(matches!(err, ConsensusError::RevealMismatch));

        engine
            .submit_reveal(&pid, addr(0), verdict(true, 0.9), nonce(0), LedgerIndex::new(151), &params)
            .unwrap();

        // Deadline passes; oracle 1 is a non-revealer.
        let completed = engine.tick(LedgerIndex::new(2_200), &params);
        assert_eq!(completed, vec![pid]);
        let agg = engine.aggregated(&pid).unwrap();
        assert_eq!(agg.participation, 1);
        assert_eq!(agg.non_revealers, vec![addr(1)]);
    }

    #[test]
    fn late_and_duplicate_commits_rejected() {
        let mut engine = ConsensusEngine::new();
        let pid = open_small_round(&mut engine, 3);
        let digest = commitment_digest(&verdict(true, 0.9), &nonce(0)).unwrap();

        engine
            .submit_commit(&pid, addr(0), digest, LedgerIndex::new(500))
            .unwrap();
        assert!(matches!(
            engine.submit_commit(&pid, addr(0), digest, LedgerIndex::new(501)),
            Err(ConsensusError::AlreadyCommitted(_))
        ));
        // Past the commit deadline (100 + 1000).
        assert!(matches!(
            engine.submit_commit(&pid, addr(1), digest, LedgerIndex::new(1_200)),
            Err(ConsensusError::CommitWindowClosed)
        ));
    }

    #[test]
    fn commit_from_outside_active_set_rejected() {
        let mut engine = ConsensusEngine::new();
        let pid = open_small_round(&mut engine, 2);
        let digest = commitment_digest(&verdict(true, 0.9), &nonce(0)).unwrap();
        assert!(matches!(
            engine.submit_commit(&pid, addr(9), digest, LedgerIndex::new(101)),
            Err(ConsensusError::NotInActiveSet(_))
        ));
    }

    #[test]
    fn reveal_without_commit_rejected() {
        let params = ProtocolParams::default();
        let mut engine = ConsensusEngine::new();
        let pid = open_small_round(&mut engine, 2);
        let digest = commitment_digest(&verdict(true, 0.9), &nonce(0)).unwrap();
        engine
            .submit_commit(&pid, addr(0), digest, LedgerIndex::new(101))
            .unwrap();
        // Commit window expires; reveal phase opens.
        engine.tick(LedgerIndex::new(1_100), &params);
        assert!(matches!(
            engine.submit_reveal(
                &pid,
                addr(1),
                verdict(true, 0.9),
                nonce(1),
                LedgerIndex::new(1_101),
                &params
            ),
            Err(ConsensusError::NoMatchingCommitment(_))
        ));
    }

    #[test]
    fn reveal_during_commit_phase_rejected() {
        let params = ProtocolParams::default();
        let mut engine = ConsensusEngine::new();
        let pid = open_small_round(&mut engine, 2);
        let digest = commitment_digest(&verdict(true, 0.9), &nonce(0)).unwrap();
        engine
            .submit_commit(&pid, addr(0), digest, LedgerIndex::new(101))
            .unwrap();
        assert!(matches!(
            engine.submit_reveal(
                &pid,
                addr(0),
                verdict(true, 0.9),
                nonce(0),
                LedgerIndex::new(102),
                &params
            ),
            Err(ConsensusError::OutOfPhase(_))
        ));
    }

    #[test]
    fn tick_is_idempotent() {
        let params = ProtocolParams::default();
        let mut engine = ConsensusEngine::new();
        let pid = open_small_round(&mut engine, 2);
        let completed = engine.tick(LedgerIndex::new(5_000), &params);
        assert_eq!(completed, vec![pid]);
        // A second tick reports nothing new and changes nothing.
        assert!(engine.tick(LedgerIndex::new(5_001), &params).is_empty());
        assert_eq!(engine.round(&pid).unwrap().phase, ProtocolPhase::Complete);
    }

    #[test]
    fn duplicate_round_rejected() {
        let mut engine = ConsensusEngine::new();
        let pid = open_small_round(&mut engine, 2);
        assert!(matches!(
            engine.open_round(pid, active_set(2), LedgerIndex::new(100), &ProtocolParams::default()),
            Err(ConsensusError::RoundExists(_))
        ));
    }
}
