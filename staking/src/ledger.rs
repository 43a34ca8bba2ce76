//! The staking ledger engine.

use crate::error::StakingError;
use crate::rewards::performance_multiplier_centi;
use crate::slash::{SlashEvent, SlashType};
use concord_registry::{OperatorStatus, OracleOperator};
use concord_types::{AccountAddress, DropsAmount, ProposalId, ProtocolParams, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of applying one slash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashOutcome {
    pub event_id: u64,
    pub amount: DropsAmount,
    /// Cumulative slashes crossed half the original bond — the operator
    /// must be ejected by the registry.
    pub auto_eject: bool,
}

/// Tracks deposits, slashes, treasury, and pending rewards.
///
/// Bond conservation invariant: for every operator,
/// `current_bond + slashed_to_treasury + released_via_unbond +
/// ejected_to_treasury = original_deposit`. All mutation goes through the
/// transactional methods here, which validate against overflow before
/// committing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StakingLedger {
    slash_history: Vec<SlashEvent>,
    next_slash_id: u64,
    /// Original deposit per operator; the conservation basis.
    deposits: HashMap<AccountAddress, DropsAmount>,
    /// Lifetime slashed amount per operator.
    cumulative_slashed: HashMap<AccountAddress, DropsAmount>,
    /// Slashed and ejected funds held by the protocol.
    treasury: DropsAmount,
    /// Bonds returned through completed unbonds.
    released: DropsAmount,
    /// Rewards accrued but not yet claimed.
    pending_rewards: HashMap<AccountAddress, DropsAmount>,
    /// Epoch of the last inactivity slash per operator (once per epoch).
    last_inactivity_epoch: HashMap<AccountAddress, u64>,
}

impl StakingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an operator's original deposit at registration time.
    pub fn record_deposit(&mut self, address: AccountAddress, amount: DropsAmount) {
        *self
            .deposits
            .entry(address)
            .or_insert(DropsAmount::ZERO) = amount;
    }

    /// Record a bond released through a completed unbond.
    pub fn record_unbond_release(&mut self, amount: DropsAmount) -> Result<(), StakingError> {
        self.released = self
            .released
            .checked_add(amount)
            .ok_or_else(|| StakingError::Overflow("released".into()))?;
        Ok(())
    }

    /// Record a remaining bond forfeited to treasury at ejection.
    pub fn record_ejection(&mut self, amount: DropsAmount) -> Result<(), StakingError> {
        self.treasury = self
            .treasury
            .checked_add(amount)
            .ok_or_else(|| StakingError::Overflow("treasury".into()))?;
        Ok(())
    }

    /// Slash an operator for a missed reveal: a fixed fraction of the
    /// current bond, once per missed reveal per proposal.
    pub fn slash_non_reveal(
        &mut self,
        operator: &mut OracleOperator,
        proposal_id: ProposalId,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<SlashOutcome, StakingError> {
        let amount = operator
            .bond
            .apply_bps(params.slash_non_reveal_bps)
            .ok_or_else(|| StakingError::Overflow(operator.address.to_string()))?;
        self.apply_slash(
            operator,
            SlashType::NonReveal,
            amount,
            Some(proposal_id),
            now,
            params,
        )
    }

    /// Slash an operator for sustained inactivity. Requires the missed
    /// reveal count to have reached the threshold; applies at most once
    /// per epoch.
    pub fn slash_inactivity(
        &mut self,
        operator: &mut OracleOperator,
        epoch: u64,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<SlashOutcome, StakingError> {
        let missed = operator.metrics.missed_reveals;
        if missed < params.inactivity_threshold as u64 {
            return Err(StakingError::InactivityThresholdNotMet {
                missed,
                need: params.inactivity_threshold as u64,
            });
        }
        if self.last_inactivity_epoch.get(&operator.address) == Some(&epoch) {
            return Err(StakingError::InactivityCooldown(epoch));
        }
        let amount = operator
            .bond
            .apply_bps(params.slash_inactivity_bps)
            .ok_or_else(|| StakingError::Overflow(operator.address.to_string()))?;
        let outcome = self.apply_slash(
            operator,
            SlashType::Inactivity,
            amount,
            None,
            now,
            params,
        )?;
        self.last_inactivity_epoch
            .insert(operator.address.clone(), epoch);
        Ok(outcome)
    }

    /// Slash an operator's entire bond for proven fraud. Always requires
    /// ejection; the registry performs the status change and escrow cancel.
    pub fn slash_fraud(
        &mut self,
        operator: &mut OracleOperator,
        proposal_id: ProposalId,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<SlashOutcome, StakingError> {
        let amount = operator.bond;
        let mut outcome = self.apply_slash(
            operator,
            SlashType::Fraud,
            amount,
            Some(proposal_id),
            now,
            params,
        )?;
        outcome.auto_eject = true;
        Ok(outcome)
    }

    fn apply_slash(
        &mut self,
        operator: &mut OracleOperator,
        slash_type: SlashType,
        amount: DropsAmount,
        proposal_id: Option<ProposalId>,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<SlashOutcome, StakingError> {
        if operator.status == OperatorStatus::Ejected {
            return Err(StakingError::OperatorEjected(operator.address.to_string()));
        }
        let original = *self
            .deposits
            .get(&operator.address)
            .ok_or_else(|| StakingError::UnknownDeposit(operator.address.to_string()))?;

        // Validate every mutation before committing any of them.
        let new_bond = operator
            .bond
            .checked_sub(amount)
            .ok_or_else(|| StakingError::Overflow(operator.address.to_string()))?;
        let new_treasury = self
            .treasury
            .checked_add(amount)
            .ok_or_else(|| StakingError::Overflow("treasury".into()))?;
        let cumulative = self
            .cumulative_slashed
            .get(&operator.address)
            .copied()
            .unwrap_or(DropsAmount::ZERO)
            .checked_add(amount)
            .ok_or_else(|| StakingError::Overflow(operator.address.to_string()))?;

        operator.bond = new_bond;
        self.treasury = new_treasury;
        self.cumulative_slashed
            .insert(operator.address.clone(), cumulative);

        let id = self.next_slash_id;
        self.next_slash_id += 1;
        self.slash_history.push(SlashEvent {
            id,
            oracle: operator.address.clone(),
            slash_type,
            amount,
            proposal_id,
            timestamp: now,
            executed: true,
        });

        let threshold = original
            .apply_bps(params.auto_eject_threshold_bps)
            .ok_or_else(|| StakingError::Overflow(operator.address.to_string()))?;
        let auto_eject = cumulative > threshold;

        tracing::debug!(
            operator = %operator.address,
            ?slash_type,
            amount = %amount,
            remaining = %operator.bond,
            auto_eject,
            "slash applied"
        );
        Ok(SlashOutcome {
            event_id: id,
            amount,
            auto_eject,
        })
    }

    /// Distribute an epoch's reward pool across the active operators.
    ///
    /// Each operator's base share is proportional to its bond; the share
    /// is scaled by the performance multiplier and floored. Rewards accrue
    /// as pending; claiming is a separate explicit operation.
    pub fn distribute_epoch_rewards<'a>(
        &mut self,
        pool: DropsAmount,
        operators: impl Iterator<Item = &'a OracleOperator>,
        proposals_in_epoch: u64,
    ) -> Result<Vec<(AccountAddress, DropsAmount)>, StakingError> {
        let active: Vec<&OracleOperator> = operators
            .filter(|op| op.status == OperatorStatus::Active)
            .collect();
        let total_bond = active.iter().try_fold(DropsAmount::ZERO, |acc, op| {
            acc.checked_add(op.bond)
                .ok_or_else(|| StakingError::Overflow("total bond".into()))
        })?;
        if total_bond.is_zero() || pool.is_zero() {
            return Ok(Vec::new());
        }

        let mut payouts = Vec::with_capacity(active.len());
        for op in active {
            let base = op
                .bond
                .drops()
                .checked_mul(pool.drops())
                .ok_or_else(|| StakingError::Overflow(op.address.to_string()))?
                / total_bond.drops();
            let centi = performance_multiplier_centi(&op.metrics, proposals_in_epoch);
            let reward = DropsAmount::new(
                base.checked_mul(centi as u128)
                    .ok_or_else(|| StakingError::Overflow(op.address.to_string()))?
                    / 100,
            );

            let pending = self
                .pending_rewards
                .entry(op.address.clone())
                .or_insert(DropsAmount::ZERO);
            *pending = pending
                .checked_add(reward)
                .ok_or_else(|| StakingError::Overflow(op.address.to_string()))?;
            payouts.push((op.address.clone(), reward));
        }
        Ok(payouts)
    }

    /// Claim all pending rewards for an operator.
    pub fn claim_rewards(&mut self, address: &AccountAddress) -> Result<DropsAmount, StakingError> {
        match self.pending_rewards.remove(address) {
            Some(amount) if !amount.is_zero() => Ok(amount),
            _ => Err(StakingError::NothingToClaim(address.to_string())),
        }
    }

    pub fn pending_rewards(&self, address: &AccountAddress) -> DropsAmount {
        self.pending_rewards
            .get(address)
            .copied()
            .unwrap_or(DropsAmount::ZERO)
    }

    /// The append-only slash history.
    pub fn slash_history(&self) -> &[SlashEvent] {
        &self.slash_history
    }

    pub fn slashes_for(&self, address: &AccountAddress) -> Vec<&SlashEvent> {
        self.slash_history
            .iter()
            .filter(|e| &e.oracle == address)
            .collect()
    }

    pub fn treasury(&self) -> DropsAmount {
        self.treasury
    }

    pub fn released(&self) -> DropsAmount {
        self.released
    }

    /// Sum of original deposits — the conservation basis.
    pub fn total_deposits(&self) -> Option<DropsAmount> {
        self.deposits
            .values()
            .try_fold(DropsAmount::ZERO, |acc, d| acc.checked_add(*d))
    }

    /// Bond conservation: current bonds + treasury + released must equal
    /// the original deposits.
    pub fn verify_conservation<'a>(
        &self,
        operators: impl Iterator<Item = &'a OracleOperator>,
    ) -> bool {
        let mut total = self.treasury.checked_add(self.released);
        for op in operators {
            total = total.and_then(|t| t.checked_add(op.bond));
        }
        match (total, self.total_deposits()) {
            (Some(total), Some(deposits)) => total == deposits,
            _ => false,
        }
    }
}
