//! The oracle registry engine.

use crate::epoch::Epoch;
use crate::error::RegistryError;
use crate::operator::{OperatorMetrics, OperatorStatus, OracleOperator};
use concord_substrate::LedgerSubstrate;
use concord_types::{AccountAddress, DropsAmount, LedgerIndex, ProtocolParams, Timestamp};
use std::collections::HashMap;

/// Owns every operator record and the epoch schedule.
pub struct OracleRegistry {
    operators: HashMap<AccountAddress, OracleOperator>,
    current_epoch: Epoch,
}

impl OracleRegistry {
    /// Create a registry whose first epoch starts at `genesis`.
    pub fn new(genesis: LedgerIndex, params: &ProtocolParams) -> Self {
        Self {
            operators: HashMap::new(),
            current_epoch: Epoch {
                number: 0,
                start_ledger: genesis,
                end_ledger: genesis.plus(params.oracle_epoch),
                active_set: Vec::new(),
            },
        }
    }

    /// Register a new operator, escrowing its bond on the substrate.
    ///
    /// The bond must meet the protocol minimum. Ejected addresses are
    /// permanently burned and cannot re-register.
    pub fn register(
        &mut self,
        address: AccountAddress,
        bond: DropsAmount,
        registered_at: LedgerIndex,
        now: Timestamp,
        substrate: &dyn LedgerSubstrate,
        params: &ProtocolParams,
    ) -> Result<u64, RegistryError> {
        if let Some(existing) = self.operators.get(&address) {
            return Err(if existing.status == OperatorStatus::Ejected {
                RegistryError::AddressEjected(address.to_string())
            } else {
                RegistryError::AlreadyRegistered(address.to_string())
            });
        }
        if bond < params.oracle_bond {
            return Err(RegistryError::BondBelowMinimum {
                have: bond.drops(),
                need: params.oracle_bond.drops(),
            });
        }

        let escrow_seq =
            substrate.create_escrow(&address, bond, now.plus_secs(params.unbond_period_secs))?;

        tracing::debug!(operator = %address, bond = %bond, escrow_seq, "oracle registered");
        self.operators.insert(
            address.clone(),
            OracleOperator {
                address,
                bond,
                escrow_seq,
                registered_at,
                status: OperatorStatus::Candidate,
                metrics: OperatorMetrics::default(),
                unbonding_at: None,
            },
        );
        Ok(escrow_seq)
    }

    /// Begin withdrawing an operator's bond. Removes it from the active set.
    pub fn initiate_unbond(
        &mut self,
        address: &AccountAddress,
        now: LedgerIndex,
    ) -> Result<(), RegistryError> {
        let operator = self.operator_mut(address)?;
        if !operator.is_selectable() {
            return Err(RegistryError::WrongStatus(address.to_string()));
        }
        operator.status = OperatorStatus::Unbonding;
        operator.unbonding_at = Some(now);
        self.current_epoch.active_set.retain(|a| a != address);
        tracing::debug!(operator = %address, "unbonding initiated");
        Ok(())
    }

    /// Release an unbonding operator's escrow after a full epoch has
    /// elapsed, removing the record. Returns the released bond.
    pub fn complete_unbond(
        &mut self,
        address: &AccountAddress,
        now: LedgerIndex,
        substrate: &dyn LedgerSubstrate,
        params: &ProtocolParams,
    ) -> Result<DropsAmount, RegistryError> {
        let operator = self.operator(address)?;
        if operator.status != OperatorStatus::Unbonding {
            return Err(RegistryError::WrongStatus(address.to_string()));
        }
        let since = match operator.unbonding_at {
            Some(at) => now.since(at),
            None => 0,
        };
        if since < params.oracle_epoch {
            return Err(RegistryError::UnbondingNotElapsed {
                remaining: params.oracle_epoch - since,
            });
        }

        substrate.finish_escrow(address, operator.escrow_seq)?;
        let released = operator.bond;
        self.operators.remove(address);
        tracing::debug!(operator = %address, released = %released, "unbond complete");
        Ok(released)
    }

    /// Record an oracle's participation in one proposal's round.
    pub fn record_participation(
        &mut self,
        address: &AccountAddress,
        revealed: bool,
    ) -> Result<(), RegistryError> {
        let epoch = self.current_epoch.number;
        let operator = self.operator_mut(address)?;
        operator.metrics.total_participations += 1;
        if revealed {
            operator.metrics.successful_reveals += 1;
        } else {
            operator.metrics.missed_reveals += 1;
        }
        operator.metrics.last_active_epoch = epoch;
        Ok(())
    }

    /// Record a proven fraud against an oracle.
    pub fn record_fraud(&mut self, address: &AccountAddress) -> Result<(), RegistryError> {
        self.operator_mut(address)?.metrics.fraud_proofs += 1;
        Ok(())
    }

    /// Permanently eject an operator, cancelling its escrow to treasury.
    ///
    /// Irreversible; the address can never re-register. The forfeited bond
    /// amount is returned for the slashing ledger's accounting.
    pub fn eject_for_fraud(
        &mut self,
        address: &AccountAddress,
        substrate: &dyn LedgerSubstrate,
    ) -> Result<DropsAmount, RegistryError> {
        let operator = self.operator_mut(address)?;
        if operator.status == OperatorStatus::Ejected {
            return Err(RegistryError::WrongStatus(address.to_string()));
        }
        let forfeited = operator.bond;
        let escrow_seq = operator.escrow_seq;
        operator.bond = DropsAmount::ZERO;
        operator.status = OperatorStatus::Ejected;
        operator.unbonding_at = None;
        self.current_epoch.active_set.retain(|a| a != address);

        substrate.cancel_escrow(address, escrow_seq)?;
        tracing::warn!(operator = %address, forfeited = %forfeited, "oracle ejected for fraud");
        Ok(forfeited)
    }

    /// Rotate to a new epoch: select the active set and reset per-epoch
    /// reveal counters.
    ///
    /// Selection: all Candidate/Active operators sorted by bond descending
    /// (ties by registration order), truncated to the protocol set size.
    pub fn start_new_epoch(&mut self, now: LedgerIndex, params: &ProtocolParams) -> &Epoch {
        let mut ranked: Vec<(&AccountAddress, DropsAmount, LedgerIndex)> = self
            .operators
            .values()
            .filter(|op| op.is_selectable())
            .map(|op| (&op.address, op.bond, op.registered_at))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(params.active_oracle_set_size);

        let active_set: Vec<AccountAddress> =
            ranked.into_iter().map(|(addr, _, _)| addr.clone()).collect();

        for operator in self.operators.values_mut() {
            if operator.is_selectable() {
                operator.status = if active_set.contains(&operator.address) {
                    OperatorStatus::Active
                } else {
                    OperatorStatus::Candidate
                };
            }
            operator.metrics.total_participations = 0;
            operator.metrics.successful_reveals = 0;
            operator.metrics.missed_reveals = 0;
        }

        self.current_epoch = Epoch {
            number: self.current_epoch.number + 1,
            start_ledger: now,
            end_ledger: now.plus(params.oracle_epoch),
            active_set,
        };
        tracing::debug!(
            epoch = self.current_epoch.number,
            active = self.current_epoch.active_set.len(),
            "epoch rotated"
        );
        &self.current_epoch
    }

    pub fn current_epoch(&self) -> &Epoch {
        &self.current_epoch
    }

    pub fn active_set(&self) -> &[AccountAddress] {
        &self.current_epoch.active_set
    }

    pub fn is_active(&self, address: &AccountAddress) -> bool {
        self.current_epoch.active_set.contains(address)
    }

    pub fn operator(&self, address: &AccountAddress) -> Result<&OracleOperator, RegistryError> {
        self.operators
            .get(address)
            .ok_or_else(|| RegistryError::OperatorNotFound(address.to_string()))
    }

    /// Mutable access for the slashing ledger — the only other writer of
    /// operator records.
    pub fn operator_mut(
        &mut self,
        address: &AccountAddress,
    ) -> Result<&mut OracleOperator, RegistryError> {
        self.operators
            .get_mut(address)
            .ok_or_else(|| RegistryError::OperatorNotFound(address.to_string()))
    }

    /// All operator records, in unspecified order.
    pub fn operators(&self) -> impl Iterator<Item = &OracleOperator> {
        self.operators.values()
    }
}
