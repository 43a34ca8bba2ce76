//! Vote delegation — entrust voting power to another account.
//!
//! Delegation is additive, directional, and revocable; an account may
//! split delegations across several delegates at once. The delegated
//! amount only materializes in a tally when the delegate votes.

use crate::error::VotingError;
use concord_types::{AccountAddress, DropsAmount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Manages directional delegations of voting power.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DelegationEngine {
    /// delegator → (delegate → amount).
    delegations: HashMap<AccountAddress, HashMap<AccountAddress, DropsAmount>>,
}

impl DelegationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delegate `amount` from one account to another. Repeat delegations
    /// to the same delegate accumulate.
    pub fn delegate(
        &mut self,
        from: AccountAddress,
        to: AccountAddress,
        amount: DropsAmount,
    ) -> Result<(), VotingError> {
        if from == to {
            return Err(VotingError::SelfDelegation);
        }
        let entry = self
            .delegations
            .entry(from)
            .or_default()
            .entry(to)
            .or_insert(DropsAmount::ZERO);
        *entry = entry.checked_add(amount).ok_or(VotingError::Overflow)?;
        Ok(())
    }

    /// Revoke the delegation from one account to another entirely.
    pub fn undelegate(
        &mut self,
        from: &AccountAddress,
        to: &AccountAddress,
    ) -> Result<DropsAmount, VotingError> {
        let outgoing = self
            .delegations
            .get_mut(from)
            .ok_or_else(|| VotingError::NoSuchDelegation {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        let removed = outgoing
            .remove(to)
            .ok_or_else(|| VotingError::NoSuchDelegation {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        if outgoing.is_empty() {
            self.delegations.remove(from);
        }
        Ok(removed)
    }

    /// Total power currently delegated to an account.
    pub fn delegated_to(&self, delegate: &AccountAddress) -> Result<DropsAmount, VotingError> {
        let mut total = DropsAmount::ZERO;
        for outgoing in self.delegations.values() {
            if let Some(amount) = outgoing.get(delegate) {
                total = total.checked_add(*amount).ok_or(VotingError::Overflow)?;
            }
        }
        Ok(total)
    }

    /// The delegations an account has made, if any.
    pub fn outgoing(&self, from: &AccountAddress) -> Option<&HashMap<AccountAddress, DropsAmount>> {
        self.delegations.get(from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> AccountAddress {
        AccountAddress::new(s)
    }

    #[test]
    fn delegation_is_additive() {
        let mut engine = DelegationEngine::new();
        engine
            .delegate(addr("a"), addr("b"), DropsAmount::new(100))
            .unwrap();
        engine
            .delegate(addr("a"), addr("b"), DropsAmount::new(50))
            .unwrap();
        assert_eq!(engine.delegated_to(&addr("b")).unwrap(), DropsAmount::new(150));
    }

    #[test]
    fn delegation_splits_across_delegates() {
        let mut engine = DelegationEngine::new();
        engine
            .delegate(addr("a"), addr("b"), DropsAmount::new(100))
            .unwrap();
        engine
            .delegate(addr("a"), addr("c"), DropsAmount::new(200))
            .unwrap();
        assert_eq!(engine.delegated_to(&addr("b")).unwrap(), DropsAmount::new(100));
        assert_eq!(engine.delegated_to(&addr("c")).unwrap(), DropsAmount::new(200));
    }

    #[test]
    fn self_delegation_rejected() {
        let mut engine = DelegationEngine::new();
        assert!(matches!(
            engine.delegate(addr("a"), addr("a"), DropsAmount::new(1)),
            Err(VotingError::SelfDelegation)
        ));
    }

    #[test]
    fn undelegate_removes_the_edge() {
        let mut engine = DelegationEngine::new();
        engine
            .delegate(addr("a"), addr("b"), DropsAmount::new(100))
            .unwrap();
        let removed = engine.undelegate(&addr("a"), &addr("b")).unwrap();
        assert_eq!(removed, DropsAmount::new(100));
        assert_eq!(engine.delegated_to(&addr("b")).unwrap(), DropsAmount::ZERO);
        assert!(engine.undelegate(&addr("a"), &addr("b")).is_err());
    }
}
