use concord_substrate::SubstrateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("operator {0} is already registered")]
    AlreadyRegistered(String),

    #[error("address {0} was ejected and cannot re-register")]
    AddressEjected(String),

    #[error("bond below minimum: have {have} drops, need {need} drops")]
    BondBelowMinimum { have: u128, need: u128 },

    #[error("operator {0} not found")]
    OperatorNotFound(String),

    #[error("operator {0} is not in a valid status for this operation")]
    WrongStatus(String),

    #[error("unbonding period not elapsed: {remaining} ledger intervals remain")]
    UnbondingNotElapsed { remaining: u64 },

    #[error(transparent)]
    Substrate(#[from] SubstrateError),
}
