use thiserror::Error;

#[derive(Debug, Error)]
pub enum StakingError {
    /// Arithmetic overflow in bond accounting. A bug, not a user error:
    /// the caller should halt and surface a diagnostic.
    #[error("bond arithmetic overflow for operator {0}")]
    Overflow(String),

    #[error("operator {0} is ejected; no further slashes apply")]
    OperatorEjected(String),

    #[error("operator {0} has no recorded deposit")]
    UnknownDeposit(String),

    #[error("inactivity threshold not met: {missed} missed reveals, need {need}")]
    InactivityThresholdNotMet { missed: u64, need: u64 },

    #[error("inactivity already slashed in epoch {0}")]
    InactivityCooldown(u64),

    #[error("operator {0} has no pending rewards")]
    NothingToClaim(String),
}
