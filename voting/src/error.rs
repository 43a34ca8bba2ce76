use thiserror::Error;

#[derive(Debug, Error)]
pub enum VotingError {
    #[error("a voting period for proposal {0} already exists")]
    PeriodExists(String),

    #[error("no voting period for proposal {0}")]
    PeriodNotFound(String),

    #[error("account {0} has already voted on this proposal")]
    AlreadyVoted(String),

    #[error("the voting period is closed")]
    VotingClosed,

    #[error("cannot delegate to self")]
    SelfDelegation,

    #[error("no delegation from {from} to {to}")]
    NoSuchDelegation { from: String, to: String },

    #[error("voting power arithmetic overflow")]
    Overflow,
}
