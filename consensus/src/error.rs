use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("a consensus round for proposal {0} already exists")]
    RoundExists(String),

    #[error("no consensus round for proposal {0}")]
    RoundNotFound(String),

    #[error("operation not valid in the {0} phase")]
    OutOfPhase(&'static str),

    #[error("commit window has closed")]
    CommitWindowClosed,

    #[error("reveal window has closed")]
    RevealWindowClosed,

    #[error("oracle {0} is not in the active set for this round")]
    NotInActiveSet(String),

    #[error("oracle {0} has already committed")]
    AlreadyCommitted(String),

    #[error("oracle {0} has already revealed")]
    AlreadyRevealed(String),

    #[error("oracle {0} has no matching commitment")]
    NoMatchingCommitment(String),

    #[error("reveal does not match the commitment hash")]
    RevealMismatch,

    #[error("verdict serialization failed: {0}")]
    Serialization(String),
}
