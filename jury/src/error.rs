use thiserror::Error;

#[derive(Debug, Error)]
pub enum JuryError {
    #[error("not enough eligible accounts: have {have}, need {need}")]
    InsufficientEligible { have: usize, need: usize },

    #[error("a jury panel for proposal {0} already exists")]
    PanelExists(String),

    #[error("no jury panel for proposal {0}")]
    PanelNotFound(String),

    #[error("account {0} is not a member of this panel")]
    NotAJuror(String),

    #[error("juror {0} has already voted")]
    AlreadyVoted(String),

    #[error("the jury voting period has closed")]
    VotingClosed,
}
