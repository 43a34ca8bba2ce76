use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("proposal {0} not found")]
    ProposalNotFound(String),

    #[error("a proposal with this canonical payload already exists: {0}")]
    DuplicateProposal(String),

    #[error("proposal logic AST is malformed: {0}")]
    MalformedProposal(String),

    #[error("proposal is in the {0} phase; this transition is not valid")]
    WrongPhase(&'static str),

    #[error("oracle review has not completed for this proposal")]
    ReviewIncomplete,

    #[error(transparent)]
    Consensus(#[from] concord_consensus::ConsensusError),

    #[error(transparent)]
    Voting(#[from] concord_voting::VotingError),

    #[error(transparent)]
    Jury(#[from] concord_jury::JuryError),

    #[error(transparent)]
    Substrate(#[from] concord_substrate::SubstrateError),
}
