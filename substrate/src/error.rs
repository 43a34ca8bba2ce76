use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubstrateError {
    #[error("memo submission failed: {0}")]
    SubmissionFailed(String),

    #[error("escrow operation failed: {0}")]
    Escrow(String),

    #[error("no ledger hash available for index {0}")]
    UnknownLedger(u64),

    #[error("semantic assessor unavailable: {0}")]
    AssessorUnavailable(String),

    #[error("memo serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
