use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    /// The proposal's logic AST is not valid JSON. Fatal to verification:
    /// the pipeline surfaces this as a failing verdict.
    #[error("malformed logic AST: {0}")]
    MalformedAst(#[from] serde_json::Error),

    #[error("witness is not valid hex: {0}")]
    WitnessNotHex(String),

    #[error("witness is not valid UTF-8")]
    WitnessNotUtf8,

    #[error("witness has no payload separator")]
    WitnessMissingSeparator,

    #[error("witness exceeds the maximum size: {size} > {max} bytes")]
    WitnessTooLarge { size: usize, max: usize },
}
