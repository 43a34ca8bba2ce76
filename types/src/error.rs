//! Errors raised by the shared type layer.

use thiserror::Error;

/// Errors from parsing the fundamental types.
#[derive(Debug, Error)]
pub enum ConcordError {
    #[error("invalid governance layer: {0}")]
    InvalidLayer(String),

    #[error("invalid hex identifier: {0}")]
    InvalidHex(String),
}
