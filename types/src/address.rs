//! Opaque account address type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account identifier on the underlying ledger substrate.
///
/// The core treats addresses as opaque strings: it never derives, decodes,
/// or validates them beyond non-emptiness. Key management and address
/// encoding belong to the wallet layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Create a new address from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this address is well-formed (non-empty).
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
