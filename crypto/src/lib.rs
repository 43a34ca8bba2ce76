//! Cryptographic primitives for the CONCORD protocol.
//!
//! SHA-256 is the single hash used everywhere determinism matters:
//! proposal identifiers, reveal commitments, jury selection scores,
//! and state-anchor roots. Signatures and key management live outside
//! the core, in the wallet layer.

pub mod hash;

pub use hash::{sha256, sha256_hex, sha256_multi};
