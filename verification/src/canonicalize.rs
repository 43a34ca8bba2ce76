//! Canonical proposal representation.
//!
//! Two separate canonical forms are derived from the same payload and
//! then joined:
//!
//! 1. AST serialization: parse the logic AST as JSON, serialize with keys
//!    recursively sorted by code-point order.
//! 2. Text normalization: lowercase, strip non-word characters, collapse
//!    whitespace runs, trim.
//! 3. Canonical payload: `ast_json ++ "." ++ normalized_text`.
//! 4. Canonical hash: `sha256(payload)` — this is the proposal identifier.
//!
//! Inputs that differ only by key order, casing, whitespace runs, or
//! trailing punctuation produce identical bytes and identical hashes.

use crate::error::VerificationError;
use concord_types::{Proposal, ProposalId};
use serde::Serialize;
use serde_json::Value;

/// The canonical representation of a proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalPayload {
    /// The canonical payload bytes (sorted AST + `.` + normalized text).
    pub bytes: Vec<u8>,
    /// SHA-256 of the payload; serves as the proposal id.
    pub hash: [u8; 32],
}

impl CanonicalPayload {
    /// The hash as a typed proposal identifier.
    pub fn proposal_id(&self) -> ProposalId {
        ProposalId::new(self.hash)
    }

    /// The hash as lowercase hex (the wire form).
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// Canonicalize a proposal into its deterministic representation.
///
/// Fails with [`VerificationError::MalformedAst`] when the logic AST does
/// not parse as JSON; the verification pipeline surfaces that as a failing
/// verdict rather than an error.
pub fn canonicalize(proposal: &Proposal) -> Result<CanonicalPayload, VerificationError> {
    let ast: Value = serde_json::from_str(&proposal.logic_ast)?;
    let sorted = sort_json_keys(&ast);
    let mut payload = serde_json::to_vec(&sorted)?;

    payload.push(b'.');
    payload.extend(normalize_text(&proposal.text).as_bytes());

    let hash = concord_crypto::sha256(&payload);
    Ok(CanonicalPayload { bytes: payload, hash })
}

/// Serialize any value as canonical JSON bytes (recursively sorted keys).
///
/// Used by the commit–reveal protocol to hash verdicts stably.
pub fn canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, VerificationError> {
    let v = serde_json::to_value(value)?;
    Ok(serde_json::to_vec(&sort_json_keys(&v))?)
}

/// Recursively sort all object keys by code-point order.
///
/// Arrays keep their original element order; primitives pass through.
fn sort_json_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = serde_json::Map::new();
            for key in keys {
                sorted.insert(key.clone(), sort_json_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_json_keys).collect()),
        other => other.clone(),
    }
}

/// Normalize proposal text:
///
/// - lowercase
/// - keep only word characters (alphanumerics and `_`) and whitespace
/// - collapse whitespace runs to a single space, trim
pub(crate) fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some(' ')
            } else {
                None
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_types::{AccountAddress, GovernanceLayer, Timestamp};

    fn make_proposal(ast: &str, text: &str) -> Proposal {
        Proposal::new(
            AccountAddress::new("rProposer1"),
            ast,
            text,
            GovernanceLayer::L2Operational,
            Timestamp::new(1_700_000_000),
        )
    }

    #[test]
    fn sorts_keys_recursively() {
        let input: Value =
            serde_json::from_str(r#"{"z": 1, "a": 2, "m": {"y": 3, "b": 4}}"#).unwrap();
        let sorted = sort_json_keys(&input);
        assert_eq!(
            serde_json::to_string(&sorted).unwrap(),
            r#"{"a":2,"m":{"b":4,"y":3},"z":1}"#
        );
    }

    #[test]
    fn normalizes_text() {
        assert_eq!(normalize_text("Hello, World!"), "hello world");
        assert_eq!(normalize_text("  Multiple   spaces  "), "multiple spaces");
        assert_eq!(normalize_text("This is a test."), "this is a test");
        assert_eq!(normalize_text("snake_case survives"), "snake_case survives");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn equivalent_inputs_share_a_hash() {
        let p1 = make_proposal(r#"{"b": 2, "a": 1}"#, "Hello, World!");
        let p2 = make_proposal(r#"{"a": 1, "b": 2}"#, "HELLO   WORLD");

        let c1 = canonicalize(&p1).unwrap();
        let c2 = canonicalize(&p2).unwrap();
        assert_eq!(c1.hash, c2.hash);
        assert_eq!(c1.bytes, c2.bytes);
    }

    #[test]
    fn payload_layout_is_ast_dot_text() {
        let p = make_proposal(r#"{"action": "test"}"#, "Test proposal");
        let canonical = canonicalize(&p).unwrap();
        let payload = String::from_utf8(canonical.bytes.clone()).unwrap();
        assert_eq!(payload, r#"{"action":"test"}.test proposal"#);
    }

    #[test]
    fn empty_ast_and_text_are_valid() {
        let p = make_proposal("{}", "");
        let canonical = canonicalize(&p).unwrap();
        assert_eq!(canonical.bytes, b"{}.");
    }

    #[test]
    fn malformed_ast_is_rejected() {
        let p = make_proposal("{not json", "text");
        assert!(matches!(
            canonicalize(&p),
            Err(VerificationError::MalformedAst(_))
        ));
    }

    #[test]
    fn canonical_json_bytes_sorts_nested_maps() {
        let value: Value = serde_json::from_str(r#"{"b": [{"z": 1, "a": 2}], "a": 0}"#).unwrap();
        let bytes = canonical_json_bytes(&value).unwrap();
        assert_eq!(bytes, br#"{"a":0,"b":[{"a":2,"z":1}]}"#);
    }
}
