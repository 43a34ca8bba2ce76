//! Fraud-proof verification.
//!
//! A fraud proof carries the canonical payload an oracle claims to have
//! verified, plus the verdict it submitted. The verifier re-runs the
//! deterministic pipeline directly on the witness bytes (canonicalization
//! is skipped — the witness *is* the canonical form) and compares all four
//! verdict fields. Fraud is proven iff any field differs.
//!
//! Fraud verification itself never fails: an unverifiable witness (bad
//! hex, bad UTF-8, wrong hash, oversized) is reported as not proven,
//! never as proven.

use crate::complexity::{check_complexity, compute_complexity};
use crate::cycles::detect_cycles;
use crate::error::VerificationError;
use crate::paradox::detect_paradox;
use concord_types::{ChannelAVerdict, ProposalId, ProtocolParams};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hard cap on witness size; anything larger is unverifiable.
pub const MAX_WITNESS_BYTES: usize = 16 * 1024 * 1024;

/// Witness data accompanying a fraud proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudProofWitness {
    /// The canonical payload bytes, hex encoded.
    pub canonical_payload_hex: String,
    /// Free-form computation trace from the challenger, for audit.
    pub trace: Vec<String>,
}

/// A challenge asserting an oracle submitted an incorrect Channel A verdict.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudProof {
    /// The proposal whose verdict is challenged.
    pub proposal_id: ProposalId,
    /// The verdict the oracle submitted.
    pub claimed_verdict: ChannelAVerdict,
    /// Witness from which the correct verdict is recomputed.
    pub witness: FraudProofWitness,
}

/// A single field-level difference between claimed and recomputed verdicts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub field: &'static str,
    pub claimed: String,
    pub recomputed: String,
}

/// The outcome of verifying a fraud proof.
#[derive(Clone, Debug, PartialEq)]
pub struct FraudProofResult {
    /// Whether fraud was proven.
    pub fraud_detected: bool,
    /// Field-level differences, empty when not proven.
    pub discrepancies: Vec<Discrepancy>,
    /// The recomputed verdict, absent when the witness was unverifiable.
    pub recomputed_verdict: Option<ChannelAVerdict>,
}

impl FraudProofResult {
    fn not_proven() -> Self {
        Self {
            fraud_detected: false,
            discrepancies: Vec::new(),
            recomputed_verdict: None,
        }
    }
}

/// Re-run Channel A steps 2–5 directly on canonical payload bytes.
///
/// The payload layout is `ast_json ++ '.' ++ normalized_text`; normalized
/// text contains no `.`, so the last `.` is the separator.
pub fn recompute_channel_a(
    canonical_bytes: &[u8],
    params: &ProtocolParams,
) -> Result<ChannelAVerdict, VerificationError> {
    if canonical_bytes.len() > MAX_WITNESS_BYTES {
        return Err(VerificationError::WitnessTooLarge {
            size: canonical_bytes.len(),
            max: MAX_WITNESS_BYTES,
        });
    }

    let sep = canonical_bytes
        .iter()
        .rposition(|&b| b == b'.')
        .ok_or(VerificationError::WitnessMissingSeparator)?;
    let (ast_part, text_part) = (&canonical_bytes[..sep], &canonical_bytes[sep + 1..]);
    let text =
        std::str::from_utf8(text_part).map_err(|_| VerificationError::WitnessNotUtf8)?;

    let complexity_score = compute_complexity(canonical_bytes);
    let paradox_found = detect_paradox(text);
    let cycle_found = if ast_part.len() > params.cycle_budget_bytes {
        true
    } else {
        let ast: Value = serde_json::from_slice(ast_part)?;
        detect_cycles(&ast)
    };

    let pass =
        check_complexity(complexity_score, params.max_complexity) && !paradox_found && !cycle_found;
    Ok(if pass {
        ChannelAVerdict::pass(complexity_score)
    } else {
        ChannelAVerdict::fail(complexity_score, paradox_found, cycle_found)
    })
}

/// Verify a fraud proof by re-executing Channel A from the witness.
pub fn verify_fraud_proof(proof: &FraudProof, params: &ProtocolParams) -> FraudProofResult {
    let bytes = match hex::decode(&proof.witness.canonical_payload_hex) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(proposal = %proof.proposal_id, error = %e, "fraud witness is not hex");
            return FraudProofResult::not_proven();
        }
    };

    // The witness must actually be the canonical payload of this proposal.
    if concord_crypto::sha256(&bytes) != *proof.proposal_id.as_bytes() {
        tracing::warn!(proposal = %proof.proposal_id, "fraud witness hash mismatch");
        return FraudProofResult::not_proven();
    }

    let recomputed = match recompute_channel_a(&bytes, params) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(proposal = %proof.proposal_id, error = %e, "fraud witness unverifiable");
            return FraudProofResult::not_proven();
        }
    };

    let claimed = &proof.claimed_verdict;
    let mut discrepancies = Vec::new();
    if claimed.pass != recomputed.pass {
        discrepancies.push(Discrepancy {
            field: "pass",
            claimed: claimed.pass.to_string(),
            recomputed: recomputed.pass.to_string(),
        });
    }
    if claimed.complexity_score != recomputed.complexity_score {
        discrepancies.push(Discrepancy {
            field: "complexity_score",
            claimed: claimed.complexity_score.to_string(),
            recomputed: recomputed.complexity_score.to_string(),
        });
    }
    if claimed.paradox_found != recomputed.paradox_found {
        discrepancies.push(Discrepancy {
            field: "paradox_found",
            claimed: claimed.paradox_found.to_string(),
            recomputed: recomputed.paradox_found.to_string(),
        });
    }
    if claimed.cycle_found != recomputed.cycle_found {
        discrepancies.push(Discrepancy {
            field: "cycle_found",
            claimed: claimed.cycle_found.to_string(),
            recomputed: recomputed.cycle_found.to_string(),
        });
    }

    let fraud_detected = !discrepancies.is_empty();
    if fraud_detected {
        tracing::warn!(
            proposal = %proof.proposal_id,
            fields = discrepancies.len(),
            "fraud proven against claimed verdict"
        );
    }

    FraudProofResult {
        fraud_detected,
        discrepancies,
        recomputed_verdict: Some(recomputed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn witness_for(bytes: &[u8]) -> (ProposalId, FraudProofWitness) {
        let id = ProposalId::new(concord_crypto::sha256(bytes));
        let witness = FraudProofWitness {
            canonical_payload_hex: hex::encode(bytes),
            trace: Vec::new(),
        };
        (id, witness)
    }

    #[test]
    fn proves_fraud_on_hidden_paradox() {
        let payload = br#"{"action":"conditional"}.this statement is false"#;
        let (id, witness) = witness_for(payload);
        let proof = FraudProof {
            proposal_id: id,
            claimed_verdict: ChannelAVerdict::pass(500),
            witness,
        };

        let result = verify_fraud_proof(&proof, &ProtocolParams::default());
        assert!(result.fraud_detected);
        let fields: Vec<&str> = result.discrepancies.iter().map(|d| d.field).collect();
        assert!(fields.contains(&"pass"));
        assert!(fields.contains(&"paradox_found"));
        assert!(fields.contains(&"complexity_score"));
    }

    #[test]
    fn honest_verdict_is_not_fraud() {
        let payload = br#"{"action":"transfer"}.send funds"#;
        let (id, witness) = witness_for(payload);
        let params = ProtocolParams::default();
        let honest = recompute_channel_a(payload, &params).unwrap();
        let proof = FraudProof {
            proposal_id: id,
            claimed_verdict: honest,
            witness,
        };

        let result = verify_fraud_proof(&proof, &params);
        assert!(!result.fraud_detected);
        assert!(result.discrepancies.is_empty());
        assert!(result.recomputed_verdict.is_some());
    }

    #[test]
    fn bad_hex_is_not_proven() {
        let proof = FraudProof {
            proposal_id: ProposalId::ZERO,
            claimed_verdict: ChannelAVerdict::pass(1),
            witness: FraudProofWitness {
                canonical_payload_hex: "zz-not-hex".to_string(),
                trace: Vec::new(),
            },
        };
        let result = verify_fraud_proof(&proof, &ProtocolParams::default());
        assert!(!result.fraud_detected);
        assert!(result.recomputed_verdict.is_none());
    }

    #[test]
    fn mismatched_witness_hash_is_not_proven() {
        let payload = br#"{"a":1}.text"#;
        let (_, witness) = witness_for(payload);
        let proof = FraudProof {
            proposal_id: ProposalId::ZERO, // wrong id for this witness
            claimed_verdict: ChannelAVerdict::pass(1),
            witness,
        };
        let result = verify_fraud_proof(&proof, &ProtocolParams::default());
        assert!(!result.fraud_detected);
        assert!(result.recomputed_verdict.is_none());
    }

    #[test]
    fn witness_without_separator_is_not_proven() {
        let payload = br#"no separator here"#;
        let (id, witness) = witness_for(payload);
        let proof = FraudProof {
            proposal_id: id,
            claimed_verdict: ChannelAVerdict::pass(1),
            witness,
        };
        let result = verify_fraud_proof(&proof, &ProtocolParams::default());
        assert!(!result.fraud_detected);
        assert!(result.recomputed_verdict.is_none());
    }
}
