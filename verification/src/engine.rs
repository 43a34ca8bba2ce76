//! The Channel A verification pipeline.

use crate::canonicalize::{canonicalize, normalize_text};
use crate::complexity::{check_complexity, compute_complexity};
use crate::cycles::detect_cycles;
use crate::paradox::detect_paradox;
use concord_types::{ChannelAVerdict, Proposal, ProtocolParams};
use serde_json::Value;

/// Verify a proposal through the full Channel A pipeline.
///
/// 1. Canonicalize; a malformed AST is a hard fail with all sub-flags clear.
/// 2. Complexity: compressed size of the canonical payload.
/// 3. Paradox: pinned patterns over the normalized text.
/// 4. Cycles: Tarjan SCC over the AST dependency graph. ASTs over the
///    cycle budget fail closed rather than run unbounded.
/// 5. `pass` iff the complexity bound holds and neither detector fired.
///
/// Deterministic: identical inputs produce identical verdicts on every
/// conforming implementation.
pub fn verify_proposal(proposal: &Proposal, params: &ProtocolParams) -> ChannelAVerdict {
    let canonical = match canonicalize(proposal) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "canonicalization failed, proposal fails Channel A");
            return ChannelAVerdict::fail(0, false, false);
        }
    };

    let complexity_score = compute_complexity(&canonical.bytes);
    let paradox_found = detect_paradox(&normalize_text(&proposal.text));

    let cycle_found = if proposal.logic_ast.len() > params.cycle_budget_bytes {
        tracing::debug!(
            size = proposal.logic_ast.len(),
            budget = params.cycle_budget_bytes,
            "AST over cycle budget, failing closed"
        );
        true
    } else {
        match serde_json::from_str::<Value>(&proposal.logic_ast) {
            Ok(ast) => detect_cycles(&ast),
            // Unreachable after a successful canonicalization.
            Err(_) => return ChannelAVerdict::fail(0, false, false),
        }
    };

    let pass =
        check_complexity(complexity_score, params.max_complexity) && !paradox_found && !cycle_found;

    if pass {
        ChannelAVerdict::pass(complexity_score)
    } else {
        ChannelAVerdict::fail(complexity_score, paradox_found, cycle_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_types::{AccountAddress, GovernanceLayer, Timestamp};

    fn make_proposal(ast: &str, text: &str) -> Proposal {
        Proposal::new(
            AccountAddress::new("rTestAddress123"),
            ast,
            text,
            GovernanceLayer::L2Operational,
            Timestamp::new(1_700_000_000),
        )
    }

    #[test]
    fn simple_proposal_passes() {
        let proposal = make_proposal(
            r#"{"action": "transfer", "amount": 100}"#,
            "Transfer 100 tokens to the community fund",
        );
        let verdict = verify_proposal(&proposal, &ProtocolParams::default());
        assert!(verdict.pass);
        assert!(!verdict.paradox_found);
        assert!(!verdict.cycle_found);
        assert!(
            verdict.complexity_score >= 40 && verdict.complexity_score <= 120,
            "complexity {} out of expected range",
            verdict.complexity_score
        );
    }

    #[test]
    fn paradox_proposal_fails() {
        let proposal = make_proposal(
            r#"{"action": "conditional"}"#,
            "This proposal passes iff it fails.",
        );
        let verdict = verify_proposal(&proposal, &ProtocolParams::default());
        assert!(!verdict.pass);
        assert!(verdict.paradox_found);
        assert!(!verdict.cycle_found);
    }

    #[test]
    fn dependency_cycle_fails() {
        let proposal = make_proposal(
            r#"{"a":{"dependencies":["b"]},"b":{"dependencies":["a"]}}"#,
            "Establish mutual dependencies",
        );
        let verdict = verify_proposal(&proposal, &ProtocolParams::default());
        assert!(!verdict.pass);
        assert!(verdict.cycle_found);
        assert!(!verdict.paradox_found);
    }

    #[test]
    fn malformed_ast_fails_with_clear_flags() {
        let proposal = make_proposal("{not valid json", "Some text");
        let verdict = verify_proposal(&proposal, &ProtocolParams::default());
        assert_eq!(verdict, ChannelAVerdict::fail(0, false, false));
    }

    #[test]
    fn empty_ast_proceeds_normally() {
        let proposal = make_proposal("{}", "A trivial proposal");
        let verdict = verify_proposal(&proposal, &ProtocolParams::default());
        assert!(verdict.pass);
        assert!(verdict.complexity_score > 0);
    }

    #[test]
    fn oversized_ast_fails_closed_on_cycles() {
        let blob = "a".repeat(70 * 1024);
        let ast = format!(r#"{{"blob":"{blob}"}}"#);
        let proposal = make_proposal(&ast, "big payload");
        let verdict = verify_proposal(&proposal, &ProtocolParams::default());
        assert!(verdict.cycle_found);
        assert!(!verdict.pass);
    }

    #[test]
    fn verdict_is_reproducible() {
        let proposal = make_proposal(r#"{"a": 1, "b": [1, 2, 3]}"#, "Adjust the parameters");
        let params = ProtocolParams::default();
        assert_eq!(
            verify_proposal(&proposal, &params),
            verify_proposal(&proposal, &params)
        );
    }
}
