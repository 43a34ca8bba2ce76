use proptest::prelude::*;

use concord_types::{AccountAddress, GovernanceLayer, Proposal, ProtocolParams, Timestamp};
use concord_verification::{canonicalize, recompute_channel_a, verify_proposal};

fn make_proposal(ast: String, text: String) -> Proposal {
    Proposal::new(
        AccountAddress::new("rPropTester"),
        ast,
        text,
        GovernanceLayer::L2Operational,
        Timestamp::new(1_700_000_000),
    )
}

/// A small JSON object rendered with keys in two different orders.
fn two_key_orders() -> impl Strategy<Value = (String, String)> {
    proptest::collection::btree_map("[a-z]{1,6}", 0u32..1000, 1..6)
        .prop_map(|map| {
            let forward: Vec<String> =
                map.iter().map(|(k, v)| format!("\"{k}\": {v}")).collect();
            let reverse: Vec<String> =
                map.iter().rev().map(|(k, v)| format!("\"{k}\":{v}")).collect();
            (
                format!("{{{}}}", forward.join(", ")),
                format!("{{{}}}", reverse.join(",")),
            )
        })
}

proptest! {
    /// Canonicalization stability: key order and JSON whitespace are
    /// irrelevant to the canonical hash.
    #[test]
    fn key_order_does_not_change_hash(
        (ast1, ast2) in two_key_orders(),
        text in "[a-zA-Z0-9 ]{0,40}",
    ) {
        let c1 = canonicalize(&make_proposal(ast1, text.clone())).unwrap();
        let c2 = canonicalize(&make_proposal(ast2, text)).unwrap();
        prop_assert_eq!(c1.hash, c2.hash);
        prop_assert_eq!(c1.bytes, c2.bytes);
    }

    /// Case, whitespace runs, and trailing punctuation on the text are
    /// irrelevant to the canonical hash.
    #[test]
    fn text_noise_does_not_change_hash(text in "[a-zA-Z][a-zA-Z0-9 ]{0,30}") {
        let noisy = format!("  {}  !!! ", text.to_uppercase());
        let c1 = canonicalize(&make_proposal("{}".into(), text)).unwrap();
        let c2 = canonicalize(&make_proposal("{}".into(), noisy)).unwrap();
        prop_assert_eq!(c1.hash, c2.hash);
    }

    /// Verdict reproducibility: two invocations agree bit-for-bit.
    #[test]
    fn verify_is_deterministic(
        (ast, _) in two_key_orders(),
        text in "[ -~]{0,60}",
    ) {
        let proposal = make_proposal(ast, text);
        let params = ProtocolParams::default();
        prop_assert_eq!(
            verify_proposal(&proposal, &params),
            verify_proposal(&proposal, &params)
        );
    }

    /// The verdict invariant: pass is exactly the conjunction of the bound
    /// and the two detectors.
    #[test]
    fn pass_is_the_conjunction(
        (ast, _) in two_key_orders(),
        text in "[ -~]{0,60}",
    ) {
        let params = ProtocolParams::default();
        let verdict = verify_proposal(&make_proposal(ast, text), &params);
        prop_assert_eq!(
            verdict.pass,
            verdict.complexity_score <= params.max_complexity
                && !verdict.paradox_found
                && !verdict.cycle_found
        );
    }

    /// Fraud round-trip law: recomputing Channel A from the canonical
    /// bytes reproduces the pipeline verdict.
    #[test]
    fn recompute_matches_pipeline(
        (ast, _) in two_key_orders(),
        text in "[a-zA-Z0-9 ,!?.]{0,60}",
    ) {
        let proposal = make_proposal(ast, text);
        let params = ProtocolParams::default();
        let canonical = canonicalize(&proposal).unwrap();
        let pipeline = verify_proposal(&proposal, &params);
        let recomputed = recompute_channel_a(&canonical.bytes, &params).unwrap();
        prop_assert_eq!(pipeline, recomputed);
    }

    /// Canonical serialization round-trip: canonicalizing a proposal that
    /// has itself been serialized and deserialized changes nothing.
    #[test]
    fn serde_roundtrip_preserves_canonical_form(
        (ast, _) in two_key_orders(),
        text in "[a-zA-Z0-9 ]{0,40}",
    ) {
        let proposal = make_proposal(ast, text);
        let json = serde_json::to_string(&proposal).unwrap();
        let back: Proposal = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(
            canonicalize(&proposal).unwrap().hash,
            canonicalize(&back).unwrap().hash
        );
    }
}
