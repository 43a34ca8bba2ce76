//! Paradox detection.
//!
//! A pinned set of regular expressions is matched against the normalized
//! proposal text to reject Gödelian self-reference ("this proposal passes
//! iff it fails"). The pattern set is part of the deterministic verdict:
//! fraud proofs re-run it, so it must not drift.
//!
//! The `regex` crate is a non-backtracking (RE2-class) engine; adversarial
//! text cannot trigger catastrophic backtracking.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// The pinned paradox patterns, matched case-insensitively against
    /// normalized text.
    static ref PARADOX_PATTERNS: Vec<Regex> = vec![
        // "this proposal passes iff it fails" and mirror forms
        Regex::new(r"(?i)(this proposal|the motion).*(passes|fails)\s*iff.*(fails|passes)")
            .expect("pinned paradox pattern 1"),
        // liar paradox: "this statement is false"
        Regex::new(r"(?i)(this rule|this statement|the following statement)\s*is\s*false")
            .expect("pinned paradox pattern 2"),
        // conditional self-reference: "if this is true then it is false"
        Regex::new(r"(?i)if\s+this.*(true|passes).*then.*(false|fails)")
            .expect("pinned paradox pattern 3"),
    ];
}

/// Whether the text contains a self-referential paradox.
///
/// Expects normalized text (the canonicalizer's output); raw text also
/// works since the patterns tolerate case and internal whitespace.
pub fn detect_paradox(text: &str) -> bool {
    PARADOX_PATTERNS.iter().any(|pattern| pattern.is_match(text))
}

/// Which patterns matched, with the matched span, for audit output.
pub fn find_paradox_matches(text: &str) -> Vec<(usize, String)> {
    PARADOX_PATTERNS
        .iter()
        .enumerate()
        .filter_map(|(i, pattern)| pattern.find(text).map(|m| (i, m.as_str().to_string())))
        .collect()
}
