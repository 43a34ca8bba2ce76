//! Verdict aggregation.
//!
//! A pure function of the ordered multiset of reveals: no clock, no
//! randomness. Reveals are ordered by the substrate's ledger-index
//! assignment before aggregation.

use crate::round::Reveal;
use concord_types::{
    AccountAddress, ChannelAVerdict, DecidabilityClass, ProtocolParams,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The Channel B consensus across revealed verdicts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelBConsensus {
    /// Arithmetic mean of the revealed alignment scores.
    pub alignment_score: f64,
    /// Plurality decidability class; ties resolve to the highest class.
    pub decidability_class: DecidabilityClass,
}

/// The aggregated outcome of a commit–reveal round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregatedVerdict {
    /// Number of accepted reveals.
    pub participation: usize,
    /// `ceil(active_set_len * 2/3)`.
    pub quorum_required: usize,
    pub quorum_reached: bool,
    /// Channel A consensus: a concrete verdict copied from the first
    /// majority-side reveal in ledger-index order. Absent with no reveals.
    pub channel_a: Option<ChannelAVerdict>,
    /// Channel B consensus. Absent with no reveals.
    pub channel_b: Option<ChannelBConsensus>,
    /// Committers that failed to reveal, in commitment order.
    pub non_revealers: Vec<AccountAddress>,
}

/// Aggregate a round's reveals.
///
/// `reveals` may arrive in any order; they are sorted by ledger index
/// (stable, so same-index reveals keep their submission order).
pub fn aggregate_reveals(
    reveals: &[Reveal],
    non_revealers: Vec<AccountAddress>,
    active_set_len: usize,
    params: &ProtocolParams,
) -> AggregatedVerdict {
    let mut ordered: Vec<&Reveal> = reveals.iter().collect();
    ordered.sort_by_key(|r| r.ledger_index);

    let participation = ordered.len();
    let quorum_required = params.oracle_quorum_for(active_set_len);
    let quorum_reached = participation >= quorum_required;

    // Channel A: majority vote on `pass`, ties toward fail.
    let pass_votes = ordered.iter().filter(|r| r.verdict.channel_a.pass).count();
    let majority_pass = pass_votes * 2 > participation;
    let channel_a = ordered
        .iter()
        .find(|r| r.verdict.channel_a.pass == majority_pass)
        .map(|r| r.verdict.channel_a.clone());

    // Channel B: mean alignment, plurality class with ties to the highest.
    let channel_b = if participation > 0 {
        let sum: f64 = ordered
            .iter()
            .map(|r| r.verdict.channel_b.alignment_score)
            .sum();
        let mut counts: BTreeMap<DecidabilityClass, usize> = BTreeMap::new();
        for r in &ordered {
            *counts.entry(r.verdict.channel_b.decidability_class).or_default() += 1;
        }
        let decidability_class = counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(class, _)| class)
            .unwrap_or_default();
        Some(ChannelBConsensus {
            alignment_score: sum / participation as f64,
            decidability_class,
        })
    } else {
        None
    };

    AggregatedVerdict {
        participation,
        quorum_required,
        quorum_reached,
        channel_a,
        channel_b,
        non_revealers,
    }
}
