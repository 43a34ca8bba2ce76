//! Protocol parameters — the normative constants plus tunable thresholds.
//!
//! Every component takes its thresholds from this struct rather than
//! scattering literals; the defaults carry the normative values.

use crate::amount::DropsAmount;
use serde::{Deserialize, Serialize};

/// All protocol parameters consumed by the core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolParams {
    // ── Channel A ────────────────────────────────────────────────────────
    /// Maximum complexity score (compressed payload bytes) for a PASS.
    pub max_complexity: u64,

    /// Raw AST size above which cycle detection short-circuits to failure.
    pub cycle_budget_bytes: usize,

    // ── Oracles ──────────────────────────────────────────────────────────
    /// Bond required of every oracle operator.
    pub oracle_bond: DropsAmount,

    /// Epoch length in ledger intervals (~2 weeks).
    pub oracle_epoch: u64,

    /// Commit window (and again reveal window) in ledger intervals.
    pub oracle_window: u64,

    /// Maximum size of the active oracle set.
    pub active_oracle_set_size: usize,

    /// Oracle participation quorum as an exact fraction (numerator, denominator).
    pub oracle_quorum_num: u64,
    pub oracle_quorum_den: u64,

    /// Wall-clock hint for bond escrow release (one epoch, ~2 weeks).
    pub unbond_period_secs: u64,

    // ── Slashing ─────────────────────────────────────────────────────────
    /// Slash for a missed reveal, in basis points of the current bond.
    pub slash_non_reveal_bps: u32,

    /// Slash for sustained inactivity, in basis points of the current bond.
    pub slash_inactivity_bps: u32,

    /// Cumulative missed reveals (within an epoch) that trigger an inactivity slash.
    pub inactivity_threshold: u32,

    /// Cumulative slashes beyond this fraction of the original bond auto-eject.
    pub auto_eject_threshold_bps: u32,

    // ── Jury ─────────────────────────────────────────────────────────────
    /// Number of jurors sampled per panel.
    pub jury_size: usize,

    /// Jury voting period in seconds (72 hours).
    pub jury_voting_period_secs: u64,

    /// Jury supermajority as an exact fraction (numerator, denominator).
    pub jury_supermajority_num: u64,
    pub jury_supermajority_den: u64,

    /// Accounts inactive for longer than this are not jury-eligible (90 days).
    pub jury_eligibility_window_secs: u64,

    // ── Friction floors ──────────────────────────────────────────────────
    /// L1 constitutional floor: minimum quorum.
    pub l1_min_quorum: f64,
    /// L1 constitutional floor: minimum timelock in seconds (30 days).
    pub l1_min_timelock_secs: u64,

    /// L3 execution floor: minimum quorum.
    pub l3_min_quorum: f64,
    /// L3 execution floor: minimum timelock in seconds (12 hours).
    pub l3_min_timelock_secs: u64,

    /// Class IV floor: minimum quorum.
    pub class_iv_min_quorum: f64,
    /// Class IV floor: minimum timelock in seconds (7 days).
    pub class_iv_min_timelock_secs: u64,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            // Channel A
            max_complexity: 10_000,
            cycle_budget_bytes: 64 * 1024,

            // Oracles
            oracle_bond: DropsAmount::new(100_000_000_000), // 100,000 units
            oracle_epoch: 201_600,
            oracle_window: 1_000,
            active_oracle_set_size: 101,
            oracle_quorum_num: 2,
            oracle_quorum_den: 3,
            unbond_period_secs: 14 * 86_400,

            // Slashing
            slash_non_reveal_bps: 1_500,  // 15%
            slash_inactivity_bps: 500,    // 5%
            inactivity_threshold: 3,
            auto_eject_threshold_bps: 5_000, // 50% of original bond

            // Jury
            jury_size: 21,
            jury_voting_period_secs: 72 * 3_600,
            jury_supermajority_num: 2,
            jury_supermajority_den: 3,
            jury_eligibility_window_secs: 90 * 86_400,

            // Friction floors
            l1_min_quorum: 0.67,
            l1_min_timelock_secs: 30 * 86_400,
            l3_min_quorum: 0.05,
            l3_min_timelock_secs: 12 * 3_600,
            class_iv_min_quorum: 0.5,
            class_iv_min_timelock_secs: 7 * 86_400,
        }
    }
}

impl ProtocolParams {
    /// Oracle reveal quorum for an active set of `set_size`: `ceil(set_size * 2/3)`.
    pub fn oracle_quorum_for(&self, set_size: usize) -> usize {
        let n = set_size as u64 * self.oracle_quorum_num;
        (n.div_ceil(self.oracle_quorum_den)) as usize
    }
}
