//! Seeded stake-weighted jury sampling.

use crate::error::JuryError;
use concord_types::{AccountAddress, DropsAmount, ProposalId, ProtocolParams, Timestamp};
use serde::{Deserialize, Serialize};

/// An account eligible for jury duty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibleAccount {
    pub address: AccountAddress,
    pub balance: DropsAmount,
    pub last_active: Timestamp,
    /// Identified AI accounts are excluded from human-majority panels.
    pub identified_ai: bool,
}

/// Derive the selection seed for a proposal from the ledger hash at
/// submission: `sha256(proposal_id ++ ledger_hash)`.
pub fn jury_seed(proposal_id: &ProposalId, ledger_hash: &[u8; 32]) -> [u8; 32] {
    concord_crypto::sha256_multi(&[proposal_id.as_bytes(), ledger_hash])
}

/// Sample a jury panel.
///
/// Accounts inactive for longer than the eligibility window are filtered
/// out first (and, for a human-majority panel, identified AI accounts).
/// Each remaining account gets a selection key
/// `H(seed ++ address) / isqrt(balance)`; the `jury_size` lowest keys win.
/// Lower keys are likelier for larger balances, giving sqrt-weighted
/// sampling that is reproducible from `(seed, eligible)` alone.
pub fn select_jury(
    seed: &[u8; 32],
    eligible: &[EligibleAccount],
    now: Timestamp,
    human_only: bool,
    params: &ProtocolParams,
) -> Result<Vec<AccountAddress>, JuryError> {
    let cutoff = now.as_secs().saturating_sub(params.jury_eligibility_window_secs);
    let pool: Vec<&EligibleAccount> = eligible
        .iter()
        .filter(|a| a.last_active.as_secs() >= cutoff)
        .filter(|a| !human_only || !a.identified_ai)
        .collect();

    if pool.len() < params.jury_size {
        return Err(JuryError::InsufficientEligible {
            have: pool.len(),
            need: params.jury_size,
        });
    }

    let mut scored: Vec<(u128, &AccountAddress)> = pool
        .iter()
        .map(|account| {
            let hash =
                concord_crypto::sha256_multi(&[seed, account.address.as_str().as_bytes()]);
            let mut raw = [0u8; 16];
            raw.copy_from_slice(&hash[..16]);
            // Dust accounts keep a minimal weight so they stay sampleable.
            let weight = isqrt(account.balance.drops()).max(1);
            (u128::from_be_bytes(raw) / weight, &account.address)
        })
        .collect();
    scored.sort();
    scored.truncate(params.jury_size);

    Ok(scored.into_iter().map(|(_, addr)| addr.clone()).collect())
}

/// Integer square root (Newton's method).
fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x + 1) >> 1;
    while y < x {
        x = y;
        y = (x + n / x) >> 1;
    }
    x
}
