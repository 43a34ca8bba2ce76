//! Constitutional jury — seeded stake-weighted sampling and supermajority
//! resolution.
//!
//! A panel of 21 jurors is drawn from recently active accounts, weighted
//! by the square root of balance so that stake matters sublinearly. The
//! sampling is reproducible from the seed and the eligible list alone, so
//! any node can verify a panel. Class IV proposals use the human-majority
//! variant, which excludes identified AI accounts from the pool.

pub mod engine;
pub mod error;
pub mod panel;
pub mod selection;

pub use engine::JuryEngine;
pub use error::JuryError;
pub use panel::{JuryPanel, JuryVerdict, JuryVote};
pub use selection::{jury_seed, select_jury, EligibleAccount};
