//! Monetary amounts in drops.
//!
//! All monetary values are fixed-point unsigned integers in drops
//! (1 whole unit = 1,000,000 drops) to avoid floating-point errors.
//! Arithmetic on bonds, slashes, and rewards uses checked operations;
//! overflow is an invariant violation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Drops per whole unit of the underlying currency.
pub const DROPS_PER_UNIT: u128 = 1_000_000;

/// An amount in drops (u128).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DropsAmount(u128);

impl DropsAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(drops: u128) -> Self {
        Self(drops)
    }

    /// Construct from whole units (1 unit = 1,000,000 drops).
    pub fn from_whole(units: u128) -> Self {
        Self(units * DROPS_PER_UNIT)
    }

    pub fn drops(&self) -> u128 {
        self.0
    }

    /// Whole units, truncating any fractional drops.
    pub fn to_whole(&self) -> u128 {
        self.0 / DROPS_PER_UNIT
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Apply a basis-point fraction (10,000 bps = 100%).
    ///
    /// Returns `None` on multiplication overflow.
    pub fn apply_bps(self, bps: u32) -> Option<Self> {
        self.0.checked_mul(bps as u128).map(|v| Self(v / 10_000))
    }
}

impl Add for DropsAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for DropsAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for DropsAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} drops", self.0)
    }
}
