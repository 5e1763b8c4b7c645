//! Tiered bonus schedule.
//!
//! Maps a base weight to an adjusted weight:
//!
//! ```text
//! adjusted = base * bonus_percent / 100   (integer, truncating)
//! ```
//!
//! `bonus_percent` is a whole-number percentage multiplier: **100 is the
//! identity**, 150 is a 50% bonus. A weight that matches no tier gets 100.
//!
//! Two tier shapes exist and a schedule holds only one of them:
//! - threshold tiers (`weight >= threshold`) are evaluated from the highest
//!   threshold to the lowest, whatever order they were configured in, so a
//!   small tier can never mask a larger one;
//! - range tiers (`min <= weight <= max`) are evaluated in configured order
//!   and must not overlap.

use tierpay_core::error::{Result, TierPayError};

/// Percentage that leaves a weight unchanged.
pub const IDENTITY_PERCENT: u32 = 100;

/// Largest accepted bonus (100x).
pub const MAX_BONUS_PERCENT: u32 = 10_000;

/// Which weights a tier applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierBound {
    /// `weight >= threshold`
    AtLeast(u128),
    /// `min <= weight <= max`
    Within { min: u128, max: u128 },
}

impl TierBound {
    fn matches(&self, weight: u128) -> bool {
        match *self {
            TierBound::AtLeast(threshold) => weight >= threshold,
            TierBound::Within { min, max } => (min..=max).contains(&weight),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusTier {
    pub bound: TierBound,
    pub bonus_percent: u32,
}

impl BonusTier {
    pub fn at_least(threshold: u128, bonus_percent: u32) -> Self {
        Self {
            bound: TierBound::AtLeast(threshold),
            bonus_percent,
        }
    }

    pub fn within(min: u128, max: u128, bonus_percent: u32) -> Self {
        Self {
            bound: TierBound::Within { min, max },
            bonus_percent,
        }
    }
}

/// Validated tier set, stored in evaluation order.
#[derive(Debug, Clone, Default)]
pub struct BonusSchedule {
    tiers: Vec<BonusTier>,
}

impl BonusSchedule {
    /// A schedule with no tiers: every weight passes through unchanged.
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn new(mut tiers: Vec<BonusTier>) -> Result<Self> {
        for t in &tiers {
            if !(IDENTITY_PERCENT..=MAX_BONUS_PERCENT).contains(&t.bonus_percent) {
                return Err(TierPayError::BadRequest(format!(
                    "bonus_percent must be between {IDENTITY_PERCENT} and {MAX_BONUS_PERCENT}, got {}",
                    t.bonus_percent
                )));
            }
        }

        let ranged = tiers
            .iter()
            .filter(|t| matches!(t.bound, TierBound::Within { .. }))
            .count();

        if ranged == 0 {
            // Highest threshold first. Equal thresholds would make the winner
            // depend on configured order.
            tiers.sort_by(|a, b| threshold_of(b).cmp(&threshold_of(a)));
            if let Some(w) = tiers.windows(2).find(|w| threshold_of(&w[0]) == threshold_of(&w[1])) {
                return Err(TierPayError::BadRequest(format!(
                    "duplicate bonus threshold: {}",
                    threshold_of(&w[0])
                )));
            }
        } else if ranged == tiers.len() {
            check_ranges(&tiers)?;
        } else {
            return Err(TierPayError::BadRequest(
                "bonus tiers must be all thresholds or all ranges".into(),
            ));
        }

        Ok(Self { tiers })
    }

    /// Tiers in evaluation order.
    pub fn tiers(&self) -> &[BonusTier] {
        &self.tiers
    }

    /// Percentage applied to `weight` (100 when no tier matches).
    pub fn bonus_percent_for(&self, weight: u128) -> u32 {
        self.tiers
            .iter()
            .find(|t| t.bound.matches(weight))
            .map(|t| t.bonus_percent)
            .unwrap_or(IDENTITY_PERCENT)
    }

    /// Most generous percentage in the schedule, 100 for a flat schedule.
    pub fn highest_bonus_percent(&self) -> u32 {
        self.tiers
            .iter()
            .map(|t| t.bonus_percent)
            .max()
            .unwrap_or(IDENTITY_PERCENT)
    }

    /// Apply the matching tier to `base`.
    pub fn adjust(&self, base: u128) -> Result<u128> {
        if base == 0 {
            return Ok(0);
        }
        let pct = u128::from(self.bonus_percent_for(base));
        let scaled = base
            .checked_mul(pct)
            .ok_or(TierPayError::ArithmeticOverflow)?;
        Ok(scaled / u128::from(IDENTITY_PERCENT))
    }
}

fn threshold_of(t: &BonusTier) -> u128 {
    match t.bound {
        TierBound::AtLeast(threshold) => threshold,
        TierBound::Within { min, .. } => min,
    }
}

fn check_ranges(tiers: &[BonusTier]) -> Result<()> {
    let mut spans = Vec::with_capacity(tiers.len());
    for t in tiers {
        if let TierBound::Within { min, max } = t.bound {
            if min > max {
                return Err(TierPayError::BadRequest(format!(
                    "bonus range min {min} exceeds max {max}"
                )));
            }
            spans.push((min, max));
        }
    }

    spans.sort_unstable();
    for w in spans.windows(2) {
        let ((a_min, a_max), (b_min, b_max)) = (w[0], w[1]);
        if b_min <= a_max {
            return Err(TierPayError::BadRequest(format!(
                "bonus ranges overlap: [{a_min}, {a_max}] and [{b_min}, {b_max}]"
            )));
        }
    }
    Ok(())
}
