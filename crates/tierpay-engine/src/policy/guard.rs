//! Issuance ledger and the redemption safety check.
//!
//! The ledger keeps one scalar, the recorded issuance weight. In the default
//! `last_payment` mode every payment quote overwrites it, so once more than
//! one payment has been quoted it bounds redemptions by the latest payment
//! only, not by the aggregate. `cumulative` mode sums instead. Either way the
//! slot moves at quote time, including for quotes the host never completes.

use tierpay_core::error::{Result, TierPayError};

pub use crate::config::schema::IssuanceTracking;

#[derive(Debug, Clone)]
pub struct IssuanceLedger {
    tracking: IssuanceTracking,
    recorded: u128,
}

impl IssuanceLedger {
    pub fn new(tracking: IssuanceTracking) -> Self {
        Self {
            tracking,
            recorded: 0,
        }
    }

    pub fn tracking(&self) -> IssuanceTracking {
        self.tracking
    }

    /// Currently recorded issuance weight.
    pub fn recorded(&self) -> u128 {
        self.recorded
    }

    /// Value the slot would hold after recording `adjusted`. Does not commit.
    pub fn next(&self, adjusted: u128) -> Result<u128> {
        match self.tracking {
            IssuanceTracking::LastPayment => Ok(adjusted),
            IssuanceTracking::Cumulative => self
                .recorded
                .checked_add(adjusted)
                .ok_or(TierPayError::ArithmeticOverflow),
        }
    }

    pub fn commit(&mut self, value: u128) {
        self.recorded = value;
    }
}

/// Require `recorded >= reclaim / highest_percent` (truncating division).
///
/// Blocks the whole redemption on failure; nothing is clamped.
pub fn check_redemption(recorded: u128, reclaim: u128, highest_percent: u32) -> Result<()> {
    let required_weight = reclaim / u128::from(highest_percent.max(1));
    if recorded >= required_weight {
        return Ok(());
    }
    Err(TierPayError::OverRedemption {
        required_weight,
        recorded_weight: recorded,
        requested: reclaim,
    })
}
