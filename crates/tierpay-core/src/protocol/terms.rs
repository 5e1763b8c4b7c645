//! Quote requests and responses (host -> policy -> host).
//!
//! The host asks for terms before it finalizes a payment or redemption. Only
//! `weight`/`reclaim_amount` and `memo` influence the answer; the remaining
//! fields describe the pending operation and are kept for logging.

use serde::{Deserialize, Serialize};

use super::identity::{Address, ProjectId};

/// Pending payment, as described by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PayParams {
    pub project_id: ProjectId,
    /// Terminal that is receiving the funds.
    pub terminal: Address,
    pub payer: Address,
    #[serde(default)]
    pub beneficiary: Option<Address>,
    /// Amount paid, in the terminal's smallest unit.
    #[serde(default)]
    pub amount: u128,
    /// Base weight computed by the host (pre-bonus).
    pub weight: u128,
    #[serde(default)]
    pub memo: String,
}

/// Pending redemption, as described by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedeemParams {
    pub project_id: ProjectId,
    pub terminal: Address,
    pub holder: Address,
    #[serde(default)]
    pub token_count: u128,
    /// Amount the host intends to return to the holder.
    pub reclaim_amount: u128,
    #[serde(default)]
    pub memo: String,
}

/// Instructs the host to call `delegate` back after the operation, forwarding
/// `amount` of the paid/reclaimed funds to it (zero: notification only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DelegateAllocation {
    pub delegate: Address,
    pub amount: u128,
}

impl DelegateAllocation {
    pub fn notify_only(delegate: Address) -> Self {
        Self { delegate, amount: 0 }
    }
}

/// Answer to a payment quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayTerms {
    /// Adjusted (post-bonus) weight.
    pub weight: u128,
    pub memo: String,
    pub delegates: Vec<DelegateAllocation>,
}

/// Answer to a redemption quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemTerms {
    pub reclaim_amount: u128,
    pub memo: String,
    pub delegates: Vec<DelegateAllocation>,
}
