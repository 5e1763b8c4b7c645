//! Completion notifications (host -> policy) and capability discovery.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::identity::{Address, ProjectId};
use crate::error::{Result, TierPayError};

/// Delivered after the host has moved the funds of a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentEvent {
    pub project_id: ProjectId,
    pub payer: Address,
    #[serde(default)]
    pub beneficiary: Option<Address>,
    #[serde(default)]
    pub amount: u128,
    /// Project tokens minted for this payment.
    #[serde(default)]
    pub token_count: u128,
    #[serde(default)]
    pub memo: String,
}

/// Delivered after the host has moved the funds of a redemption.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedemptionEvent {
    pub project_id: ProjectId,
    pub holder: Address,
    #[serde(default)]
    pub token_count: u128,
    #[serde(default)]
    pub reclaimed_amount: u128,
    #[serde(default)]
    pub memo: String,
}

/// A completion event plus the call context it arrived with.
///
/// `caller` is the identity that invoked the hook and `value` is any native
/// value attached to the invocation itself (must be zero).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Notification<E> {
    pub caller: Address,
    #[serde(default)]
    pub value: u128,
    pub event: E,
}

/// Capabilities a policy module can advertise to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Answers pay/redeem quotes.
    DataSource,
    /// Receives payment completion notifications.
    PayDelegate,
    /// Receives redemption completion notifications.
    RedemptionDelegate,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::DataSource,
        Capability::PayDelegate,
        Capability::RedemptionDelegate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::DataSource => "data-source",
            Capability::PayDelegate => "pay-delegate",
            Capability::RedemptionDelegate => "redemption-delegate",
        }
    }
}

impl FromStr for Capability {
    type Err = TierPayError;

    fn from_str(s: &str) -> Result<Self> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TierPayError::BadRequest(format!("unknown capability: {s}")))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
