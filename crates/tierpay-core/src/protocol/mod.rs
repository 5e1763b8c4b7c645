//! Host protocol contracts.
//!
//! This module hosts the payloads exchanged with the host treasury protocol:
//! - identities: payer/terminal/delegate addresses and project ids,
//! - terms: pay/redeem quote requests and the terms returned for them,
//! - events: completion notifications and capability discovery.
//!
//! Every inbound payload is parsed strictly (`deny_unknown_fields`) and
//! malformed identities surface as `TierPayError::BadRequest`.

pub mod events;
pub mod identity;
pub mod terms;

pub use events::{Capability, Notification, PaymentEvent, RedemptionEvent};
pub use identity::{Address, ProjectId, ADDRESS_LEN};
pub use terms::{DelegateAllocation, PayParams, PayTerms, RedeemParams, RedeemTerms};
