//! Policy layer (allow-list gate, bonus schedule, redemption guard, hooks).
//!
//! Compiles policy configuration into lookup structures and exposes the
//! single-project `PolicyEngine` that the host adapter drives.

pub mod allowlist;
pub mod bonus;
pub mod engine;
pub mod guard;
pub mod hooks;

pub use allowlist::AllowList;
pub use bonus::{BonusSchedule, BonusTier, TierBound};
pub use engine::{PolicyEngine, PolicySnapshot};
pub use guard::{IssuanceLedger, IssuanceTracking};
