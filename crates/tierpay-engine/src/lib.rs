//! tierpay engine library entry.
//!
//! This crate wires the policy engine (allow-list gate, tiered bonus
//! schedule, redemption guard, completion hooks), the terminal directory,
//! strict config, and the HTTP host adapter into one stack. It is consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod directory;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
pub mod transport;
