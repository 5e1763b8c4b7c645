//! tierpay core: host protocol primitives and the shared error surface.
//!
//! This crate defines the contracts exchanged between the host treasury
//! protocol and the policy engine. It carries no runtime or transport
//! dependencies so it can be reused by hosts, adapters, and test tooling.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `TierPayError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ClientCode, Result, TierPayError};
