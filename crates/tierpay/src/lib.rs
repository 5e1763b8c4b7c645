//! Top-level facade crate for tierpay.
//!
//! Re-exports core types and the policy engine so users can depend on a single crate.

pub mod core {
    pub use tierpay_core::*;
}

pub mod engine {
    pub use tierpay_engine::*;
}
