//! Transport layer (HTTP).
//!
//! Exposes the host-facing handlers and the JSON error surface.

pub mod http;

pub use http::ApiError;
