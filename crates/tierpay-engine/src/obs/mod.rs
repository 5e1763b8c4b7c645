//! Lightweight in-process metrics (dependency-free).
//!
//! Policy decisions, rejection codes, and per-operation latency are kept as
//! atomics and rendered by the `/metrics` handler in Prometheus text format.

pub mod metrics;

pub use metrics::PolicyMetrics;
