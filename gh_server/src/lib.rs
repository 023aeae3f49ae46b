//! HTTP adapter for the gatehouse authentication library.
//!
//! Exposes the router, configuration, logging, and metrics plumbing so the
//! integration tests can drive the full API without spawning the binary.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
