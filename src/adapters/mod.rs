//! Adapters layer - concrete implementations of the ports.
//!
//! One module per external concern; each real adapter has a mock twin so
//! the orchestration core is testable with zero network or filesystem
//! access.

pub mod classifier;
pub mod extraction;
pub mod preferences;
pub mod render;
