//! Crate-level tests for the encounter pipeline.
//!
//! - `determinism.rs`: the same seed and input produce the same encounter
//! - `integration.rs`: end-to-end runs through the encounter server
//! - `helpers.rs`: setup utilities shared by both

mod determinism;
mod helpers;

pub use helpers::*;
