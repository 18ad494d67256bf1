//! Test infrastructure for the tenancy layer.
//!
//! Shared entity types and seeded tables used across the integration tests.

pub mod fixtures;

pub use fixtures::*;
