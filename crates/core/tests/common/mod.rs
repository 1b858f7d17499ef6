//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality across integration tests:
//! - Test fixtures (sample `.config-kit/` projects)
//! - Custom assertions on generated documents

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
