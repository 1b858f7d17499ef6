//! Project loading.
//!
//! This module reads job and executor definitions from the `.config-kit/`
//! directory and builds them into components ready to generate.

pub mod error;
pub mod loader;
pub mod models;
