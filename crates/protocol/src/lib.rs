//! # ck-protocol
//!
//! Shape definitions shared by every config-kit crate.
//!
//! This crate defines the serializable structures used for:
//! - Emitted parameter declarations (`type`, `default`, `description`, `enum`)
//! - The closed set of component tags used to dispatch on generated entities
//! - Project-wide settings read from `.config-kit/config.toml`
//!
//! ## Modules
//!
//! - [`generable_models`]: The [`GenerableType`] discriminator
//! - [`parameter_models`]: Parameter kinds, literal values and emitted shape
//! - [`config_models`]: Global configuration from config.toml
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde and ts-rs
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other config-kit crates

pub mod config_models;
pub mod generable_models;
pub mod parameter_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use generable_models::*;
pub use parameter_models::*;
