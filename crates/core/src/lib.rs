//! # ck-core
//!
//! Generable components and project loading for config-kit.
//!
//! This crate provides:
//! - Custom parameters and parameter lists
//! - Jobs, plain and parameterized, with their steps and executors
//! - Placeholder resolution for flattened output
//! - Project loading from the `.config-kit/` directory
//!
//! ## Modules
//!
//! - [`generable`]: The `Generable` trait and generation context
//! - [`parameters`]: Custom parameters and placeholder templates
//! - [`jobs`]: Jobs and parameterized jobs
//! - [`commands`]: Step commands
//! - [`executors`]: Docker, machine, macos and reusable executors
//! - [`document`]: Rendering a whole document
//! - [`config`]: Configuration loading and management

pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod executors;
pub mod generable;
pub mod jobs;
pub mod parameters;
