//! Error types for project loading.
//!
//! This module defines all errors that can occur while reading the
//! `.config-kit/` directory and building components from its definitions.

use crate::commands::StepError;
use crate::error::ComponentError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk.
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML file at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Failed to parse a YAML definition.
    #[error("Failed to parse YAML file at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Failed to walk directory structure.
    #[error("Failed to traverse directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Invalid definition structure.
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// A job or parameter in a definition failed validation.
    #[error("Invalid component in {path}: {source}")]
    InvalidComponent {
        path: PathBuf,
        source: ComponentError,
    },

    /// A step in a job definition could not be read.
    #[error("Invalid step {index} in {path}: {source}")]
    InvalidStep {
        path: PathBuf,
        index: usize,
        source: StepError,
    },
}

/// Type alias for Result with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;
