//! Error types for building and generating components.
//!
//! Construction errors are raised eagerly while a component graph is being
//! assembled; generation errors are raised while a graph is turned into a
//! mapping. Neither is recoverable: a failing call produces no component and
//! no mapping.

use ck_protocol::ParameterType;
use thiserror::Error;

/// Errors raised while constructing components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// The name of a job or parameter is empty or not a valid identifier.
    #[error("Invalid {component} name {name:?}: names must be non-empty and contain no whitespace")]
    InvalidName {
        component: &'static str,
        name: String,
    },

    /// A parameter with the same name is already declared.
    #[error("Parameter {name} is already declared")]
    DuplicateName { name: String },

    /// An enum parameter was declared with an empty allowed-value set.
    #[error("Enum parameter {name} must declare at least one allowed value")]
    MissingEnumValues { name: String },

    /// A value given for an enum parameter is not one of its allowed values.
    #[error("Value {default:?} of enum parameter {name} is not one of {allowed:?}")]
    InvalidEnumDefault {
        name: String,
        default: String,
        allowed: Vec<String>,
    },

    /// A value's shape disagrees with the declared parameter type.
    #[error("Parameter {name} of type {expected} cannot take a {found} value")]
    TypeMismatch {
        name: String,
        expected: ParameterType,
        found: &'static str,
    },

    /// Allowed values were supplied for a parameter that is not an enum.
    #[error("Parameter {name} of type {parameter_type} cannot declare enum values")]
    UnexpectedEnumValues {
        name: String,
        parameter_type: ParameterType,
    },
}

/// Type alias for Result with ComponentError.
pub type ComponentResult<T> = Result<T, ComponentError>;

/// Errors raised while generating a component's mapping.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The executor referenced by a job has been dropped by every owner.
    #[error("Job {job} has no resolvable executor")]
    UndefinedExecutor { job: String },

    /// A `<< parameters.* >>` placeholder could not be resolved while flattening.
    #[error("Cannot resolve {reference:?}: {reason}")]
    UnresolvedParameterReference {
        reference: String,
        reason: &'static str,
    },

    /// A caller override does not fit the parameter it is supplied for.
    #[error("Invalid override for parameter {reference}: {source}")]
    InvalidOverride {
        reference: String,
        source: ComponentError,
    },

    /// Two jobs with the same name were placed into one document.
    #[error("Job {name} appears more than once in the document")]
    DuplicateJob { name: String },

    /// A shape could not be converted into a mapping or into text.
    #[error("Failed to serialize {component}: {source}")]
    Serialize {
        component: &'static str,
        source: serde_yaml::Error,
    },
}

/// Type alias for Result with GenerateError.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Validates the name of a job or parameter.
pub(crate) fn validate_name(component: &'static str, name: &str) -> ComponentResult<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ComponentError::InvalidName {
            component,
            name: name.to_string(),
        });
    }
    Ok(())
}
