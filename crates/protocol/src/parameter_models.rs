//! Parameter shape models.
//!
//! This module defines the parameter kinds a component may declare, the
//! literal values a parameter default may take, and the exact shape a
//! declared parameter is emitted as.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// The kind of a declared parameter.
///
/// The kind is fixed when the parameter is constructed and determines which
/// default values are accepted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Boolean,
    Integer,
    Enum,
    /// Names an environment variable.
    Environment,
}

impl ParameterType {
    /// The literal emitted under the `type` key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Boolean => "boolean",
            ParameterType::Integer => "integer",
            ParameterType::Enum => "enum",
            ParameterType::Environment => "environment",
        }
    }

    /// Whether a literal value has the shape this kind expects.
    ///
    /// Membership of an enum default in its allowed set is checked
    /// separately; here an enum only requires a string.
    pub fn accepts(&self, value: &ParameterValue) -> bool {
        matches!(
            (self, value),
            (ParameterType::String, ParameterValue::String(_))
                | (ParameterType::Enum, ParameterValue::String(_))
                | (ParameterType::Environment, ParameterValue::String(_))
                | (ParameterType::Boolean, ParameterValue::Boolean(_))
                | (ParameterType::Integer, ParameterValue::Integer(_))
        )
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal parameter value: a default, or a value supplied at use time.
///
/// Serialized untagged, so `true`, `3` and `"staging"` are written as plain
/// YAML scalars.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(untagged)]
pub enum ParameterValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl ParameterValue {
    /// Short name of the value's shape, used in mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ParameterValue::Boolean(_) => "boolean",
            ParameterValue::Integer(_) => "integer",
            ParameterValue::String(_) => "string",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Boolean(b) => write!(f, "{b}"),
            ParameterValue::Integer(i) => write!(f, "{i}"),
            ParameterValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Boolean(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Integer(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

/// The emitted shape of one declared parameter.
///
/// Optional fields are omitted entirely when unset; `enum` is only present
/// for enum parameters and carries the allowed values in declaration order.
///
/// # Example
///
/// ```yaml
/// type: enum
/// default: staging
/// description: target env
/// enum:
/// - staging
/// - prod
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct ParameterContents {
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub default: Option<ParameterValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub enum_values: Option<Vec<String>>,
}
