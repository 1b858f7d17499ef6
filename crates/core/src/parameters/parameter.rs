//! A single declared parameter.

use crate::error::{validate_name, ComponentError, ComponentResult, GenerateError, GenerateResult};
use crate::generable::{keyed, Generable, GenerateContext};
use ck_protocol::{GenerableType, ParameterContents, ParameterType, ParameterValue};
use serde_yaml::Value;
use tracing::debug;

/// A named, typed parameter with an optional default and description.
///
/// Parameters are validated when they are constructed: an invalid name, a
/// default of the wrong shape, or an enum without allowed values never
/// becomes a `CustomParameter`. The type is fixed for the parameter's
/// lifetime. A parameter without a default is required wherever the
/// declaring component is used.
///
/// # Example
///
/// ```rust
/// use ck_core::parameters::CustomParameter;
///
/// let env = CustomParameter::enumeration(
///     "env",
///     vec!["staging".to_string(), "prod".to_string()],
///     Some("staging"),
///     Some("target env"),
/// )?;
/// assert_eq!(env.enum_values(), Some(&["staging".to_string(), "prod".to_string()][..]));
/// # Ok::<(), ck_core::error::ComponentError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomParameter {
    name: String,
    parameter_type: ParameterType,
    default: Option<ParameterValue>,
    description: Option<String>,
    enum_values: Option<Vec<String>>,
}

impl CustomParameter {
    /// Declare a parameter of any type.
    ///
    /// `enum_values` is required (and must be non-empty) for
    /// [`ParameterType::Enum`] and rejected for every other type.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if `name` is empty or contains whitespace
    /// - `MissingEnumValues` if an enum has no allowed values
    /// - `TypeMismatch` if `default` does not have the type's shape
    /// - `InvalidEnumDefault` if an enum default is not an allowed value
    /// - `UnexpectedEnumValues` if a non-enum is given allowed values
    pub fn new(
        name: impl Into<String>,
        parameter_type: ParameterType,
        default: Option<ParameterValue>,
        description: Option<String>,
        enum_values: Option<Vec<String>>,
    ) -> ComponentResult<Self> {
        let name = name.into();
        validate_name("parameter", &name)?;

        let enum_values = match (parameter_type, enum_values) {
            (ParameterType::Enum, Some(values)) if !values.is_empty() => Some(values),
            (ParameterType::Enum, _) => return Err(ComponentError::MissingEnumValues { name }),
            (_, Some(_)) => {
                return Err(ComponentError::UnexpectedEnumValues {
                    name,
                    parameter_type,
                })
            }
            (_, None) => None,
        };

        if let Some(value) = &default {
            check_value(&name, parameter_type, enum_values.as_deref(), value)?;
        }

        Ok(Self {
            name,
            parameter_type,
            default,
            description,
            enum_values,
        })
    }

    pub fn string(
        name: impl Into<String>,
        default: Option<&str>,
        description: Option<&str>,
    ) -> ComponentResult<Self> {
        Self::new(
            name,
            ParameterType::String,
            default.map(ParameterValue::from),
            description.map(str::to_string),
            None,
        )
    }

    pub fn boolean(
        name: impl Into<String>,
        default: Option<bool>,
        description: Option<&str>,
    ) -> ComponentResult<Self> {
        Self::new(
            name,
            ParameterType::Boolean,
            default.map(ParameterValue::from),
            description.map(str::to_string),
            None,
        )
    }

    pub fn integer(
        name: impl Into<String>,
        default: Option<i64>,
        description: Option<&str>,
    ) -> ComponentResult<Self> {
        Self::new(
            name,
            ParameterType::Integer,
            default.map(ParameterValue::from),
            description.map(str::to_string),
            None,
        )
    }

    /// Declare a parameter naming an environment variable.
    pub fn environment(
        name: impl Into<String>,
        default: Option<&str>,
        description: Option<&str>,
    ) -> ComponentResult<Self> {
        Self::new(
            name,
            ParameterType::Environment,
            default.map(ParameterValue::from),
            description.map(str::to_string),
            None,
        )
    }

    pub fn enumeration(
        name: impl Into<String>,
        enum_values: Vec<String>,
        default: Option<&str>,
        description: Option<&str>,
    ) -> ComponentResult<Self> {
        Self::new(
            name,
            ParameterType::Enum,
            default.map(ParameterValue::from),
            description.map(str::to_string),
            Some(enum_values),
        )
    }

    /// Rebuild a parameter from its emitted shape, applying the same
    /// validation as [`CustomParameter::new`].
    pub fn from_contents(
        name: impl Into<String>,
        contents: ParameterContents,
    ) -> ComponentResult<Self> {
        Self::new(
            name,
            contents.parameter_type,
            contents.default,
            contents.description,
            contents.enum_values,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter_type(&self) -> ParameterType {
        self.parameter_type
    }

    pub fn default_value(&self) -> Option<&ParameterValue> {
        self.default.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Allowed values, in declaration order. `None` unless this is an enum.
    pub fn enum_values(&self) -> Option<&[String]> {
        self.enum_values.as_deref()
    }

    /// Check that `value` could be supplied for this parameter: it must have
    /// the type's shape and, for an enum, be one of the allowed values.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if `value` does not have the type's shape
    /// - `InvalidEnumDefault` if an enum value is not an allowed value
    pub fn check_value(&self, value: &ParameterValue) -> ComponentResult<()> {
        check_value(&self.name, self.parameter_type, self.enum_values(), value)
    }

    /// Whether a value must be supplied wherever the component is used.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// The emitted shape of this parameter.
    pub fn contents(&self) -> ParameterContents {
        ParameterContents {
            parameter_type: self.parameter_type,
            default: self.default.clone(),
            description: self.description.clone(),
            enum_values: self.enum_values.clone(),
        }
    }
}

fn check_value(
    name: &str,
    parameter_type: ParameterType,
    enum_values: Option<&[String]>,
    value: &ParameterValue,
) -> ComponentResult<()> {
    if !parameter_type.accepts(value) {
        return Err(ComponentError::TypeMismatch {
            name: name.to_string(),
            expected: parameter_type,
            found: value.kind(),
        });
    }

    if let (Some(allowed), ParameterValue::String(given)) = (enum_values, value) {
        if !allowed.contains(given) {
            return Err(ComponentError::InvalidEnumDefault {
                name: name.to_string(),
                default: given.clone(),
                allowed: allowed.to_vec(),
            });
        }
    }

    Ok(())
}

impl Generable for CustomParameter {
    fn generable_type(&self) -> GenerableType {
        match self.parameter_type {
            ParameterType::String => GenerableType::StringParameter,
            ParameterType::Boolean => GenerableType::BooleanParameter,
            ParameterType::Integer => GenerableType::IntegerParameter,
            ParameterType::Enum => GenerableType::EnumParameter,
            ParameterType::Environment => GenerableType::EnvironmentParameter,
        }
    }

    fn generate_contents(&self, _ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        debug!(parameter = %self.name, kind = %self.parameter_type, "Generating parameter");

        serde_yaml::to_value(self.contents()).map_err(|source| GenerateError::Serialize {
            component: self.generable_type().as_str(),
            source,
        })
    }

    fn generate(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        Ok(keyed(&self.name, self.generate_contents(ctx)?))
    }
}
