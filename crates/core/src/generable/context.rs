//! Generation settings passed down the component tree.

use crate::error::{GenerateError, GenerateResult};
use crate::parameters::template;
use crate::parameters::ParametersList;
use ck_protocol::ParameterValue;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::borrow::Cow;

/// Controls how a component tree is generated.
///
/// In templated mode (the default) parameterized components keep their
/// `parameters` section and every `<< parameters.* >>` placeholder is left
/// for the consumer to substitute. In flatten mode placeholders are resolved
/// while the tree is generated, using caller-supplied overrides first and the
/// declared defaults otherwise.
///
/// # Example
///
/// ```rust
/// use ck_core::generable::GenerateContext;
///
/// let ctx = GenerateContext::flattened().with_override("env", "prod");
/// assert!(ctx.is_flatten());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GenerateContext<'a> {
    flatten: bool,
    overrides: IndexMap<String, ParameterValue>,
    scope: Option<&'a ParametersList>,
}

impl GenerateContext<'static> {
    pub fn new(flatten: bool) -> Self {
        Self {
            flatten,
            ..Self::default()
        }
    }

    /// Keep parameters and placeholders in the generated output.
    pub fn templated() -> Self {
        Self::new(false)
    }

    /// Resolve placeholders and drop parameter sections.
    pub fn flattened() -> Self {
        Self::new(true)
    }
}

impl<'a> GenerateContext<'a> {
    /// Supply a value for a parameter, taking precedence over its default.
    pub fn with_override(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    pub fn is_flatten(&self) -> bool {
        self.flatten
    }

    pub fn overrides(&self) -> &IndexMap<String, ParameterValue> {
        &self.overrides
    }

    /// The parameters placeholders currently resolve against, if any.
    pub fn scope(&self) -> Option<&'a ParametersList> {
        self.scope
    }

    /// A context resolving placeholders against `parameters`.
    pub fn scoped<'b>(&self, parameters: &'b ParametersList) -> GenerateContext<'b> {
        GenerateContext {
            flatten: self.flatten,
            overrides: self.overrides.clone(),
            scope: Some(parameters),
        }
    }

    /// Resolve every placeholder in `text`, interpolating each value as text.
    ///
    /// Text is returned unchanged unless flattening inside a parameter scope.
    pub fn resolve<'s>(&self, text: &'s str) -> GenerateResult<Cow<'s, str>> {
        let Some(parameters) = self.active_scope() else {
            return Ok(Cow::Borrowed(text));
        };

        template::substitute(text, |name| {
            self.lookup(parameters, name).map(ToString::to_string)
        })
    }

    /// Resolve every placeholder in the strings of a generated value.
    ///
    /// A string that is exactly one placeholder becomes the parameter's value
    /// with its own type, so `<< parameters.cache >>` with a boolean default
    /// yields `true` rather than `"true"`. Mapping keys are left as they are.
    pub fn resolve_value(&self, value: Value) -> GenerateResult<Value> {
        let Some(parameters) = self.active_scope() else {
            return Ok(value);
        };

        match value {
            Value::String(text) => match template::sole_reference(&text) {
                Some(name) => {
                    let resolved = self.lookup(parameters, name)?;
                    serde_yaml::to_value(resolved).map_err(|source| GenerateError::Serialize {
                        component: "parameter value",
                        source,
                    })
                }
                None => Ok(Value::String(self.resolve(&text)?.into_owned())),
            },
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| self.resolve_value(item))
                .collect::<GenerateResult<Vec<_>>>()
                .map(Value::Sequence),
            Value::Mapping(mapping) => {
                let mut resolved = Mapping::with_capacity(mapping.len());
                for (key, item) in mapping {
                    resolved.insert(key, self.resolve_value(item)?);
                }
                Ok(Value::Mapping(resolved))
            }
            other => Ok(other),
        }
    }

    /// The scope placeholders resolve against, if this context flattens.
    fn active_scope(&self) -> Option<&'a ParametersList> {
        self.scope.filter(|_| self.flatten)
    }

    /// The value of parameter `name`: the caller's override if it fits the
    /// parameter, otherwise the declared default.
    fn lookup<'s>(
        &'s self,
        parameters: &'s ParametersList,
        name: &str,
    ) -> GenerateResult<&'s ParameterValue> {
        let parameter =
            parameters
                .get(name)
                .ok_or_else(|| GenerateError::UnresolvedParameterReference {
                    reference: name.to_string(),
                    reason: "no parameter with this name is declared",
                })?;

        if let Some(value) = self.overrides.get(name) {
            parameter
                .check_value(value)
                .map_err(|source| GenerateError::InvalidOverride {
                    reference: name.to_string(),
                    source,
                })?;
            return Ok(value);
        }

        parameter
            .default_value()
            .ok_or_else(|| GenerateError::UnresolvedParameterReference {
                reference: name.to_string(),
                reason: "the parameter has no default and no override was supplied",
            })
    }
}
