//! The ordered, name-unique collection of parameters owned by one component.

use super::parameter::CustomParameter;
use crate::error::{ComponentError, ComponentResult, GenerateResult};
use crate::generable::{Generable, GenerateContext};
use ck_protocol::GenerableType;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

/// Parameters keyed by name, in declaration order.
///
/// Declaration order is the emission order. A name can be declared once;
/// a failed [`ParametersList::add`] leaves the list untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParametersList {
    parameters: IndexMap<String, CustomParameter>,
}

impl ParametersList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from parameters in order, failing on the first duplicate.
    pub fn from_parameters(
        parameters: impl IntoIterator<Item = CustomParameter>,
    ) -> ComponentResult<Self> {
        let mut list = Self::new();
        for parameter in parameters {
            list.add(parameter)?;
        }
        Ok(list)
    }

    /// Append a parameter. Chainable.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if a parameter with the same name exists.
    pub fn add(&mut self, parameter: CustomParameter) -> ComponentResult<&mut Self> {
        if self.parameters.contains_key(parameter.name()) {
            return Err(ComponentError::DuplicateName {
                name: parameter.name().to_string(),
            });
        }
        self.parameters
            .insert(parameter.name().to_string(), parameter);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&CustomParameter> {
        self.parameters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomParameter> {
        self.parameters.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a ParametersList {
    type Item = &'a CustomParameter;
    type IntoIter = indexmap::map::Values<'a, String, CustomParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.values()
    }
}

impl Generable for ParametersList {
    fn generable_type(&self) -> GenerableType {
        GenerableType::ParametersList
    }

    fn generate_contents(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        let mut contents = Mapping::with_capacity(self.parameters.len());
        for (name, parameter) in &self.parameters {
            contents.insert(
                Value::String(name.clone()),
                parameter.generate_contents(ctx)?,
            );
        }
        Ok(Value::Mapping(contents))
    }
}
