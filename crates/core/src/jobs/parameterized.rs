//! Jobs that declare the parameters they accept.

use super::job::Job;
use crate::commands::Command;
use crate::error::{ComponentResult, GenerateResult};
use crate::executors::Executor;
use crate::generable::{key, keyed, Generable, GenerateContext};
use crate::parameters::{CustomParameter, ParametersList};
use ck_protocol::{GenerableType, ParameterType, ParameterValue};
use serde_yaml::{Mapping, Value};
use std::sync::Arc;
use tracing::debug;

/// A [`Job`] plus the parameters it accepts: the reusable form of a job.
///
/// Templated generation emits the job's contents followed by a `parameters`
/// section, and leaves `<< parameters.NAME >>` placeholders in the steps for
/// the consumer to substitute per invocation. Flattened generation omits the
/// `parameters` section and resolves every placeholder up front, producing a
/// self-contained job.
///
/// The parameters section always reflects the declarations made up to the
/// moment of generation.
#[derive(Debug, Clone)]
pub struct ParameterizedJob {
    job: Job,
    parameters: ParametersList,
}

impl ParameterizedJob {
    /// Create a parameterized job with no parameters and no steps.
    pub fn new(name: impl Into<String>, executor: &Arc<Executor>) -> ComponentResult<Self> {
        Ok(Self::with_parameters(Job::new(name, executor)?, ParametersList::new()))
    }

    /// Attach a parameter list to an existing job.
    pub fn with_parameters(job: Job, parameters: ParametersList) -> Self {
        Self { job, parameters }
    }

    pub fn name(&self) -> &str {
        self.job.name()
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn job_mut(&mut self) -> &mut Job {
        &mut self.job
    }

    pub fn parameters(&self) -> &ParametersList {
        &self.parameters
    }

    /// Declare another parameter this job accepts. Chainable.
    ///
    /// `enum_values` must be supplied, and non-empty, when `parameter_type`
    /// is [`ParameterType::Enum`].
    ///
    /// # Errors
    ///
    /// Fails with the parameter construction errors of
    /// [`CustomParameter::new`], or `DuplicateName` if `name` is already
    /// declared. On failure the job is left unchanged.
    pub fn define_parameter(
        &mut self,
        name: impl Into<String>,
        parameter_type: ParameterType,
        default: Option<ParameterValue>,
        description: Option<&str>,
        enum_values: Option<Vec<String>>,
    ) -> ComponentResult<&mut Self> {
        let parameter = CustomParameter::new(
            name,
            parameter_type,
            default,
            description.map(str::to_string),
            enum_values,
        )?;
        self.add_parameter(parameter)
    }

    /// Declare an already constructed parameter. Chainable.
    pub fn add_parameter(&mut self, parameter: CustomParameter) -> ComponentResult<&mut Self> {
        self.parameters.add(parameter)?;
        Ok(self)
    }

    /// See [`Job::add_step`].
    pub fn add_step(&mut self, command: impl Into<Arc<Command>>) -> &mut Self {
        self.job.add_step(command);
        self
    }

    /// See [`Job::add_env_var`].
    pub fn add_env_var(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.job.add_env_var(name, value);
        self
    }

    pub(crate) fn contents(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Mapping> {
        debug!(
            job = %self.name(),
            parameters = self.parameters.len(),
            flatten = ctx.is_flatten(),
            "Generating parameterized job"
        );

        if ctx.is_flatten() {
            return self.job.contents(&ctx.scoped(&self.parameters));
        }

        let mut contents = self.job.contents(ctx)?;
        contents.insert(key("parameters"), self.parameters.generate_contents(ctx)?);
        Ok(contents)
    }
}

impl Generable for ParameterizedJob {
    fn generable_type(&self) -> GenerableType {
        GenerableType::ParameterizedJob
    }

    fn generate_contents(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        self.contents(ctx).map(Value::Mapping)
    }

    fn generate(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        Ok(keyed(self.name(), self.generate_contents(ctx)?))
    }
}
