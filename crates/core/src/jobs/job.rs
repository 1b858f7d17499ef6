//! The base job.

use crate::commands::Command;
use crate::error::{validate_name, ComponentResult, GenerateError, GenerateResult};
use crate::executors::Executor;
use crate::generable::{key, keyed, Generable, GenerateContext};
use ck_protocol::GenerableType;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::num::NonZeroU32;
use std::sync::{Arc, Weak};
use tracing::debug;

/// Optional settings of a job. Unset fields are omitted from the output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobProperties {
    /// Number of parallel instances to run. The schema treats unset as 1.
    pub parallelism: Option<NonZeroU32>,

    /// Environment variables, in insertion order.
    pub environment: IndexMap<String, String>,

    pub shell: Option<String>,

    pub working_directory: Option<String>,
}

/// A collection of steps run in order within an executor.
///
/// The executor is shared, not owned: a job keeps a weak handle to an
/// executor that must stay registered elsewhere for as long as the job is
/// generated. Steps are shared handles too, so one command may appear in
/// several jobs, or several times in the same job.
///
/// # Example
///
/// ```rust
/// use ck_core::commands::Command;
/// use ck_core::executors::Executor;
/// use ck_core::generable::{Generable, GenerateContext};
/// use ck_core::jobs::Job;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = Arc::new(Executor::reusable("docker/node"));
/// let mut job = Job::new("build", &executor)?;
/// job.add_step(Command::checkout()).add_step(Command::run("npm test"));
///
/// let generated = job.generate(&GenerateContext::templated())?;
/// assert_eq!(generated["build"]["executor"], "docker/node");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Job {
    name: String,
    executor: Weak<Executor>,
    steps: Vec<Arc<Command>>,
    properties: JobProperties,
}

impl Job {
    /// Create a job with no steps.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if `name` is empty or contains whitespace.
    pub fn new(name: impl Into<String>, executor: &Arc<Executor>) -> ComponentResult<Self> {
        Self::with_properties(name, executor, Vec::new(), JobProperties::default())
    }

    pub fn with_properties(
        name: impl Into<String>,
        executor: &Arc<Executor>,
        steps: Vec<Arc<Command>>,
        properties: JobProperties,
    ) -> ComponentResult<Self> {
        let name = name.into();
        validate_name("job", &name)?;

        Ok(Self {
            name,
            executor: Arc::downgrade(executor),
            steps,
            properties,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The executor, if any owner still holds it.
    pub fn executor(&self) -> Option<Arc<Executor>> {
        self.executor.upgrade()
    }

    pub fn steps(&self) -> &[Arc<Command>] {
        &self.steps
    }

    pub fn properties(&self) -> &JobProperties {
        &self.properties
    }

    /// Append a step. Chainable; the same command may be added repeatedly.
    pub fn add_step(&mut self, command: impl Into<Arc<Command>>) -> &mut Self {
        self.steps.push(command.into());
        self
    }

    /// Set an environment variable, replacing any earlier value. Chainable.
    ///
    /// Values are written to the generated document in plain text.
    pub fn add_env_var(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.properties
            .environment
            .insert(name.into(), value.into());
        self
    }

    pub fn set_parallelism(&mut self, parallelism: NonZeroU32) -> &mut Self {
        self.properties.parallelism = Some(parallelism);
        self
    }

    pub fn set_shell(&mut self, shell: impl Into<String>) -> &mut Self {
        self.properties.shell = Some(shell.into());
        self
    }

    pub fn set_working_directory(&mut self, path: impl Into<String>) -> &mut Self {
        self.properties.working_directory = Some(path.into());
        self
    }

    /// Job contents in field order: executor fragment, steps, then the set
    /// optional properties.
    pub(crate) fn contents(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Mapping> {
        debug!(
            job = %self.name,
            flatten = ctx.is_flatten(),
            steps = self.steps.len(),
            "Generating job"
        );

        let executor = self
            .executor
            .upgrade()
            .ok_or_else(|| GenerateError::UndefinedExecutor {
                job: self.name.clone(),
            })?;

        let mut contents = executor.fragment(ctx)?;

        let steps = self
            .steps
            .iter()
            .map(|step| step.generate_contents(ctx))
            .collect::<GenerateResult<Vec<_>>>()?;
        contents.insert(key("steps"), Value::Sequence(steps));

        let properties = &self.properties;
        if let Some(parallelism) = properties.parallelism {
            contents.insert(
                key("parallelism"),
                Value::Number(u64::from(parallelism.get()).into()),
            );
        }
        if !properties.environment.is_empty() {
            let environment = properties
                .environment
                .iter()
                .map(|(name, value)| (key(name), Value::String(value.clone())))
                .collect::<Mapping>();
            contents.insert(
                key("environment"),
                ctx.resolve_value(Value::Mapping(environment))?,
            );
        }
        if let Some(shell) = &properties.shell {
            contents.insert(key("shell"), ctx.resolve_value(Value::String(shell.clone()))?);
        }
        if let Some(path) = &properties.working_directory {
            contents.insert(
                key("working_directory"),
                ctx.resolve_value(Value::String(path.clone()))?,
            );
        }

        Ok(contents)
    }
}

impl Generable for Job {
    fn generable_type(&self) -> GenerableType {
        GenerableType::Job
    }

    fn generate_contents(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        self.contents(ctx).map(Value::Mapping)
    }

    fn generate(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        Ok(keyed(&self.name, self.generate_contents(ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComponentError;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).expect("Invalid YAML in test")
    }

    fn node() -> Arc<Executor> {
        Arc::new(Executor::reusable("docker/node"))
    }

    #[test]
    fn test_build_job_scenario() {
        let executor = node();
        let mut job = Job::new("build", &executor).unwrap();
        job.add_step(Command::checkout())
            .add_step(Command::run("npm test"));

        let generated = job.generate(&GenerateContext::templated()).unwrap();

        assert_eq!(
            generated,
            yaml(
                "build:\n  executor: docker/node\n  steps:\n    - checkout\n    - run:\n        command: npm test"
            )
        );
    }

    #[test]
    fn test_steps_keep_order_for_any_count() {
        let executor = node();
        for count in 0..5 {
            let mut job = Job::new("ordered", &executor).unwrap();
            let commands: Vec<Command> =
                (0..count).map(|i| Command::run(format!("step {i}"))).collect();
            for command in &commands {
                job.add_step(command.clone());
            }

            let ctx = GenerateContext::templated();
            let generated = job.generate_contents(&ctx).unwrap();
            let expected: Vec<Value> = commands
                .iter()
                .map(|c| c.generate_contents(&ctx).unwrap())
                .collect();

            assert_eq!(generated["steps"], Value::Sequence(expected));
        }
    }

    #[test]
    fn test_same_command_can_be_added_repeatedly() {
        let executor = node();
        let checkout = Arc::new(Command::checkout());
        let mut job = Job::new("twice", &executor).unwrap();
        job.add_step(Arc::clone(&checkout))
            .add_step(Arc::clone(&checkout));

        assert!(Arc::ptr_eq(&job.steps()[0], &job.steps()[1]));
        let generated = job.generate_contents(&GenerateContext::templated()).unwrap();
        assert_eq!(generated["steps"], yaml("[checkout, checkout]"));
    }

    #[test]
    fn test_mutators_return_same_instance() {
        let executor = node();
        let mut job = Job::new("chain", &executor).unwrap();
        let job_ptr: *const Job = &job;

        let returned: *const Job = job.add_step(Command::checkout());
        assert!(std::ptr::eq(returned, job_ptr));

        let returned: *const Job = job.add_env_var("CI", "true");
        assert!(std::ptr::eq(returned, job_ptr));
    }

    #[test]
    fn test_env_var_last_write_wins() {
        let executor = node();
        let mut job = Job::new("env", &executor).unwrap();
        job.add_env_var("A", "1")
            .add_env_var("B", "2")
            .add_env_var("A", "3");

        let generated = job.generate_contents(&GenerateContext::templated()).unwrap();
        assert_eq!(generated["environment"], yaml("{A: '3', B: '2'}"));
    }

    #[test]
    fn test_optional_fields_in_fixed_order() {
        let executor = Arc::new(Executor::docker("cimg/base:stable"));
        let mut job = Job::new("full", &executor).unwrap();
        job.set_working_directory("~/app")
            .set_shell("/bin/bash")
            .set_parallelism(NonZeroU32::new(4).unwrap())
            .add_env_var("CI", "true")
            .add_step(Command::checkout());

        let generated = job.generate_contents(&GenerateContext::templated()).unwrap();
        let keys: Vec<&str> = generated
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();

        assert_eq!(
            keys,
            vec!["docker", "steps", "parallelism", "environment", "shell", "working_directory"]
        );
        assert_eq!(generated["parallelism"], yaml("4"));
    }

    #[test]
    fn test_unset_optional_fields_are_omitted() {
        let executor = node();
        let job = Job::new("bare", &executor).unwrap();

        let generated = job.generate_contents(&GenerateContext::templated()).unwrap();
        assert_eq!(generated, yaml("executor: docker/node\nsteps: []"));
    }

    #[test]
    fn test_dropped_executor_fails_generation() {
        let executor = node();
        let job = Job::new("orphan", &executor).unwrap();
        drop(executor);

        assert!(job.executor().is_none());
        let err = job.generate(&GenerateContext::templated()).unwrap_err();
        assert!(matches!(err, GenerateError::UndefinedExecutor { ref job } if job == "orphan"));
    }

    #[test]
    fn test_dropping_job_keeps_shared_executor() {
        let executor = node();
        let first = Job::new("first", &executor).unwrap();
        let second = Job::new("second", &executor).unwrap();
        drop(first);

        assert_eq!(Arc::strong_count(&executor), 1);
        assert!(second.generate(&GenerateContext::templated()).is_ok());
    }

    #[test]
    fn test_invalid_job_name() {
        let executor = node();
        assert!(matches!(
            Job::new("", &executor),
            Err(ComponentError::InvalidName { component: "job", .. })
        ));
    }

    #[test]
    fn test_generation_is_idempotent() {
        let executor = node();
        let mut job = Job::new("stable", &executor).unwrap();
        job.add_step(Command::run("make")).add_env_var("X", "y");

        let ctx = GenerateContext::templated();
        assert_eq!(job.generate(&ctx).unwrap(), job.generate(&ctx).unwrap());
    }

    #[test]
    fn test_flatten_on_base_job_leaves_placeholders() {
        let executor = node();
        let mut job = Job::new("plain", &executor).unwrap();
        job.add_step(Command::run("echo << parameters.x >>"));

        let generated = job.generate_contents(&GenerateContext::flattened()).unwrap();
        assert_eq!(generated["steps"][0]["run"]["command"], yaml("echo << parameters.x >>"));
    }
}
