//! Definition file shapes and the loaded project.
//!
//! Definitions are written in the same shape the components generate, so a
//! job definition reads like the job it produces.

use crate::document::render_document;
use crate::error::GenerateResult;
use crate::executors::{DockerImage, Executor, MachineParameters, MacosParameters};
use crate::generable::GenerateContext;
use crate::jobs::AnyJob;
use ck_protocol::{GlobalConfig, ParameterContents, ParameterValue};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;
use std::num::NonZeroU32;
use std::sync::Arc;

/// An executor definition from `.config-kit/executors/*.yaml`.
///
/// # Example
///
/// ```yaml
/// name: node
/// docker:
///   - image: cimg/node:20.5
/// resource_class: large
/// ```
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ExecutorDefinition {
    pub name: String,

    #[serde(default)]
    pub docker: Option<Vec<DockerImage>>,

    #[serde(default)]
    pub machine: Option<MachineParameters>,

    #[serde(default)]
    pub macos: Option<MacosParameters>,

    #[serde(default)]
    pub resource_class: Option<String>,
}

/// How a job definition names its executor.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ExecutorReference {
    /// A defined executor, or an external one referenced by name.
    Name(String),

    /// An external executor invoked with arguments: `{ name, arg: value }`.
    Invocation(IndexMap<String, ParameterValue>),
}

/// A job definition from `.config-kit/jobs/*.yaml`.
///
/// A definition with a `parameters` section becomes a parameterized job.
///
/// # Example
///
/// ```yaml
/// name: deploy
/// executor: node
/// parameters:
///   env:
///     type: enum
///     default: staging
///     enum: [staging, prod]
/// steps:
///   - checkout
///   - run:
///       command: ./deploy.sh << parameters.env >>
/// ```
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct JobDefinition {
    pub name: String,

    pub executor: ExecutorReference,

    /// Steps in emitted form; validated when the job is built.
    #[serde(default)]
    pub steps: Vec<Value>,

    #[serde(default)]
    pub parameters: Option<IndexMap<String, ParameterContents>>,

    #[serde(default)]
    pub parallelism: Option<NonZeroU32>,

    #[serde(default)]
    pub environment: IndexMap<String, String>,

    #[serde(default)]
    pub shell: Option<String>,

    #[serde(default)]
    pub working_directory: Option<String>,
}

/// Everything loaded from a project's `.config-kit/` directory.
///
/// The project owns every executor its jobs reference; jobs only hold weak
/// handles, so the project must outlive any generation of its jobs.
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// Executors defined in `executors/*.yaml`, by name.
    pub executors: IndexMap<String, Arc<Executor>>,

    /// Executors referenced by jobs but defined elsewhere.
    pub references: Vec<Arc<Executor>>,

    /// Jobs from `jobs/*.yaml`, in file-name order.
    pub jobs: Vec<AnyJob>,
}

impl ProjectConfig {
    /// A generation context honoring `config.toml`, unless `flatten` overrides it.
    pub fn generate_context(&self, flatten: Option<bool>) -> GenerateContext<'static> {
        GenerateContext::new(flatten.unwrap_or(self.global.flatten))
    }

    /// Generate the full document for every loaded job.
    pub fn render(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        render_document(self.global.version, &self.jobs, ctx)
    }
}
