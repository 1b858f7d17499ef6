//! Execution environments a job runs in.
//!
//! An [`Executor`] is constructed once and shared: jobs hold a non-owning
//! handle to it, so the executor's lifetime is controlled by whoever
//! registered it (usually a [`crate::config::models::ProjectConfig`]).
//!
//! Generation produces the fragment a job splices into its own contents:
//!
//! | Executor | Fragment |
//! |----------|----------|
//! | docker | `docker: [{image, ...}]`, `resource_class?` |
//! | machine | `machine: {image, ...}`, `resource_class?` |
//! | macos | `macos: {xcode}`, `resource_class?` |
//! | reusable | `executor: name` or `executor: {name, arg: value, ...}` |

use crate::error::{GenerateError, GenerateResult};
use crate::generable::{key, Generable, GenerateContext};
use ck_protocol::{GenerableType, ParameterValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// One container image of a docker executor. The first image is primary.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DockerImage {
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub environment: IndexMap<String, String>,
}

impl DockerImage {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerExecutor {
    pub images: Vec<DockerImage>,
    pub resource_class: Option<String>,
}

impl DockerExecutor {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            images: vec![DockerImage::new(image)],
            resource_class: None,
        }
    }

    /// Add a service container alongside the primary image.
    pub fn with_service(mut self, image: DockerImage) -> Self {
        self.images.push(image);
        self
    }
}

/// Machine image settings.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MachineParameters {
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_layer_caching: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineExecutor {
    pub machine: MachineParameters,
    pub resource_class: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MacosParameters {
    pub xcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacosExecutor {
    pub macos: MacosParameters,
    pub resource_class: Option<String>,
}

/// A reference, by name, to an executor declared elsewhere (for example in
/// an orb), with optional arguments for its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReusableExecutor {
    pub name: String,
    pub arguments: IndexMap<String, ParameterValue>,
}

impl ReusableExecutor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: IndexMap::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executor {
    Docker(DockerExecutor),
    Machine(MachineExecutor),
    Macos(MacosExecutor),
    Reusable(ReusableExecutor),
}

impl Executor {
    pub fn docker(image: impl Into<String>) -> Self {
        Executor::Docker(DockerExecutor::new(image))
    }

    pub fn machine(image: impl Into<String>) -> Self {
        Executor::Machine(MachineExecutor {
            machine: MachineParameters {
                image: image.into(),
                docker_layer_caching: None,
            },
            resource_class: None,
        })
    }

    pub fn macos(xcode: impl Into<String>) -> Self {
        Executor::Macos(MacosExecutor {
            macos: MacosParameters {
                xcode: xcode.into(),
            },
            resource_class: None,
        })
    }

    pub fn reusable(name: impl Into<String>) -> Self {
        Executor::Reusable(ReusableExecutor::new(name))
    }

    /// Set the resource class. Reusable executors carry their own and ignore it.
    pub fn with_resource_class(mut self, class: impl Into<String>) -> Self {
        let class = Some(class.into());
        match &mut self {
            Executor::Docker(e) => e.resource_class = class,
            Executor::Machine(e) => e.resource_class = class,
            Executor::Macos(e) => e.resource_class = class,
            Executor::Reusable(_) => {}
        }
        self
    }

    pub fn resource_class(&self) -> Option<&str> {
        match self {
            Executor::Docker(e) => e.resource_class.as_deref(),
            Executor::Machine(e) => e.resource_class.as_deref(),
            Executor::Macos(e) => e.resource_class.as_deref(),
            Executor::Reusable(_) => None,
        }
    }

    /// The mapping entries a job splices into its own contents.
    pub fn fragment(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Mapping> {
        let mut fragment = Mapping::new();

        match self {
            Executor::Docker(e) => {
                fragment.insert(key("docker"), self.to_value(&e.images)?);
            }
            Executor::Machine(e) => {
                fragment.insert(key("machine"), self.to_value(&e.machine)?);
            }
            Executor::Macos(e) => {
                fragment.insert(key("macos"), self.to_value(&e.macos)?);
            }
            Executor::Reusable(e) if e.arguments.is_empty() => {
                fragment.insert(key("executor"), Value::String(e.name.clone()));
            }
            Executor::Reusable(e) => {
                let mut reference = Mapping::with_capacity(e.arguments.len() + 1);
                reference.insert(key("name"), Value::String(e.name.clone()));
                for (name, value) in &e.arguments {
                    reference.insert(key(name), self.to_value(value)?);
                }
                fragment.insert(key("executor"), Value::Mapping(reference));
            }
        }

        if let Some(class) = self.resource_class() {
            fragment.insert(key("resource_class"), Value::String(class.to_string()));
        }

        let mut resolved = Mapping::with_capacity(fragment.len());
        for (name, value) in fragment {
            resolved.insert(name, ctx.resolve_value(value)?);
        }
        Ok(resolved)
    }

    fn to_value<T: Serialize>(&self, value: &T) -> GenerateResult<Value> {
        serde_yaml::to_value(value).map_err(|source| GenerateError::Serialize {
            component: self.generable_type().as_str(),
            source,
        })
    }
}

impl Generable for Executor {
    fn generable_type(&self) -> GenerableType {
        match self {
            Executor::Docker(_) => GenerableType::DockerExecutor,
            Executor::Machine(_) => GenerableType::MachineExecutor,
            Executor::Macos(_) => GenerableType::MacosExecutor,
            Executor::Reusable(_) => GenerableType::ReusableExecutor,
        }
    }

    fn generate_contents(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        self.fragment(ctx).map(Value::Mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).expect("Invalid YAML in test")
    }

    fn generate(executor: &Executor) -> Value {
        executor
            .generate_contents(&GenerateContext::templated())
            .expect("Failed to generate executor")
    }

    #[test]
    fn test_reusable_reference_by_name() {
        let executor = Executor::reusable("docker/node");
        assert_eq!(generate(&executor), yaml("executor: docker/node"));
        assert_eq!(executor.generable_type(), GenerableType::ReusableExecutor);
    }

    #[test]
    fn test_reusable_reference_with_arguments() {
        let executor = Executor::Reusable(
            ReusableExecutor::new("node/default")
                .with_argument("tag", "20.5")
                .with_argument("parallel", true),
        );
        assert_eq!(
            generate(&executor),
            yaml("executor:\n  name: node/default\n  tag: '20.5'\n  parallel: true")
        );
    }

    #[test]
    fn test_docker_executor_fragment() {
        let executor = Executor::Docker(
            DockerExecutor::new("cimg/node:20.5").with_service(DockerImage {
                environment: IndexMap::from([("POSTGRES_USER".to_string(), "ci".to_string())]),
                ..DockerImage::new("cimg/postgres:15.0")
            }),
        )
        .with_resource_class("large");

        assert_eq!(
            generate(&executor),
            yaml(
                "docker:\n  - image: cimg/node:20.5\n  - image: cimg/postgres:15.0\n    environment:\n      POSTGRES_USER: ci\nresource_class: large"
            )
        );
    }

    #[test]
    fn test_machine_and_macos_fragments() {
        let machine = Executor::machine("ubuntu-2204:current");
        assert_eq!(generate(&machine), yaml("machine:\n  image: ubuntu-2204:current"));

        let macos = Executor::macos("15.0.0").with_resource_class("macos.m1.medium.gen1");
        assert_eq!(
            generate(&macos),
            yaml("macos:\n  xcode: 15.0.0\nresource_class: macos.m1.medium.gen1")
        );
        assert_eq!(macos.generable_type(), GenerableType::MacosExecutor);
    }

    #[test]
    fn test_reusable_ignores_resource_class() {
        let executor = Executor::reusable("default").with_resource_class("large");
        assert_eq!(executor.resource_class(), None);
        assert_eq!(generate(&executor), yaml("executor: default"));
    }
}
