//! Project loader for the `.config-kit/` directory structure.
//!
//! This module loads and builds everything under `.config-kit/`:
//! - `config.toml`: Global settings
//! - `executors/*.yaml`: Named executor definitions
//! - `jobs/*.yaml`: Job definitions, plain or parameterized

use crate::commands::Command;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::{ExecutorDefinition, ExecutorReference, JobDefinition, ProjectConfig};
use crate::executors::{DockerExecutor, Executor, MachineExecutor, MacosExecutor, ReusableExecutor};
use crate::jobs::{AnyJob, Job, JobProperties, ParameterizedJob};
use crate::parameters::{CustomParameter, ParametersList};
use ck_protocol::{GlobalConfig, ParameterValue};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Name of the project directory holding all definitions.
pub const CONFIG_DIR: &str = ".config-kit";

/// Loads and builds the project under `root/.config-kit/`.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.config-kit/` folder
///
/// # Returns
///
/// A `ProjectConfig` holding the global settings, the executor registry and
/// the built jobs. If `.config-kit/` or any of its sub-directories is
/// missing, the corresponding part is empty/default rather than an error.
/// Definition files are read in file-name order.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid TOML or YAML syntax
/// - An executor definition names zero or several executor kinds
/// - A job, parameter or step fails validation
///
/// # Example
///
/// ```rust,no_run
/// use ck_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let project = load_config(Path::new(".")).await?;
/// println!("Loaded {} jobs", project.jobs.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<ProjectConfig> {
    let ck_dir = root.join(CONFIG_DIR);

    if !ck_dir.exists() {
        debug!(path = %ck_dir.display(), "No project directory, using defaults");
        return Ok(ProjectConfig::default());
    }

    let global = load_global_config(&ck_dir).await?;
    let executors = load_executors(&ck_dir).await?;

    let mut project = ProjectConfig {
        global,
        executors,
        references: Vec::new(),
        jobs: Vec::new(),
    };
    load_jobs(&ck_dir, &mut project).await?;

    info!(
        executors = project.executors.len(),
        jobs = project.jobs.len(),
        "Loaded project configuration"
    );

    Ok(project)
}

/// Loads global configuration from `config.toml`.
async fn load_global_config(ck_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = ck_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content = read_file(&config_path).await?;

    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: config_path,
        source,
    })
}

/// Loads every executor definition from `executors/*.yaml`.
async fn load_executors(ck_dir: &Path) -> ConfigResult<IndexMap<String, Arc<Executor>>> {
    let mut executors = IndexMap::new();

    for path in yaml_files(&ck_dir.join("executors"))? {
        let definition: ExecutorDefinition = read_yaml(&path).await?;
        let name = definition.name.clone();

        if executors.contains_key(&name) {
            return Err(ConfigError::InvalidConfig {
                path,
                reason: format!("executor {name} is defined more than once"),
            });
        }

        let executor = build_executor(&path, definition)?;
        debug!(executor = %name, path = %path.display(), "Loaded executor");
        executors.insert(name, Arc::new(executor));
    }

    Ok(executors)
}

/// Loads every job definition from `jobs/*.yaml` into `project`.
async fn load_jobs(ck_dir: &Path, project: &mut ProjectConfig) -> ConfigResult<()> {
    for path in yaml_files(&ck_dir.join("jobs"))? {
        let definition: JobDefinition = read_yaml(&path).await?;
        let executor = resolve_executor(&path, &definition.executor, project)?;
        let job = build_job(&path, definition, &executor)?;

        debug!(job = %job.name(), path = %path.display(), "Loaded job");
        project.jobs.push(job);
    }

    Ok(())
}

fn build_executor(path: &Path, definition: ExecutorDefinition) -> ConfigResult<Executor> {
    let ExecutorDefinition {
        name,
        docker,
        machine,
        macos,
        resource_class,
    } = definition;

    let executor = match (docker, machine, macos) {
        (Some(images), None, None) if !images.is_empty() => Executor::Docker(DockerExecutor {
            images,
            resource_class,
        }),
        (None, Some(machine), None) => Executor::Machine(MachineExecutor {
            machine,
            resource_class,
        }),
        (None, None, Some(macos)) => Executor::Macos(MacosExecutor {
            macos,
            resource_class,
        }),
        _ => {
            return Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                reason: format!(
                    "executor {name} must define exactly one of docker (with at least one image), machine or macos"
                ),
            })
        }
    };

    Ok(executor)
}

/// Finds the executor a job refers to, registering external references on
/// the project so they live as long as it does.
fn resolve_executor(
    path: &Path,
    reference: &ExecutorReference,
    project: &mut ProjectConfig,
) -> ConfigResult<Arc<Executor>> {
    let executor = match reference {
        ExecutorReference::Name(name) => {
            if let Some(defined) = project.executors.get(name) {
                return Ok(Arc::clone(defined));
            }
            ReusableExecutor::new(name.clone())
        }
        ExecutorReference::Invocation(arguments) => {
            let mut arguments = arguments.clone();
            let name = match arguments.shift_remove("name") {
                Some(ParameterValue::String(name)) => name,
                _ => {
                    return Err(ConfigError::InvalidConfig {
                        path: path.to_path_buf(),
                        reason: "executor invocation requires a string `name`".to_string(),
                    })
                }
            };
            if project.executors.contains_key(&name) {
                return Err(ConfigError::InvalidConfig {
                    path: path.to_path_buf(),
                    reason: format!("executor {name} does not accept arguments"),
                });
            }
            ReusableExecutor { name, arguments }
        }
    };

    let executor = Arc::new(Executor::Reusable(executor));
    project.references.push(Arc::clone(&executor));
    Ok(executor)
}

fn build_job(
    path: &Path,
    definition: JobDefinition,
    executor: &Arc<Executor>,
) -> ConfigResult<AnyJob> {
    let component_error = |source| ConfigError::InvalidComponent {
        path: path.to_path_buf(),
        source,
    };

    let steps = definition
        .steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            Command::from_value(step)
                .map(Arc::new)
                .map_err(|source| ConfigError::InvalidStep {
                    path: path.to_path_buf(),
                    index,
                    source,
                })
        })
        .collect::<ConfigResult<Vec<_>>>()?;

    let properties = JobProperties {
        parallelism: definition.parallelism,
        environment: definition.environment,
        shell: definition.shell,
        working_directory: definition.working_directory,
    };

    let job = Job::with_properties(definition.name, executor, steps, properties)
        .map_err(component_error)?;

    let Some(declarations) = definition.parameters else {
        return Ok(job.into());
    };

    let parameters = declarations
        .into_iter()
        .map(|(name, contents)| CustomParameter::from_contents(name, contents))
        .collect::<Result<Vec<_>, _>>()
        .and_then(|parameters| ParametersList::from_parameters(parameters))
        .map_err(component_error)?;

    Ok(ParameterizedJob::with_parameters(job, parameters).into())
}

/// Lists `.yaml`/`.yml` files directly inside `dir`, sorted by file name.
fn yaml_files(dir: &Path) -> ConfigResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        let ext = path.extension().and_then(|s| s.to_str());
        if ext != Some("yaml") && ext != Some("yml") {
            warn!(path = %path.display(), "Skipping non-YAML file");
            continue;
        }

        files.push(path.to_path_buf());
    }

    Ok(files)
}

async fn read_file(path: &Path) -> ConfigResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_yaml<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = read_file(path).await?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
        path: path.to_path_buf(),
        source,
    })
}
