//! Steps that make up a job.
//!
//! Each [`Command`] generates as a single-entry mapping keyed by its kind
//! (`{ run: { command: ... } }`). A step whose parameters are all unset
//! collapses to its bare kind name, so a plain checkout is emitted as
//! `checkout`. In flatten mode every string inside a step is passed through
//! placeholder resolution before it is emitted.

use crate::error::{GenerateError, GenerateResult};
use crate::generable::{keyed, Generable, GenerateContext};
use ck_protocol::GenerableType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;

/// Errors raised while reading a step from its mapping form.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("Unknown step kind {kind:?}")]
    UnknownKind { kind: String },

    #[error("Malformed step: {reason}")]
    Malformed { reason: String },

    #[error("Invalid parameters for {kind} step: {source}")]
    Parameters {
        kind: &'static str,
        source: serde_yaml::Error,
    },
}

/// When a step runs relative to the outcome of the previous steps.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepWhen {
    Always,
    OnSuccess,
    OnFail,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CheckoutParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Parameters of a `run` step.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RunParameters {
    /// Shell command to execute.
    pub command: String,

    /// Title shown for the step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub environment: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,

    /// Elapsed time without output before the step is killed, e.g. `10m`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_output_timeout: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<StepWhen>,
}

impl RunParameters {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(name.into(), value.into());
        self
    }

    pub fn with_working_directory(mut self, path: impl Into<String>) -> Self {
        self.working_directory = Some(path.into());
        self
    }

    pub fn with_when(mut self, when: StepWhen) -> Self {
        self.when = Some(when);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SaveCacheParameters {
    pub key: String,
    pub paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<StepWhen>,
}

/// Parameters of a `restore_cache` step. Keys are tried in order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RestoreCacheParameters {
    pub keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PersistToWorkspaceParameters {
    pub root: String,
    pub paths: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AttachWorkspaceParameters {
    pub at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreArtifactsParameters {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreTestResultsParameters {
    pub path: String,
}

/// A single step of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Checkout(CheckoutParameters),
    Run(RunParameters),
    SaveCache(SaveCacheParameters),
    RestoreCache(RestoreCacheParameters),
    PersistToWorkspace(PersistToWorkspaceParameters),
    AttachWorkspace(AttachWorkspaceParameters),
    StoreArtifacts(StoreArtifactsParameters),
    StoreTestResults(StoreTestResultsParameters),
}

impl Command {
    /// Check out the project source into the working directory.
    pub fn checkout() -> Self {
        Command::Checkout(CheckoutParameters::default())
    }

    /// Run a shell command.
    pub fn run(command: impl Into<String>) -> Self {
        Command::Run(RunParameters::new(command))
    }

    /// The key this step is emitted under.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Checkout(_) => "checkout",
            Command::Run(_) => "run",
            Command::SaveCache(_) => "save_cache",
            Command::RestoreCache(_) => "restore_cache",
            Command::PersistToWorkspace(_) => "persist_to_workspace",
            Command::AttachWorkspace(_) => "attach_workspace",
            Command::StoreArtifacts(_) => "store_artifacts",
            Command::StoreTestResults(_) => "store_test_results",
        }
    }

    /// Read a step from the shape it is emitted as: either a bare kind name
    /// (`checkout`) or a single-entry mapping (`{ run: { command: ... } }`).
    ///
    /// # Errors
    ///
    /// Returns `StepError` if the value has neither shape, names an unknown
    /// kind, or carries parameters the kind does not accept.
    pub fn from_value(value: Value) -> Result<Self, StepError> {
        let (kind, parameters) = match value {
            Value::String(kind) => (kind, Value::Mapping(serde_yaml::Mapping::new())),
            Value::Mapping(mapping) if mapping.len() == 1 => {
                let Some((key, parameters)) = mapping.into_iter().next() else {
                    return Err(StepError::Malformed {
                        reason: "empty step mapping".to_string(),
                    });
                };
                let Value::String(kind) = key else {
                    return Err(StepError::Malformed {
                        reason: "step kind must be a string".to_string(),
                    });
                };
                (kind, parameters)
            }
            _ => {
                return Err(StepError::Malformed {
                    reason: "expected a step name or a single-key mapping".to_string(),
                })
            }
        };

        match kind.as_str() {
            "checkout" => parse("checkout", parameters).map(Command::Checkout),
            "run" => parse("run", parameters).map(Command::Run),
            "save_cache" => parse("save_cache", parameters).map(Command::SaveCache),
            "restore_cache" => parse("restore_cache", parameters).map(Command::RestoreCache),
            "persist_to_workspace" => {
                parse("persist_to_workspace", parameters).map(Command::PersistToWorkspace)
            }
            "attach_workspace" => parse("attach_workspace", parameters).map(Command::AttachWorkspace),
            "store_artifacts" => parse("store_artifacts", parameters).map(Command::StoreArtifacts),
            "store_test_results" => {
                parse("store_test_results", parameters).map(Command::StoreTestResults)
            }
            _ => Err(StepError::UnknownKind { kind }),
        }
    }

    fn parameters_value(&self) -> Result<Value, serde_yaml::Error> {
        match self {
            Command::Checkout(p) => serde_yaml::to_value(p),
            Command::Run(p) => serde_yaml::to_value(p),
            Command::SaveCache(p) => serde_yaml::to_value(p),
            Command::RestoreCache(p) => serde_yaml::to_value(p),
            Command::PersistToWorkspace(p) => serde_yaml::to_value(p),
            Command::AttachWorkspace(p) => serde_yaml::to_value(p),
            Command::StoreArtifacts(p) => serde_yaml::to_value(p),
            Command::StoreTestResults(p) => serde_yaml::to_value(p),
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(
    kind: &'static str,
    parameters: Value,
) -> Result<T, StepError> {
    // `checkout:` with no body parses as null
    let parameters = match parameters {
        Value::Null => Value::Mapping(serde_yaml::Mapping::new()),
        other => other,
    };
    serde_yaml::from_value(parameters).map_err(|source| StepError::Parameters { kind, source })
}

impl Generable for Command {
    fn generable_type(&self) -> GenerableType {
        match self {
            Command::Checkout(_) => GenerableType::Checkout,
            Command::Run(_) => GenerableType::Run,
            Command::SaveCache(_) => GenerableType::SaveCache,
            Command::RestoreCache(_) => GenerableType::RestoreCache,
            Command::PersistToWorkspace(_) => GenerableType::PersistToWorkspace,
            Command::AttachWorkspace(_) => GenerableType::AttachWorkspace,
            Command::StoreArtifacts(_) => GenerableType::StoreArtifacts,
            Command::StoreTestResults(_) => GenerableType::StoreTestResults,
        }
    }

    fn generate_contents(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        let parameters = self
            .parameters_value()
            .map_err(|source| GenerateError::Serialize {
                component: self.generable_type().as_str(),
                source,
            })?;

        let contents = match parameters {
            Value::Mapping(mapping) if mapping.is_empty() => Value::String(self.kind().to_string()),
            parameters => keyed(self.kind(), parameters),
        };

        ctx.resolve_value(contents)
    }
}

impl From<RunParameters> for Command {
    fn from(parameters: RunParameters) -> Self {
        Command::Run(parameters)
    }
}
