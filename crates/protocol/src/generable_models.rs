//! The closed set of component tags.
//!
//! Every generable component reports one of these tags so that a downstream
//! assembler can dispatch on the tag instead of inspecting concrete types.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Identifies the variant of a generable component.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "kebab-case")]
pub enum GenerableType {
    Job,
    ParameterizedJob,

    StringParameter,
    BooleanParameter,
    IntegerParameter,
    EnumParameter,
    EnvironmentParameter,
    ParametersList,

    DockerExecutor,
    MachineExecutor,
    MacosExecutor,
    ReusableExecutor,

    Checkout,
    Run,
    SaveCache,
    RestoreCache,
    PersistToWorkspace,
    AttachWorkspace,
    StoreArtifacts,
    StoreTestResults,
}

impl GenerableType {
    /// The kebab-case tag as it appears when serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerableType::Job => "job",
            GenerableType::ParameterizedJob => "parameterized-job",
            GenerableType::StringParameter => "string-parameter",
            GenerableType::BooleanParameter => "boolean-parameter",
            GenerableType::IntegerParameter => "integer-parameter",
            GenerableType::EnumParameter => "enum-parameter",
            GenerableType::EnvironmentParameter => "environment-parameter",
            GenerableType::ParametersList => "parameters-list",
            GenerableType::DockerExecutor => "docker-executor",
            GenerableType::MachineExecutor => "machine-executor",
            GenerableType::MacosExecutor => "macos-executor",
            GenerableType::ReusableExecutor => "reusable-executor",
            GenerableType::Checkout => "checkout",
            GenerableType::Run => "run",
            GenerableType::SaveCache => "save-cache",
            GenerableType::RestoreCache => "restore-cache",
            GenerableType::PersistToWorkspace => "persist-to-workspace",
            GenerableType::AttachWorkspace => "attach-workspace",
            GenerableType::StoreArtifacts => "store-artifacts",
            GenerableType::StoreTestResults => "store-test-results",
        }
    }

    /// Whether this tag belongs to a parameter variant.
    pub fn is_parameter(&self) -> bool {
        matches!(
            self,
            GenerableType::StringParameter
                | GenerableType::BooleanParameter
                | GenerableType::IntegerParameter
                | GenerableType::EnumParameter
                | GenerableType::EnvironmentParameter
        )
    }
}

impl fmt::Display for GenerableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
