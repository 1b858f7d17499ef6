//! Test fixtures for creating sample projects.

use std::path::Path;
use tempfile::TempDir;

pub const EXECUTOR_NODE: &str = r#"
name: node
docker:
  - image: cimg/base
resource_class: large
"#;

pub const JOB_BUILD: &str = r#"
name: build
executor: node
steps:
  - checkout
  - run:
      command: npm test
parallelism: 2
"#;

pub const JOB_DEPLOY: &str = r#"
name: deploy
executor: node
parameters:
  env:
    type: enum
    default: staging
    description: target env
    enum: [staging, prod]
  retries:
    type: integer
    default: 2
environment:
  TARGET: "<< parameters.env >>"
steps:
  - checkout
  - run:
      name: Deploy
      command: ./deploy.sh << parameters.env >> --retries << parameters.retries >>
"#;

/// Create a temporary project directory with a `.config-kit` configuration.
///
/// This creates a complete test environment with:
/// - `.config-kit/config.toml`
/// - `.config-kit/executors/node.yaml`
/// - `.config-kit/jobs/build.yaml` and `.config-kit/jobs/deploy.yaml`
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_test_project(flatten: bool) -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();

    write_config_file(root, "config.toml", &format!("version = 2.1\nflatten = {flatten}\n"))?;
    write_config_file(root, "executors/node.yaml", EXECUTOR_NODE)?;
    write_config_file(root, "jobs/build.yaml", JOB_BUILD)?;
    write_config_file(root, "jobs/deploy.yaml", JOB_DEPLOY)?;

    Ok(temp_dir)
}

/// Write `content` to `root/.config-kit/<relative>`, creating directories.
#[allow(dead_code)]
pub fn write_config_file(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
    let path = root.join(".config-kit").join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}
