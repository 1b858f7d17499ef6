//! Integration tests for loading a project and rendering its document.
//!
//! These tests verify that a `.config-kit/` project:
//! - Loads executors and jobs in file-name order
//! - Renders templated output with parameters and placeholders kept
//! - Renders flattened output with every placeholder resolved
//! - Reports unresolvable references instead of emitting them

mod common;

use ck_core::config::loader::load_config;
use ck_core::document::to_yaml;
use ck_core::error::{ComponentError, GenerateError};
use ck_core::generable::{Generable, GenerateContext};
use ck_protocol::GenerableType;
use common::*;
use serde_yaml::Value;

fn string(text: &str) -> Value {
    Value::String(text.to_string())
}

#[tokio::test]
async fn test_flattened_document_snapshot() {
    let project_dir = create_test_project(true).expect("Failed to create test project");
    let project = load_config(project_dir.path())
        .await
        .expect("Failed to load config");

    let document = project
        .render(&project.generate_context(None))
        .expect("Failed to render document");
    assert_fully_resolved(&document);

    let yaml = to_yaml(&document).expect("Failed to serialize document");
    insta::assert_snapshot!(yaml, @r###"
    version: 2.1
    jobs:
      build:
        docker:
        - image: cimg/base
        resource_class: large
        steps:
        - checkout
        - run:
            command: npm test
        parallelism: 2
      deploy:
        docker:
        - image: cimg/base
        resource_class: large
        steps:
        - checkout
        - run:
            command: ./deploy.sh staging --retries 2
            name: Deploy
        environment:
          TARGET: staging
    "###);
}

#[tokio::test]
async fn test_templated_document_keeps_parameters() {
    let project_dir = create_test_project(false).expect("Failed to create test project");
    let project = load_config(project_dir.path())
        .await
        .expect("Failed to load config");

    let document = project
        .render(&project.generate_context(None))
        .expect("Failed to render document");

    assert_keys(&document, &["version", "jobs"]);
    assert_keys(&document["jobs"], &["build", "deploy"]);

    let deploy = &document["jobs"]["deploy"];
    assert_keys(
        deploy,
        &["docker", "resource_class", "steps", "environment", "parameters"],
    );
    assert_eq!(
        deploy["steps"][1]["run"]["command"],
        string("./deploy.sh << parameters.env >> --retries << parameters.retries >>")
    );
    assert_eq!(deploy["environment"]["TARGET"], string("<< parameters.env >>"));

    assert_keys(&deploy["parameters"], &["env", "retries"]);
    assert_keys(
        &deploy["parameters"]["env"],
        &["type", "default", "description", "enum"],
    );
    assert_eq!(deploy["parameters"]["retries"]["default"], Value::Number(2.into()));
}

#[tokio::test]
async fn test_flatten_flag_overrides_config() {
    let project_dir = create_test_project(false).expect("Failed to create test project");
    let project = load_config(project_dir.path())
        .await
        .expect("Failed to load config");

    let document = project
        .render(&project.generate_context(Some(true)))
        .expect("Failed to render document");

    assert!(document["jobs"]["deploy"].get("parameters").is_none());
    assert_fully_resolved(&document);
}

#[tokio::test]
async fn test_overrides_take_precedence_over_defaults() {
    let project_dir = create_test_project(true).expect("Failed to create test project");
    let project = load_config(project_dir.path())
        .await
        .expect("Failed to load config");

    let ctx = project
        .generate_context(None)
        .with_override("env", "prod")
        .with_override("retries", 5i64);
    let deploy = project.jobs[1]
        .generate_contents(&ctx)
        .expect("Failed to generate deploy");

    assert_eq!(
        deploy["steps"][1]["run"]["command"],
        string("./deploy.sh prod --retries 5")
    );
    assert_eq!(deploy["environment"]["TARGET"], string("prod"));
}

#[tokio::test]
async fn test_overrides_outside_the_declared_type_or_set_are_rejected() {
    let project_dir = create_test_project(true).expect("Failed to create test project");
    let project = load_config(project_dir.path())
        .await
        .expect("Failed to load config");

    let ctx = project.generate_context(None).with_override("env", "dev");
    let err = project.render(&ctx).expect_err("dev is not an allowed env");
    assert!(matches!(
        err,
        GenerateError::InvalidOverride {
            ref reference,
            source: ComponentError::InvalidEnumDefault { .. },
        } if reference == "env"
    ));

    let ctx = project.generate_context(None).with_override("retries", "lots");
    let err = project.render(&ctx).expect_err("retries is an integer");
    assert!(matches!(
        err,
        GenerateError::InvalidOverride {
            source: ComponentError::TypeMismatch { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_whole_placeholder_arguments_keep_their_type() {
    let project_dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_config_file(
        project_dir.path(),
        "jobs/test.yaml",
        r#"
name: test
executor:
  name: node/default
  cache: "<< parameters.cache >>"
  tag: "v<< parameters.cache >>"
parameters:
  cache:
    type: boolean
    default: true
steps:
  - checkout
"#,
    )
    .expect("Failed to write job");

    let project = load_config(project_dir.path())
        .await
        .expect("Failed to load config");

    let flattened = project.jobs[0]
        .generate_contents(&GenerateContext::flattened())
        .expect("Failed to generate");
    assert_eq!(flattened["executor"]["cache"], Value::Bool(true));
    assert_eq!(flattened["executor"]["tag"], string("vtrue"));

    let templated = project.jobs[0]
        .generate_contents(&GenerateContext::templated())
        .expect("Failed to generate");
    assert_eq!(templated["executor"]["cache"], string("<< parameters.cache >>"));
}

#[tokio::test]
async fn test_required_parameter_without_override_fails_when_flattened() {
    let project_dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_config_file(
        project_dir.path(),
        "jobs/release.yaml",
        r#"
name: release
executor: docker/node
parameters:
  tag:
    type: string
steps:
  - run:
      command: git tag << parameters.tag >>
"#,
    )
    .expect("Failed to write job");

    let project = load_config(project_dir.path())
        .await
        .expect("Failed to load config");
    let release = &project.jobs[0];
    assert_eq!(release.generable_type(), GenerableType::ParameterizedJob);

    let err = release
        .generate_contents(&GenerateContext::flattened())
        .expect_err("Required parameter has no value");
    assert!(matches!(
        err,
        GenerateError::UnresolvedParameterReference { ref reference, .. } if reference == "tag"
    ));

    let templated = release
        .generate_contents(&GenerateContext::templated())
        .expect("Templated output keeps the placeholder");
    assert_eq!(templated["executor"], string("docker/node"));
    assert_eq!(
        templated["steps"][0]["run"]["command"],
        string("git tag << parameters.tag >>")
    );
}

#[tokio::test]
async fn test_undeclared_reference_fails_even_with_override() {
    let project_dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_config_file(
        project_dir.path(),
        "jobs/lint.yaml",
        r#"
name: lint
executor: docker/node
parameters:
  fix:
    type: boolean
    default: false
steps:
  - run:
      command: npm run lint -- --max-warnings << parameters.limit >>
"#,
    )
    .expect("Failed to write job");

    let project = load_config(project_dir.path())
        .await
        .expect("Failed to load config");

    let ctx = GenerateContext::flattened().with_override("limit", 0i64);
    let err = project
        .render(&ctx)
        .expect_err("limit is not a declared parameter");
    assert!(matches!(
        err,
        GenerateError::UnresolvedParameterReference { ref reference, .. } if reference == "limit"
    ));
}

#[tokio::test]
async fn test_duplicate_job_names_are_rejected() {
    let project_dir = create_test_project(true).expect("Failed to create test project");
    write_config_file(project_dir.path(), "jobs/zz-build.yaml", JOB_BUILD)
        .expect("Failed to write job");

    let project = load_config(project_dir.path())
        .await
        .expect("Loading allows duplicates; rendering does not");

    let err = project
        .render(&project.generate_context(None))
        .expect_err("Two jobs are named build");
    assert!(matches!(err, GenerateError::DuplicateJob { ref name } if name == "build"));
}

#[tokio::test]
async fn test_rendering_is_repeatable() {
    let project_dir = create_test_project(false).expect("Failed to create test project");
    let project = load_config(project_dir.path())
        .await
        .expect("Failed to load config");

    let ctx = project.generate_context(None);
    let first = project.render(&ctx).expect("Failed to render");
    let second = project.render(&ctx).expect("Failed to render");

    assert_eq!(
        to_yaml(&first).expect("Failed to serialize"),
        to_yaml(&second).expect("Failed to serialize")
    );
}
