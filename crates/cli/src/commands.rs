//! Subcommand handlers.

use ck_core::config::loader::load_config;
use ck_core::config::models::ProjectConfig;
use ck_core::document::to_yaml;
use ck_core::generable::GenerateContext;
use ck_protocol::ParameterValue;
use clap::Subcommand;
use color_eyre::eyre::{Result, WrapErr};
use colored::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the jobs document
    Generate {
        /// Project root containing `.config-kit/`
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Resolve parameters instead of emitting them
        #[arg(long)]
        flatten: bool,

        /// Parameter override used while flattening, as NAME=VALUE
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_override)]
        overrides: Vec<(String, ParameterValue)>,

        /// Write the document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build and generate every job without printing the document
    Check {
        /// Project root containing `.config-kit/`
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

pub async fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Generate {
            root,
            flatten,
            overrides,
            output,
        } => generate(&root, flatten, overrides, output.as_deref()).await,
        Commands::Check { root } => check(&root).await,
    }
}

async fn generate(
    root: &Path,
    flatten: bool,
    overrides: Vec<(String, ParameterValue)>,
    output: Option<&Path>,
) -> Result<()> {
    let project = load_project(root).await?;

    // --flatten only ever turns flattening on
    let mut ctx = project.generate_context(flatten.then_some(true));
    if !ctx.is_flatten() && !overrides.is_empty() {
        warn!(
            overrides = overrides.len(),
            "--set is ignored unless the document is flattened; pass --flatten or set flatten in config.toml"
        );
    }
    for (name, value) in overrides {
        ctx = ctx.with_override(name, value);
    }

    let document = project
        .render(&ctx)
        .wrap_err("Failed to generate jobs document")?;
    let yaml = to_yaml(&document)?;

    match output {
        Some(path) => {
            tokio::fs::write(path, yaml)
                .await
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} {} jobs to {}",
                "Generated".green().bold(),
                project.jobs.len(),
                path.display()
            );
        }
        None => print!("{yaml}"),
    }

    Ok(())
}

async fn check(root: &Path) -> Result<()> {
    let project = load_project(root).await?;

    // Templated and flattened output fail in different ways; check both.
    project
        .render(&GenerateContext::templated())
        .wrap_err("Failed to generate jobs document")?;
    project
        .render(&project.generate_context(None))
        .wrap_err("Failed to generate jobs document")?;

    println!(
        "{} {} jobs, {} executors",
        "OK".green().bold(),
        project.jobs.len(),
        project.executors.len()
    );
    Ok(())
}

async fn load_project(root: &Path) -> Result<ProjectConfig> {
    let project = load_config(root)
        .await
        .wrap_err_with(|| format!("Failed to load project at {}", root.display()))?;
    info!(root = %root.display(), jobs = project.jobs.len(), "Project loaded");
    Ok(project)
}

/// Parse `NAME=VALUE`, reading VALUE as a YAML scalar: `true` is a boolean,
/// `3` an integer, and anything that is not a boolean or integer a string.
fn parse_override(raw: &str) -> Result<(String, ParameterValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    if name.is_empty() {
        return Err(format!("missing parameter name in `{raw}`"));
    }

    let value = serde_yaml::from_str::<ParameterValue>(value)
        .unwrap_or_else(|_| ParameterValue::String(value.to_string()));

    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override_types() {
        assert_eq!(
            parse_override("env=prod").unwrap(),
            ("env".to_string(), ParameterValue::String("prod".to_string()))
        );
        assert_eq!(
            parse_override("dry_run=true").unwrap().1,
            ParameterValue::Boolean(true)
        );
        assert_eq!(
            parse_override("retries=-3").unwrap().1,
            ParameterValue::Integer(-3)
        );
        assert_eq!(
            parse_override("tag=v1=final").unwrap().1,
            ParameterValue::String("v1=final".to_string())
        );
    }

    #[test]
    fn test_parse_override_reads_yaml_scalars() {
        assert_eq!(
            parse_override("dry_run=True").unwrap().1,
            ParameterValue::Boolean(true)
        );
        assert_eq!(
            parse_override("tag='42'").unwrap().1,
            ParameterValue::String("42".to_string())
        );
        assert_eq!(
            parse_override("empty=~").unwrap().1,
            ParameterValue::String("~".to_string())
        );
        assert_eq!(
            parse_override("ratio=1.5").unwrap().1,
            ParameterValue::String("1.5".to_string())
        );
    }

    #[test]
    fn test_parse_override_rejects_malformed() {
        assert!(parse_override("env").is_err());
        assert!(parse_override("=prod").is_err());
    }
}
