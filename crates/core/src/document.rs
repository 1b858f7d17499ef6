//! Assembling generated jobs into one document and rendering it as YAML.

use crate::error::{GenerateError, GenerateResult};
use crate::generable::{key, Generable, GenerateContext};
use crate::jobs::AnyJob;
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Builds `{ version, jobs: { <name>: <contents>, ... } }`, jobs in order.
///
/// # Errors
///
/// Returns `DuplicateJob` if two jobs share a name, or any error raised
/// while generating an individual job.
pub fn render_document(
    version: f64,
    jobs: &[AnyJob],
    ctx: &GenerateContext<'_>,
) -> GenerateResult<Value> {
    let mut generated = Mapping::with_capacity(jobs.len());
    for job in jobs {
        let name = key(job.name());
        if generated.contains_key(&name) {
            return Err(GenerateError::DuplicateJob {
                name: job.name().to_string(),
            });
        }
        generated.insert(name, job.generate_contents(ctx)?);
    }

    debug!(jobs = generated.len(), flatten = ctx.is_flatten(), "Rendered document");

    let mut document = Mapping::new();
    document.insert(key("version"), Value::Number(version.into()));
    document.insert(key("jobs"), Value::Mapping(generated));
    Ok(Value::Mapping(document))
}

/// Serializes a generated value as YAML text.
pub fn to_yaml(value: &Value) -> GenerateResult<String> {
    serde_yaml::to_string(value).map_err(|source| GenerateError::Serialize {
        component: "document",
        source,
    })
}
