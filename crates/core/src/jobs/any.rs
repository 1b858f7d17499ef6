//! Either kind of job behind one type.

use super::job::Job;
use super::parameterized::ParameterizedJob;
use crate::error::GenerateResult;
use crate::generable::{Generable, GenerateContext};
use ck_protocol::GenerableType;
use serde_yaml::Value;

/// A plain or parameterized job.
///
/// Lets a caller hold a heterogeneous list of jobs and generate them
/// uniformly; [`Generable::generable_type`] reports which one it is.
#[derive(Debug, Clone)]
pub enum AnyJob {
    Job(Job),
    Parameterized(ParameterizedJob),
}

impl AnyJob {
    pub fn name(&self) -> &str {
        match self {
            AnyJob::Job(job) => job.name(),
            AnyJob::Parameterized(job) => job.name(),
        }
    }

    /// The underlying base job.
    pub fn job(&self) -> &Job {
        match self {
            AnyJob::Job(job) => job,
            AnyJob::Parameterized(job) => job.job(),
        }
    }

    pub fn as_parameterized(&self) -> Option<&ParameterizedJob> {
        match self {
            AnyJob::Parameterized(job) => Some(job),
            AnyJob::Job(_) => None,
        }
    }
}

impl From<Job> for AnyJob {
    fn from(job: Job) -> Self {
        AnyJob::Job(job)
    }
}

impl From<ParameterizedJob> for AnyJob {
    fn from(job: ParameterizedJob) -> Self {
        AnyJob::Parameterized(job)
    }
}

impl Generable for AnyJob {
    fn generable_type(&self) -> GenerableType {
        match self {
            AnyJob::Job(job) => job.generable_type(),
            AnyJob::Parameterized(job) => job.generable_type(),
        }
    }

    fn generate_contents(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        match self {
            AnyJob::Job(job) => job.generate_contents(ctx),
            AnyJob::Parameterized(job) => job.generate_contents(ctx),
        }
    }

    fn generate(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        match self {
            AnyJob::Job(job) => job.generate(ctx),
            AnyJob::Parameterized(job) => job.generate(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executors::Executor;
    use std::sync::Arc;

    #[test]
    fn test_dispatch_by_tag() {
        let executor = Arc::new(Executor::reusable("default"));
        let jobs: Vec<AnyJob> = vec![
            Job::new("plain", &executor).unwrap().into(),
            ParameterizedJob::new("reusable", &executor).unwrap().into(),
        ];

        let tags: Vec<GenerableType> = jobs.iter().map(Generable::generable_type).collect();
        assert_eq!(tags, vec![GenerableType::Job, GenerableType::ParameterizedJob]);

        assert!(jobs[0].as_parameterized().is_none());
        assert_eq!(jobs[1].as_parameterized().map(|j| j.name()), Some("reusable"));
        assert_eq!(jobs[1].job().name(), "reusable");
    }
}
