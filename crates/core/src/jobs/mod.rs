//! Jobs: ordered steps run inside one executor.
//!
//! - [`job`]: The base [`Job`]
//! - [`parameterized`]: [`ParameterizedJob`], a job plus declared parameters
//! - [`any`]: [`AnyJob`], the tagged union of both

pub mod any;
pub mod job;
pub mod parameterized;

pub use any::AnyJob;
pub use job::{Job, JobProperties};
pub use parameterized::ParameterizedJob;
