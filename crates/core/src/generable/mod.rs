//! The generation protocol shared by every component.
//!
//! A component turns itself into a nested [`serde_yaml::Value`] through
//! [`Generable::generate_contents`] (its inner fields) or
//! [`Generable::generate`] (the contents wrapped in whatever key the target
//! schema expects at that nesting level). Both are pure reads: calling them
//! twice on an unchanged graph yields equal mappings.

pub mod context;

pub use context::GenerateContext;

use crate::error::GenerateResult;
use ck_protocol::GenerableType;
use serde_yaml::Value;

/// A component that can produce its own mapping representation.
pub trait Generable {
    /// The tag identifying this component's variant.
    fn generable_type(&self) -> GenerableType;

    /// Generate the component's inner shape, without its wrapping key.
    fn generate_contents(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value>;

    /// Generate the component as placed into its parent mapping.
    ///
    /// Components with no wrapping key of their own use the contents as is.
    fn generate(&self, ctx: &GenerateContext<'_>) -> GenerateResult<Value> {
        self.generate_contents(ctx)
    }
}

/// A string mapping key.
pub(crate) fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

/// Wraps `contents` in a single-entry mapping keyed by `name`.
pub(crate) fn keyed(name: &str, contents: Value) -> Value {
    let mut mapping = serde_yaml::Mapping::new();
    mapping.insert(key(name), contents);
    Value::Mapping(mapping)
}
