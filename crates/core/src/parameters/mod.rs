//! Typed parameters a component can declare.
//!
//! - [`parameter`]: A single declared parameter and its construction rules
//! - [`list`]: The ordered, name-unique collection owned by one component
//! - [`template`]: The `<< parameters.NAME >>` placeholder syntax

pub mod list;
pub mod parameter;
pub mod template;

pub use list::ParametersList;
pub use parameter::CustomParameter;
