//! The placeholder syntax used to reference a parameter from inside a step,
//! an executor argument, or a job field.
//!
//! A placeholder is written `<< parameters.NAME >>`; the whitespace inside
//! the brackets is optional. Other bracketed expressions (for example
//! `<< pipeline.number >>`) are not parameter references and are left alone.

use crate::error::GenerateResult;
use std::borrow::Cow;

const OPEN: &str = "<<";
const CLOSE: &str = ">>";
const PREFIX: &str = "parameters.";

/// One parameter reference found in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Byte offset of the opening `<<`.
    pub start: usize,
    /// Byte offset just past the closing `>>`.
    pub end: usize,
    /// The referenced parameter name.
    pub name: &'a str,
}

/// Finds every parameter placeholder in `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<Placeholder<'_>> {
    let mut found = Vec::new();
    let mut offset = 0;

    while let Some(relative) = text[offset..].find(OPEN) {
        let start = offset + relative;
        let inner_start = start + OPEN.len();
        let Some(inner_len) = text[inner_start..].find(CLOSE) else {
            break;
        };
        let end = inner_start + inner_len + CLOSE.len();

        let inner = text[inner_start..inner_start + inner_len].trim();
        match inner.strip_prefix(PREFIX) {
            Some(name) if is_reference_name(name) => {
                found.push(Placeholder { start, end, name });
                offset = end;
            }
            _ => offset = inner_start,
        }
    }

    found
}

/// Names of the parameters referenced by `text`, in order of appearance.
pub fn references(text: &str) -> Vec<&str> {
    placeholders(text).into_iter().map(|p| p.name).collect()
}

/// The parameter referenced when `text`, ignoring surrounding whitespace,
/// is exactly one placeholder.
pub fn sole_reference(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    match placeholders(trimmed).as_slice() {
        [only] if only.start == 0 && only.end == trimmed.len() => Some(only.name),
        _ => None,
    }
}

/// Replaces every placeholder in `text` with the value `lookup` returns for
/// its name. Text without placeholders is returned borrowed.
pub fn substitute<'s, F>(text: &'s str, mut lookup: F) -> GenerateResult<Cow<'s, str>>
where
    F: FnMut(&str) -> GenerateResult<String>,
{
    let found = placeholders(text);
    if found.is_empty() {
        return Ok(Cow::Borrowed(text));
    }

    let mut resolved = String::with_capacity(text.len());
    let mut last = 0;
    for placeholder in found {
        resolved.push_str(&text[last..placeholder.start]);
        resolved.push_str(&lookup(placeholder.name)?);
        last = placeholder.end;
    }
    resolved.push_str(&text[last..]);

    Ok(Cow::Owned(resolved))
}

fn is_reference_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}
