//! Keyword validators.
//!
//! A keyword is compiled once by [`Setup::setup`], which pulls its own
//! keyword values out of the [`Builder`], and then checks instances through
//! [`Keyword::validate`]. Keywords that depend on each other, such as
//! `maximum` and `exclusiveMaximum`, are registered as one validator.

use core::fmt;
use std::sync::Arc;

use num_traits::ToPrimitive;
use schemata_value::{Number, Value};

use crate::builder::Builder;
use crate::context::Context;
use crate::error::BuildError;
use crate::schema::SchemaNode;

mod array;
mod combinator;
mod definitions;
mod enumeration;
mod format;
mod number;
mod object;
mod string;
mod types;

pub use array::{Items, MaxItems, MinItems, UniqueItems};
pub use combinator::{AllOf, AnyOf, Not, OneOf};
pub use definitions::Definitions;
pub use enumeration::Enum;
pub use format::Format;
pub use number::{Maximum, Minimum, MultipleOf};
pub use object::{Dependencies, MaxProperties, MinProperties, Properties, Required};
pub use string::{MaxLength, MinLength, Pattern};
pub use types::Type;

pub trait Keyword: fmt::Debug + Send + Sync {
    /// Checks `value`, reporting every violation through `ctx`.
    ///
    /// Keywords silently accept values of kinds they do not apply to.
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>);
}

/// Build-time construction of a keyword.
pub trait Setup: Keyword + Sized + 'static {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError>;
}

/// What happens to array items or object members no other schema claimed.
#[derive(Debug)]
enum Additional {
    Denied,
    Schema(Arc<SchemaNode>),
}

/// A `patternProperties` entry.
#[derive(Debug)]
struct PatternProperty {
    pattern: regex::Regex,
    schema: Arc<SchemaNode>,
}

pub(crate) type SetupFn = fn(&mut Builder<'_, '_>) -> Result<Box<dyn Keyword>, BuildError>;

pub(crate) fn boxed<K: Setup>(builder: &mut Builder<'_, '_>) -> Result<Box<dyn Keyword>, BuildError> {
    Ok(Box::new(K::setup(builder)?))
}

// =============================================================================
// Definition helpers shared by keyword setups
// =============================================================================

/// A keyword value that must be a non-negative integer.
fn non_negative(keyword: &str, value: &Value) -> Result<usize, BuildError> {
    let Some(number) = value.as_number() else {
        return Err(BuildError::invalid_keyword(keyword, "expected a non-negative integer"));
    };
    if let Some(integer) = number.as_integer() {
        return integer
            .to_usize()
            .ok_or_else(|| BuildError::invalid_keyword(keyword, "expected a non-negative integer"));
    }
    let f = number.as_f64();
    if number.is_integral() && f >= 0.0 && f <= usize::MAX as f64 {
        Ok(f as usize)
    } else {
        Err(BuildError::invalid_keyword(keyword, "expected a non-negative integer"))
    }
}

fn number<'a>(keyword: &str, value: &'a Value) -> Result<&'a Number, BuildError> {
    value
        .as_number()
        .ok_or_else(|| BuildError::invalid_keyword(keyword, format!("expected a number, got {value}")))
}

fn boolean(keyword: &str, value: &Value) -> Result<bool, BuildError> {
    value
        .as_bool()
        .ok_or_else(|| BuildError::invalid_keyword(keyword, format!("expected a boolean, got {value}")))
}

fn string<'a>(keyword: &str, value: &'a Value) -> Result<&'a str, BuildError> {
    value
        .as_str()
        .ok_or_else(|| BuildError::invalid_keyword(keyword, format!("expected a string, got {value}")))
}

fn regex(pattern: &str) -> Result<regex::Regex, BuildError> {
    regex::Regex::new(pattern).map_err(|source| BuildError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Builds `schema` in a fresh draft-04 environment.
#[cfg(test)]
fn compile(schema: &str) -> Result<crate::Schema, BuildError> {
    crate::Environment::draft4().build_schema("", schema.as_bytes())
}

/// Leaf errors of validating `instance` against `schema`.
#[cfg(test)]
fn leaf_errors(schema: &str, instance: &str) -> Vec<crate::ValidationError> {
    let schema = compile(schema).unwrap();
    let instance = schemata_value::from_str(instance).unwrap();
    match schema.validate(&instance) {
        Ok(()) => Vec::new(),
        Err(error) => error.leaves().into_iter().cloned().collect(),
    }
}
