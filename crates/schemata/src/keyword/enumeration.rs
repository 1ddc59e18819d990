use schemata_value::Value;

use super::{Keyword, Setup};
use crate::builder::Builder;
use crate::context::Context;
use crate::error::{BuildError, ValidationError};

/// `enum`: the instance must equal one of the listed values.
///
/// Numbers are compared with [`Value::tolerant_eq`], so `1` and `1.0` match.
#[derive(Debug)]
pub struct Enum {
    values: Vec<Value>,
}

impl Setup for Enum {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let Some(value) = builder.keyword("enum") else {
            return Ok(Self { values: Vec::new() });
        };
        match value.as_array() {
            Some(values) if !values.is_empty() => Ok(Self {
                values: values.to_vec(),
            }),
            _ => Err(BuildError::invalid_keyword("enum", "expected a non-empty array")),
        }
    }
}

impl Keyword for Enum {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        if self.values.is_empty() || self.values.iter().any(|v| v.tolerant_eq(value)) {
            return;
        }
        ctx.report(ValidationError::EnumMismatch {
            expected: self.values.clone(),
            value: value.clone(),
        });
    }
}
