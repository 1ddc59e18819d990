use schemata_value::{Kind, Value};

use super::{Keyword, Setup};
use crate::builder::Builder;
use crate::context::Context;
use crate::error::{BuildError, ValidationError};

/// `type`: the instance must be one of the listed kinds.
///
/// The first listed kind the instance matches becomes the frame's inferred
/// type.
#[derive(Debug)]
pub struct Type {
    kinds: Vec<Kind>,
}

impl Setup for Type {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let Some(value) = builder.keyword("type") else {
            return Ok(Self { kinds: Vec::new() });
        };
        let names: Vec<&Value> = match value {
            Value::String(_) => vec![value],
            Value::Array(items) if !items.is_empty() => items.iter().collect(),
            _ => {
                return Err(BuildError::invalid_keyword(
                    "type",
                    "expected a type name or a non-empty array of type names",
                ));
            }
        };

        let mut kinds = Vec::with_capacity(names.len());
        for name in names {
            let kind = name
                .as_str()
                .and_then(Kind::from_name)
                .ok_or_else(|| BuildError::invalid_keyword("type", format!("unknown type {name}")))?;
            if kinds.contains(&kind) {
                return Err(BuildError::invalid_keyword("type", format!("duplicate type {name}")));
            }
            kinds.push(kind);
        }
        Ok(Self { kinds })
    }
}

impl Keyword for Type {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        if self.kinds.is_empty() {
            return;
        }
        match self.kinds.iter().find(|kind| value.is_kind(**kind)) {
            Some(kind) => ctx.signals_mut().inferred_type = Some(*kind),
            None => ctx.report(ValidationError::TypeMismatch {
                expected: self.kinds.clone(),
                found: value.kind(),
            }),
        }
    }
}
