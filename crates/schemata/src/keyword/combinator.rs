//! `allOf`, `anyOf`, `oneOf` and `not`.
//!
//! Branches are applied to the instance of the current frame, so a branch
//! that refers back to its own schema is caught as a validation loop instead
//! of recursing.

use std::sync::Arc;

use schemata_value::Value;

use super::{Keyword, Setup};
use crate::builder::Builder;
use crate::context::Context;
use crate::error::{Attempt, BuildError, ValidationError};
use crate::schema::SchemaNode;

fn branches(
    builder: &mut Builder<'_, '_>,
    keyword: &str,
) -> Result<Vec<Arc<SchemaNode>>, BuildError> {
    let Some(value) = builder.keyword(keyword) else {
        return Ok(Vec::new());
    };
    let items = match value.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => {
            return Err(BuildError::invalid_keyword(
                keyword,
                "expected a non-empty array of schemas",
            ));
        }
    };
    let mut schemas = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let index = i.to_string();
        schemas.push(builder.build_value(&[keyword, index.as_str()], item)?);
    }
    Ok(schemas)
}

fn attempt(ctx: &mut Context<'_>, schema: &Arc<SchemaNode>) -> Attempt {
    Attempt {
        schema: schema.identifier().to_string(),
        error: ctx.validate_self_with(schema).err(),
    }
}

// =============================================================================
// AllOf
// =============================================================================

#[derive(Debug)]
pub struct AllOf {
    schemas: Vec<Arc<SchemaNode>>,
}

impl Setup for AllOf {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        Ok(Self {
            schemas: branches(builder, "allOf")?,
        })
    }
}

impl Keyword for AllOf {
    fn validate<'v>(&self, _value: &'v Value, ctx: &mut Context<'v>) {
        let attempts: Vec<Attempt> = self.schemas.iter().map(|s| attempt(ctx, s)).collect();
        if attempts.iter().any(|a| a.error.is_some()) {
            ctx.report(ValidationError::NotAllOf { attempts });
        }
    }
}

// =============================================================================
// AnyOf
// =============================================================================

#[derive(Debug)]
pub struct AnyOf {
    schemas: Vec<Arc<SchemaNode>>,
}

impl Setup for AnyOf {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        Ok(Self {
            schemas: branches(builder, "anyOf")?,
        })
    }
}

impl Keyword for AnyOf {
    fn validate<'v>(&self, _value: &'v Value, ctx: &mut Context<'v>) {
        if self.schemas.is_empty() {
            return;
        }
        // Every branch runs so the report shows why each one failed.
        let attempts: Vec<Attempt> = self.schemas.iter().map(|s| attempt(ctx, s)).collect();
        if attempts.iter().all(|a| a.error.is_some()) {
            ctx.report(ValidationError::NotAnyOf { attempts });
        }
    }
}

// =============================================================================
// OneOf
// =============================================================================

#[derive(Debug)]
pub struct OneOf {
    schemas: Vec<Arc<SchemaNode>>,
}

impl Setup for OneOf {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        Ok(Self {
            schemas: branches(builder, "oneOf")?,
        })
    }
}

impl Keyword for OneOf {
    fn validate<'v>(&self, _value: &'v Value, ctx: &mut Context<'v>) {
        if self.schemas.is_empty() {
            return;
        }
        let attempts: Vec<Attempt> = self.schemas.iter().map(|s| attempt(ctx, s)).collect();
        let matched = attempts.iter().filter(|a| a.error.is_none()).count();
        if matched != 1 {
            ctx.report(ValidationError::NotOneOf { matched, attempts });
        }
    }
}

// =============================================================================
// Not
// =============================================================================

#[derive(Debug)]
pub struct Not {
    schema: Option<Arc<SchemaNode>>,
}

impl Setup for Not {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let schema = match builder.keyword("not") {
            Some(value) => Some(builder.build_value(&["not"], value)?),
            None => None,
        };
        Ok(Self { schema })
    }
}

impl Keyword for Not {
    fn validate<'v>(&self, _value: &'v Value, ctx: &mut Context<'v>) {
        let Some(schema) = &self.schema else {
            return;
        };
        match ctx.validate_self_with(schema) {
            Ok(()) => ctx.report(ValidationError::NotNot {
                schema: schema.identifier().to_string(),
            }),
            // A loop is not a failure of the negated schema.
            Err(error @ ValidationError::ValidationLoop { .. }) => ctx.report(error),
            Err(_) => {}
        }
    }
}
