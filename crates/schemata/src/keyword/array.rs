//! Array keywords.

use std::sync::Arc;

use schemata_value::Value;

use super::{Keyword, Setup, boolean, non_negative};
use crate::builder::Builder;
use super::Additional;
use crate::context::Context;
use crate::error::{BuildError, Measure, ValidationError};
use crate::schema::SchemaNode;

/// Compiles `additionalItems` or `additionalProperties`. `true` and absence
/// both leave extra members unconstrained.
pub(super) fn additional(
    builder: &mut Builder<'_, '_>,
    keyword: &str,
) -> Result<Option<Additional>, BuildError> {
    match builder.keyword(keyword) {
        None | Some(Value::Bool(true)) => Ok(None),
        Some(Value::Bool(false)) => Ok(Some(Additional::Denied)),
        Some(Value::Object(definition)) => {
            Ok(Some(Additional::Schema(builder.build(&[keyword], definition)?)))
        }
        Some(_) => Err(BuildError::invalid_keyword(
            keyword,
            "expected a boolean or a schema",
        )),
    }
}

// =============================================================================
// Items
// =============================================================================

#[derive(Debug)]
enum ItemSchemas {
    /// One schema for every element.
    Single(Arc<SchemaNode>),
    /// One schema per position.
    Tuple(Vec<Arc<SchemaNode>>),
}

/// `items` with `additionalItems`.
///
/// `additionalItems` only applies when `items` is an array of schemas.
#[derive(Debug)]
pub struct Items {
    items: Option<ItemSchemas>,
    additional: Option<Additional>,
}

impl Setup for Items {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let items = match builder.keyword("items") {
            None => None,
            Some(Value::Object(definition)) => {
                Some(ItemSchemas::Single(builder.build(&["items"], definition)?))
            }
            Some(Value::Array(definitions)) => {
                let mut schemas = Vec::with_capacity(definitions.len());
                for (i, definition) in definitions.iter().enumerate() {
                    let index = i.to_string();
                    schemas.push(builder.build_value(&["items", index.as_str()], definition)?);
                }
                Some(ItemSchemas::Tuple(schemas))
            }
            Some(_) => {
                return Err(BuildError::invalid_keyword(
                    "items",
                    "expected a schema or an array of schemas",
                ));
            }
        };
        let additional = additional(builder, "additionalItems")?;
        Ok(Self { items, additional })
    }
}

impl Keyword for Items {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let (Some(items), Some(elements)) = (&self.items, value.as_array()) else {
            return;
        };

        match items {
            ItemSchemas::Single(schema) => {
                for (index, element) in elements.iter().enumerate() {
                    if let Err(error) = ctx.validate_value_with(element, schema) {
                        ctx.report(ValidationError::InvalidItem {
                            index,
                            error: Box::new(error),
                        });
                    }
                }
            }
            ItemSchemas::Tuple(schemas) => {
                for (index, (element, schema)) in elements.iter().zip(schemas).enumerate() {
                    if let Err(error) = ctx.validate_value_with(element, schema) {
                        ctx.report(ValidationError::InvalidItem {
                            index,
                            error: Box::new(error),
                        });
                    }
                }
                let rest = elements.get(schemas.len()..).unwrap_or_default();
                self.validate_additional(rest, schemas.len(), ctx);
            }
        }
    }
}

impl Items {
    /// Checks the elements past the positional schemas, `rest` starting at
    /// index `start`.
    fn validate_additional<'v>(&self, rest: &'v [Value], start: usize, ctx: &mut Context<'v>) {
        let Some(additional) = &self.additional else {
            return;
        };
        for (index, element) in (start..).zip(rest) {
            match additional {
                Additional::Denied => ctx.report(ValidationError::AdditionalItem { index }),
                Additional::Schema(schema) => {
                    if let Err(error) = ctx.validate_value_with(element, schema) {
                        ctx.report(ValidationError::InvalidItem {
                            index,
                            error: Box::new(error),
                        });
                    }
                }
            }
        }
    }
}

// =============================================================================
// MaxItems / MinItems
// =============================================================================

#[derive(Debug)]
pub struct MaxItems {
    limit: Option<usize>,
}

impl Setup for MaxItems {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let limit = match builder.keyword("maxItems") {
            Some(value) => Some(non_negative("maxItems", value)?),
            None => None,
        };
        Ok(Self { limit })
    }
}

impl Keyword for MaxItems {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let (Some(limit), Some(elements)) = (self.limit, value.as_array()) else {
            return;
        };
        if elements.len() > limit {
            ctx.report(ValidationError::TooLong {
                measure: Measure::Items,
                limit,
                actual: elements.len(),
            });
        }
    }
}

#[derive(Debug)]
pub struct MinItems {
    limit: Option<usize>,
}

impl Setup for MinItems {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let limit = match builder.keyword("minItems") {
            Some(value) => Some(non_negative("minItems", value)?),
            None => None,
        };
        Ok(Self { limit })
    }
}

impl Keyword for MinItems {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let (Some(limit), Some(elements)) = (self.limit, value.as_array()) else {
            return;
        };
        if elements.len() < limit {
            ctx.report(ValidationError::TooShort {
                measure: Measure::Items,
                limit,
                actual: elements.len(),
            });
        }
    }
}

// =============================================================================
// UniqueItems
// =============================================================================

/// `uniqueItems`: reports every repeated element once, paired with its first
/// occurrence.
#[derive(Debug)]
pub struct UniqueItems {
    unique: bool,
}

impl Setup for UniqueItems {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let unique = match builder.keyword("uniqueItems") {
            Some(value) => boolean("uniqueItems", value)?,
            None => false,
        };
        Ok(Self { unique })
    }
}

impl Keyword for UniqueItems {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let Some(elements) = value.as_array().filter(|_| self.unique) else {
            return;
        };
        let mut flagged = vec![false; elements.len()];
        for first in 0..elements.len() {
            if flagged[first] {
                continue;
            }
            for second in first + 1..elements.len() {
                if flagged[second] || !elements[first].tolerant_eq(&elements[second]) {
                    continue;
                }
                flagged[second] = true;
                ctx.report(ValidationError::NotUnique {
                    first,
                    second,
                    value: elements[first].clone(),
                });
            }
        }
    }
}
