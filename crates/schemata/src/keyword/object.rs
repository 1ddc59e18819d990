//! Object keywords.

use std::sync::Arc;

use indexmap::IndexMap;
use schemata_value::Value;

use super::array::additional;
use super::{Additional, Keyword, PatternProperty, Setup, non_negative, regex};
use crate::builder::Builder;
use crate::context::Context;
use crate::error::{BuildError, Measure, ValidationError};
use crate::schema::SchemaNode;

// =============================================================================
// MaxProperties / MinProperties
// =============================================================================

#[derive(Debug)]
pub struct MaxProperties {
    limit: Option<usize>,
}

impl Setup for MaxProperties {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let limit = match builder.keyword("maxProperties") {
            Some(value) => Some(non_negative("maxProperties", value)?),
            None => None,
        };
        Ok(Self { limit })
    }
}

impl Keyword for MaxProperties {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let (Some(limit), Some(object)) = (self.limit, value.as_object()) else {
            return;
        };
        if object.len() > limit {
            ctx.report(ValidationError::TooLong {
                measure: Measure::Properties,
                limit,
                actual: object.len(),
            });
        }
    }
}

#[derive(Debug)]
pub struct MinProperties {
    limit: Option<usize>,
}

impl Setup for MinProperties {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let limit = match builder.keyword("minProperties") {
            Some(value) => Some(non_negative("minProperties", value)?),
            None => None,
        };
        Ok(Self { limit })
    }
}

impl Keyword for MinProperties {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let (Some(limit), Some(object)) = (self.limit, value.as_object()) else {
            return;
        };
        if object.len() < limit {
            ctx.report(ValidationError::TooShort {
                measure: Measure::Properties,
                limit,
                actual: object.len(),
            });
        }
    }
}

// =============================================================================
// Required
// =============================================================================

fn names(keyword: &str, value: &Value) -> Result<Vec<String>, BuildError> {
    let invalid = || BuildError::invalid_keyword(keyword, "expected an array of property names");
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|name| name.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

#[derive(Debug)]
pub struct Required {
    properties: Vec<String>,
}

impl Setup for Required {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let properties = match builder.keyword("required") {
            Some(value) => names("required", value)?,
            None => Vec::new(),
        };
        Ok(Self { properties })
    }
}

impl Keyword for Required {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let Some(object) = value.as_object() else {
            return;
        };
        for property in &self.properties {
            if !object.contains_key(property) {
                ctx.report(ValidationError::MissingProperty {
                    property: property.clone(),
                });
            }
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

/// `properties` with `patternProperties` and `additionalProperties`.
///
/// Each member of the instance is checked against its declared schema and
/// against every pattern its name matches. Members matched by neither fall
/// to `additionalProperties`.
#[derive(Debug)]
pub struct Properties {
    properties: IndexMap<String, Arc<SchemaNode>>,
    patterns: Vec<PatternProperty>,
    additional: Option<Additional>,
}

impl Setup for Properties {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let mut properties = IndexMap::new();
        if let Some(value) = builder.keyword("properties") {
            let definitions = value.as_object().ok_or_else(|| {
                BuildError::invalid_keyword("properties", "expected an object of schemas")
            })?;
            for (name, definition) in definitions {
                let schema = builder.build_value(&["properties", name.as_str()], definition)?;
                properties.insert(name.clone(), schema);
            }
        }

        let mut patterns = Vec::new();
        if let Some(value) = builder.keyword("patternProperties") {
            let definitions = value.as_object().ok_or_else(|| {
                BuildError::invalid_keyword("patternProperties", "expected an object of schemas")
            })?;
            for (pattern, definition) in definitions {
                patterns.push(PatternProperty {
                    pattern: regex(pattern)?,
                    schema: builder
                        .build_value(&["patternProperties", pattern.as_str()], definition)?,
                });
            }
        }

        let additional = additional(builder, "additionalProperties")?;
        Ok(Self {
            properties,
            patterns,
            additional,
        })
    }
}

impl Keyword for Properties {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let Some(object) = value.as_object() else {
            return;
        };

        for (name, member) in object {
            let mut matched = false;
            if let Some(schema) = self.properties.get(name) {
                matched = true;
                check_member(ctx, name, member, schema);
            }
            for entry in self.patterns.iter().filter(|entry| entry.pattern.is_match(name)) {
                matched = true;
                check_member(ctx, name, member, &entry.schema);
            }
            if matched {
                continue;
            }
            match &self.additional {
                Some(Additional::Denied) => ctx.report(ValidationError::AdditionalProperty {
                    property: name.clone(),
                }),
                Some(Additional::Schema(schema)) => check_member(ctx, name, member, schema),
                None => {}
            }
        }
    }
}

fn check_member<'v>(
    ctx: &mut Context<'v>,
    name: &str,
    member: &'v Value,
    schema: &Arc<SchemaNode>,
) {
    if let Err(error) = ctx.validate_value_with(member, schema) {
        ctx.report(ValidationError::InvalidProperty {
            property: name.to_string(),
            error: Box::new(error),
        });
    }
}

// =============================================================================
// Dependencies
// =============================================================================

#[derive(Debug)]
enum Dependency {
    /// Sibling properties that must be present.
    Properties(Vec<String>),
    /// A schema the whole instance must satisfy.
    Schema(Arc<SchemaNode>),
}

/// `dependencies`: constraints that apply when a property is present.
#[derive(Debug)]
pub struct Dependencies {
    dependencies: IndexMap<String, Dependency>,
}

impl Setup for Dependencies {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let mut dependencies = IndexMap::new();
        let Some(value) = builder.keyword("dependencies") else {
            return Ok(Self { dependencies });
        };
        let definitions = value.as_object().ok_or_else(|| {
            BuildError::invalid_keyword("dependencies", "expected an object")
        })?;
        for (property, definition) in definitions {
            let dependency = match definition {
                Value::Object(schema) => {
                    Dependency::Schema(builder.build(&["dependencies", property.as_str()], schema)?)
                }
                Value::Array(_) => Dependency::Properties(names("dependencies", definition)?),
                _ => {
                    return Err(BuildError::invalid_keyword(
                        "dependencies",
                        format!("dependency of {property:?} must be a schema or an array of property names"),
                    ));
                }
            };
            dependencies.insert(property.clone(), dependency);
        }
        Ok(Self { dependencies })
    }
}

impl Keyword for Dependencies {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let Some(object) = value.as_object() else {
            return;
        };
        for (property, dependency) in &self.dependencies {
            if !object.contains_key(property) {
                continue;
            }
            match dependency {
                Dependency::Properties(required) => {
                    for name in required.iter().filter(|name| !object.contains_key(*name)) {
                        ctx.report(ValidationError::DependencyMissing {
                            property: property.clone(),
                            dependency: name.clone(),
                        });
                    }
                }
                Dependency::Schema(schema) => {
                    if let Err(error) = ctx.validate_self_with(schema) {
                        ctx.report(ValidationError::DependencySchema {
                            property: property.clone(),
                            error: Box::new(error),
                        });
                    }
                }
            }
        }
    }
}
