use core::fmt;

use schemata_value::Value;

use super::{Keyword, Setup, string};
use crate::builder::Builder;
use crate::context::Context;
use crate::env::FormatPredicate;
use crate::error::{BuildError, ValidationError};

/// `format`: string instances must satisfy a registered predicate.
pub struct Format {
    name: String,
    predicate: Option<FormatPredicate>,
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format").field("name", &self.name).finish()
    }
}

impl Setup for Format {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let Some(value) = builder.keyword("format") else {
            return Ok(Self {
                name: String::new(),
                predicate: None,
            });
        };
        let name = string("format", value)?;
        let predicate = builder.format(name).ok_or_else(|| BuildError::UnknownFormat {
            name: name.to_string(),
        })?;
        Ok(Self {
            name: name.to_string(),
            predicate: Some(predicate),
        })
    }
}

impl Keyword for Format {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let (Some(predicate), Some(text)) = (&self.predicate, value.as_str()) else {
            return;
        };
        if !predicate(text) {
            ctx.report(ValidationError::InvalidFormat {
                format: self.name.clone(),
                value: text.to_string(),
            });
        }
    }
}
