//! String keywords. Lengths count Unicode scalar values, not bytes.

use regex::Regex;
use schemata_value::Value;

use super::{Keyword, Setup, non_negative, regex, string};
use crate::builder::Builder;
use crate::context::Context;
use crate::error::{BuildError, Measure, ValidationError};

#[derive(Debug)]
pub struct MaxLength {
    limit: Option<usize>,
}

impl Setup for MaxLength {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let limit = match builder.keyword("maxLength") {
            Some(value) => Some(non_negative("maxLength", value)?),
            None => None,
        };
        Ok(Self { limit })
    }
}

impl Keyword for MaxLength {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let (Some(limit), Some(text)) = (self.limit, value.as_str()) else {
            return;
        };
        let actual = text.chars().count();
        if actual > limit {
            ctx.report(ValidationError::TooLong {
                measure: Measure::Length,
                limit,
                actual,
            });
        }
    }
}

#[derive(Debug)]
pub struct MinLength {
    limit: Option<usize>,
}

impl Setup for MinLength {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let limit = match builder.keyword("minLength") {
            Some(value) => Some(non_negative("minLength", value)?),
            None => None,
        };
        Ok(Self { limit })
    }
}

impl Keyword for MinLength {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let (Some(limit), Some(text)) = (self.limit, value.as_str()) else {
            return;
        };
        let actual = text.chars().count();
        if actual < limit {
            ctx.report(ValidationError::TooShort {
                measure: Measure::Length,
                limit,
                actual,
            });
        }
    }
}

/// `pattern`: an unanchored regular expression search.
#[derive(Debug)]
pub struct Pattern {
    pattern: Option<Regex>,
}

impl Setup for Pattern {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let pattern = match builder.keyword("pattern") {
            Some(value) => Some(regex(string("pattern", value)?)?),
            None => None,
        };
        Ok(Self { pattern })
    }
}

impl Keyword for Pattern {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let (Some(pattern), Some(text)) = (&self.pattern, value.as_str()) else {
            return;
        };
        if !pattern.is_match(text) {
            ctx.report(ValidationError::PatternMismatch {
                pattern: pattern.as_str().to_string(),
                value: text.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{compile, leaf_errors};
    use super::*;

    #[test]
    fn test_length_counts_chars() {
        let schema = r#"{"minLength": 2, "maxLength": 3}"#;
        assert!(leaf_errors(schema, r#""日本語""#).is_empty());
        assert_eq!(
            leaf_errors(schema, r#""a""#),
            vec![ValidationError::TooShort {
                measure: Measure::Length,
                limit: 2,
                actual: 1,
            }]
        );
        assert_eq!(
            leaf_errors(schema, r#""abcd""#),
            vec![ValidationError::TooLong {
                measure: Measure::Length,
                limit: 3,
                actual: 4,
            }]
        );
        assert!(leaf_errors(schema, "12345").is_empty());
    }

    #[test]
    fn test_pattern_is_unanchored() {
        let schema = r#"{"pattern": "b+"}"#;
        assert!(leaf_errors(schema, r#""abbc""#).is_empty());
        assert_eq!(
            leaf_errors(schema, r#""ac""#),
            vec![ValidationError::PatternMismatch {
                pattern: "b+".to_string(),
                value: "ac".to_string(),
            }]
        );
    }

    #[test]
    fn test_invalid_definitions() {
        assert!(matches!(
            compile(r#"{"pattern": "("}"#),
            Err(BuildError::InvalidPattern { pattern, .. }) if pattern == "("
        ));
        assert!(compile(r#"{"maxLength": -1}"#).is_err());
        assert!(compile(r#"{"minLength": "1"}"#).is_err());
    }
}
