//! Numeric keywords.

use core::cmp::Ordering;
use std::borrow::Cow;

use num_traits::Zero;
use schemata_value::{EPSILON, Kind, Number, Value};

use super::{Keyword, Setup, boolean, number};
use crate::builder::Builder;
use crate::context::Context;
use crate::error::{BuildError, ValidationError};

/// The numeric instance. A float that `type` accepted as an integer is
/// compared as the exact integer it is equal to.
fn numeric<'v>(value: &'v Value, ctx: &Context<'v>) -> Option<Cow<'v, Number>> {
    let n = value.as_number()?;
    if matches!(n, Number::Float(_)) && ctx.kind_of(value) == Kind::Integer {
        if let Some(exact) = n.to_integer() {
            return Some(Cow::Owned(Number::Integer(exact)));
        }
    }
    Some(Cow::Borrowed(n))
}

// =============================================================================
// MultipleOf
// =============================================================================

/// `multipleOf`: the instance divided by the factor must be an integer.
///
/// Two integers are checked exactly, including an integral float the `type`
/// keyword accepted as an integer. Anything else passes when the
/// remainder is within [`EPSILON`] of the factor, so `0.3` is a multiple of
/// `0.1`.
#[derive(Debug)]
pub struct MultipleOf {
    factor: Option<Number>,
}

impl Setup for MultipleOf {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let Some(value) = builder.keyword("multipleOf") else {
            return Ok(Self { factor: None });
        };
        let factor = number("multipleOf", value)?;
        if factor.numeric_cmp(&Number::from(0i64)) != Some(Ordering::Greater) {
            return Err(BuildError::invalid_keyword(
                "multipleOf",
                format!("expected a number greater than 0, got {factor}"),
            ));
        }
        Ok(Self {
            factor: Some(factor.clone()),
        })
    }
}

impl MultipleOf {
    fn divides(factor: &Number, value: &Number) -> bool {
        if let (Some(factor), Some(value)) = (factor.as_integer(), value.as_integer()) {
            return (value % factor).is_zero();
        }
        let (factor, value) = (factor.as_f64(), value.as_f64());
        let quotient = (value / factor).round();
        (value - quotient * factor).abs() / factor < EPSILON
    }
}

impl Keyword for MultipleOf {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let (Some(factor), Some(n)) = (&self.factor, numeric(value, ctx)) else {
            return;
        };
        if !Self::divides(factor, &n) {
            ctx.report(ValidationError::NotMultipleOf {
                factor: factor.clone(),
                value: n.into_owned(),
            });
        }
    }
}

// =============================================================================
// Maximum / Minimum
// =============================================================================

/// A bound and its exclusivity flag, compiled from `<bound>` and
/// `exclusive<Bound>`.
fn bound(
    builder: &mut Builder<'_, '_>,
    keyword: &str,
    exclusive_keyword: &str,
) -> Result<(Option<Number>, bool), BuildError> {
    let limit = match builder.keyword(keyword) {
        Some(value) => Some(number(keyword, value)?.clone()),
        None => None,
    };
    let exclusive = match builder.keyword(exclusive_keyword) {
        Some(_) if limit.is_none() => {
            return Err(BuildError::invalid_keyword(
                exclusive_keyword,
                format!("requires '{keyword}'"),
            ));
        }
        Some(value) => boolean(exclusive_keyword, value)?,
        None => false,
    };
    Ok((limit, exclusive))
}

/// `maximum` with `exclusiveMaximum`.
#[derive(Debug)]
pub struct Maximum {
    limit: Option<Number>,
    exclusive: bool,
}

impl Setup for Maximum {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let (limit, exclusive) = bound(builder, "maximum", "exclusiveMaximum")?;
        Ok(Self { limit, exclusive })
    }
}

impl Keyword for Maximum {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let (Some(limit), Some(n)) = (&self.limit, numeric(value, ctx)) else {
            return;
        };
        let exclusive = self.exclusive;
        let within = match n.numeric_cmp(limit) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => !exclusive,
            _ => false,
        };
        if !within {
            ctx.report(ValidationError::TooLarge {
                limit: limit.clone(),
                exclusive,
                value: n.into_owned(),
            });
        }
    }
}

/// `minimum` with `exclusiveMinimum`.
#[derive(Debug)]
pub struct Minimum {
    limit: Option<Number>,
    exclusive: bool,
}

impl Setup for Minimum {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let (limit, exclusive) = bound(builder, "minimum", "exclusiveMinimum")?;
        Ok(Self { limit, exclusive })
    }
}

impl Keyword for Minimum {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let (Some(limit), Some(n)) = (&self.limit, numeric(value, ctx)) else {
            return;
        };
        let exclusive = self.exclusive;
        let within = match n.numeric_cmp(limit) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => !exclusive,
            _ => false,
        };
        if !within {
            ctx.report(ValidationError::TooSmall {
                limit: limit.clone(),
                exclusive,
                value: n.into_owned(),
            });
        }
    }
}
