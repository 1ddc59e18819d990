use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

/// A JSON number.
///
/// Literals without fraction or exponent are kept as exact integers.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(BigInt),
    Float(f64),
}

impl Number {
    /// Numeric interpretation as `f64`.
    ///
    /// Integers outside the `f64` range saturate to an infinity with the
    /// integer's sign.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => i.to_f64().unwrap_or_else(|| {
                if i.sign() == num_bigint::Sign::Minus {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            }),
            Number::Float(f) => *f,
        }
    }

    /// Returns the exact integer if this number was written as one.
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Number::Integer(i) => Some(i),
            Number::Float(_) => None,
        }
    }

    /// The exact integer this number is equal to, if it is integral.
    pub fn to_integer(&self) -> Option<BigInt> {
        match self {
            Number::Integer(i) => Some(i.clone()),
            Number::Float(f) if self.is_integral() => BigInt::from_f64(*f),
            Number::Float(_) => None,
        }
    }

    /// True for integers and for finite floats without a fractional part.
    pub fn is_integral(&self) -> bool {
        match self {
            Number::Integer(_) => true,
            Number::Float(f) => f.is_finite() && f.fract() == 0.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Integer(i) => i.is_zero(),
            Number::Float(f) => *f == 0.0,
        }
    }

    /// Mathematical ordering. Exact between two integers; `None` when a NaN
    /// is involved.
    pub fn numeric_cmp(&self, other: &Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl FromStr for Number {
    type Err = core::num::ParseFloatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if !text.contains(['.', 'e', 'E'])
            && let Ok(i) = BigInt::from_str(text)
        {
            return Ok(Number::Integer(i));
        }
        text.parse::<f64>().map(Number::Float)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(BigInt::from(value))
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::Integer(BigInt::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::Integer(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x:?}"),
        }
    }
}
