//! Dynamic JSON values for schema validation.
//!
//! The value model keeps integers exact: every number literal without a
//! fraction or exponent decodes into a [`num_bigint::BigInt`], so validators
//! never see a silently rounded integer. Floating point is only used for
//! literals that were written as floats.
//!
//! The [`pointer`] module implements RFC 6901 JSON Pointers for addressing
//! sub-values.

mod decode;
mod number;
pub mod pointer;
mod value;

pub use decode::{DecodeError, UnrepresentableNumber, from_slice, from_str};
pub use number::Number;
pub use pointer::{Pointer, PointerError};
pub use value::{EPSILON, Kind, Map, Value};
