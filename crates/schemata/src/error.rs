//! Error types
//!
//! Two categories of errors:
//! - `BuildError`: problems with a schema document, raised while compiling
//!   or linking it. The first one aborts the build.
//! - `ValidationError`: mismatches between an instance and a schema. They
//!   are accumulated per frame and never abort validation.

use core::fmt;

use schemata_value::{DecodeError, Kind, Number, Value};
use thiserror::Error;

use crate::transport::TransportError;

// =============================================================================
// BuildError (fail-fast)
// =============================================================================

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to decode schema document: {0}")]
    Decode(#[from] DecodeError),

    #[error("schema document must be a JSON object")]
    NotAnObject,

    #[error("invalid '{keyword}' definition: {reason}")]
    InvalidKeyword { keyword: String, reason: String },

    /// A location that must hold a schema object holds something else.
    #[error("expected a schema object at '{pointer}'")]
    InvalidSchema { pointer: String },

    #[error("invalid URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        source: url::ParseError,
    },

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("unknown format '{name}'")]
    UnknownFormat { name: String },

    #[error("unknown schema reference: {reference}")]
    UnknownReference { reference: String },

    #[error("remote loading is not enabled: cannot fetch {url}")]
    RemoteLoadingDisabled { url: String },

    #[error("failed to fetch {url}: {source}")]
    Transport { url: String, source: TransportError },

    #[error("schema id '{declared}' does not match '{expected}'")]
    IdMismatch { expected: String, declared: String },

    /// The document does not conform to the environment's meta-schema.
    #[error("schema does not conform to the meta-schema: {0}")]
    MetaSchema(Box<ValidationError>),
}

impl BuildError {
    pub(crate) fn invalid_keyword(keyword: &str, reason: impl Into<String>) -> Self {
        BuildError::InvalidKeyword {
            keyword: keyword.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// ValidationError (accumulated)
// =============================================================================

/// What a length bound counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Unicode scalar values of a string.
    Length,
    /// Elements of an array.
    Items,
    /// Members of an object.
    Properties,
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Measure::Length => "length",
            Measure::Items => "number of items",
            Measure::Properties => "number of properties",
        })
    }
}

/// One branch tried by `allOf`, `anyOf` or `oneOf`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    /// Identifier of the branch schema.
    pub schema: String,
    /// `None` when the branch accepted the instance.
    pub error: Option<ValidationError>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("expected type to be in [{}] but was {found}", List(.expected))]
    TypeMismatch { expected: Vec<Kind>, found: Kind },

    #[error("{value} must be in [{}]", List(.expected))]
    EnumMismatch { expected: Vec<Value>, value: Value },

    #[error("expected {value} to be smaller than {}{limit}", or_equal(.exclusive))]
    TooLarge {
        limit: Number,
        exclusive: bool,
        value: Number,
    },

    #[error("expected {value} to be larger than {}{limit}", or_equal(.exclusive))]
    TooSmall {
        limit: Number,
        exclusive: bool,
        value: Number,
    },

    #[error("expected {value} to be a multiple of {factor}")]
    NotMultipleOf { factor: Number, value: Number },

    #[error("expected {measure} {actual} to be at most {limit}")]
    TooLong {
        measure: Measure,
        limit: usize,
        actual: usize,
    },

    #[error("expected {measure} {actual} to be at least {limit}")]
    TooShort {
        measure: Measure,
        limit: usize,
        actual: usize,
    },

    #[error("expected {value:?} to match pattern {pattern:?}")]
    PatternMismatch { pattern: String, value: String },

    #[error("{value:?} did not match format '{format}'")]
    InvalidFormat { format: String, value: String },

    #[error("missing required property: {property:?}")]
    MissingProperty { property: String },

    #[error("additional property {property:?} is not allowed")]
    AdditionalProperty { property: String },

    #[error("invalid property {property:?}: {error}")]
    InvalidProperty {
        property: String,
        error: Box<ValidationError>,
    },

    #[error("invalid item at {index}: {error}")]
    InvalidItem {
        index: usize,
        error: Box<ValidationError>,
    },

    #[error("additional item at {index} is not allowed")]
    AdditionalItem { index: usize },

    #[error("value at {first} ({value}) is not unique (repeated at {second})")]
    NotUnique {
        first: usize,
        second: usize,
        value: Value,
    },

    #[error("value must be all of:{}", Attempts(.attempts))]
    NotAllOf { attempts: Vec<Attempt> },

    #[error("value must be any of:{}", Attempts(.attempts))]
    NotAnyOf { attempts: Vec<Attempt> },

    #[error("value must be exactly one of ({matched} matched):{}", Attempts(.attempts))]
    NotOneOf {
        matched: usize,
        attempts: Vec<Attempt>,
    },

    #[error("value must not be valid for {schema}")]
    NotNot { schema: String },

    #[error("property {property:?} requires property {dependency:?}")]
    DependencyMissing { property: String, dependency: String },

    #[error("property {property:?} failed its dependency schema: {error}")]
    DependencySchema {
        property: String,
        error: Box<ValidationError>,
    },

    /// A schema was applied to the same instance while already being applied.
    #[error("schema validation loop detected at {schema}")]
    ValidationLoop { schema: String },

    /// A schema was applied to the current instance before any instance was
    /// entered.
    #[error("cannot apply a schema to the current instance from a root frame")]
    RootFrame,

    /// The target of a reference is no longer alive.
    #[error("reference {reference} is not resolved")]
    UnresolvedReference { reference: String },

    #[error(transparent)]
    Invalid(InvalidInstance),
}

impl ValidationError {
    /// Every non-composite error in this tree, depth first.
    ///
    /// Descends through per-frame composites and the property, item and
    /// dependency wrappers. Combinator failures are leaves.
    pub fn leaves(&self) -> Vec<&ValidationError> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a ValidationError>) {
        match self {
            ValidationError::Invalid(instance) => {
                for error in &instance.errors {
                    error.collect_leaves(out);
                }
            }
            ValidationError::InvalidProperty { error, .. }
            | ValidationError::InvalidItem { error, .. }
            | ValidationError::DependencySchema { error, .. } => error.collect_leaves(out),
            other => out.push(other),
        }
    }
}

/// All errors reported while applying one schema to one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidInstance {
    /// Identifier of the schema that was applied.
    pub schema: String,
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for InvalidInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema errors ({}):", self.schema)?;
        for error in &self.errors {
            write!(f, "\n- {}", error.to_string().replace('\n', "\n  "))?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidInstance {}

/// Failure of [`crate::Schema::validate_data`].
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to decode instance: {0}")]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

// =============================================================================
// Display helpers
// =============================================================================

fn or_equal(exclusive: &bool) -> &'static str {
    if *exclusive { "" } else { "or equal to " }
}

struct List<'a, T>(&'a [T]);

impl<T: fmt::Display> fmt::Display for List<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

struct Attempts<'a>(&'a [Attempt]);

impl fmt::Display for Attempts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attempt in self.0 {
            let error = match &attempt.error {
                Some(error) => error.to_string().replace('\n', "\n    "),
                None => "<none>".to_string(),
            };
            write!(f, "\n- schema: {}\n  error:\n    {error}", attempt.schema)?;
        }
        Ok(())
    }
}
