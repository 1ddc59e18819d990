//! JSON Schema draft-04 validation.
//!
//! Schemas are compiled once into a graph of keyword validators and then
//! validate any number of instances, from any number of threads.
//!
//! ```
//! use schemata::Environment;
//!
//! let mut env = Environment::draft4();
//! let schema = env
//!     .build_schema("", br#"{"type": "integer", "minimum": 0, "maximum": 10}"#)
//!     .unwrap();
//! assert!(schema.validate_data(b"5").is_ok());
//! assert!(schema.validate_data(b"11").is_err());
//! ```
//!
//! Building happens in two phases. The [`Builder`] compiles a document into
//! [`SchemaNode`]s, recording every `$ref` on the way; the references are
//! then linked, fetching other documents through the environment's
//! [`Transport`] when they are not cached. Validation runs the compiled
//! keywords in priority order inside a [`Context`], which carries the
//! signals one keyword leaves for later ones, such as the instance type
//! inferred by `type`.

mod builder;
mod context;
mod draft4;
mod env;
mod error;
pub mod keyword;
mod resolve;
mod schema;
mod transport;
mod uri;

pub use builder::Builder;
pub use context::{Context, Signals};
pub use env::{Environment, FormatPredicate};
pub use error::{
    Attempt, BuildError, DataError, InvalidInstance, Measure, ValidationError,
};
pub use schema::{Schema, SchemaNode};
pub use schemata_value::{Kind, Map, Number, Value};
pub use transport::{FileTransport, Transport, TransportError};
#[cfg(feature = "http")]
pub use transport::{HttpOptions, HttpTransport};
