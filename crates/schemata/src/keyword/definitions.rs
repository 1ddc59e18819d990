use schemata_value::Value;

use super::{Keyword, Setup};
use crate::builder::Builder;
use crate::context::Context;
use crate::error::BuildError;

/// `definitions`: compiles the named schemas so references can reach them.
/// Never constrains an instance by itself.
#[derive(Debug)]
pub struct Definitions;

impl Setup for Definitions {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        let Some(value) = builder.keyword("definitions") else {
            return Ok(Self);
        };
        let Some(definitions) = value.as_object() else {
            return Err(BuildError::invalid_keyword("definitions", "expected an object"));
        };
        // The document's fragment index keeps the compiled nodes alive.
        for (name, definition) in definitions {
            builder.build_value(&["definitions", name.as_str()], definition)?;
        }
        Ok(Self)
    }
}

impl Keyword for Definitions {
    fn validate<'v>(&self, _value: &'v Value, _ctx: &mut Context<'v>) {}
}

#[cfg(test)]
mod tests {
    use super::super::{compile, leaf_errors};
    use super::*;

    #[test]
    fn test_definitions_do_not_constrain() {
        let schema = r#"{"definitions": {"a": {"type": "string"}}}"#;
        assert!(leaf_errors(schema, "1").is_empty());
    }

    #[test]
    fn test_definitions_are_addressable() {
        let schema = compile(r#"{"definitions": {"a/b": {"type": "string"}}}"#).unwrap();
        let definition = schema.subschema("#/definitions/a~1b").unwrap();
        assert_eq!(definition.id(), "#/definitions/a~1b");
        assert!(definition.validate(&Value::from(1i64)).is_err());
    }

    #[test]
    fn test_definition_must_be_schema() {
        assert!(matches!(
            compile(r#"{"definitions": {"a": []}}"#),
            Err(BuildError::InvalidSchema { pointer }) if pointer == "/definitions/a"
        ));
    }
}
