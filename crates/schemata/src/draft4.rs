//! The draft-04 keyword set and meta-schema.

use std::sync::LazyLock;

use crate::env::Environment;
use crate::keyword::{
    AllOf, AnyOf, Definitions, Dependencies, Enum, Format, Items, MaxItems, MaxLength,
    MaxProperties, Maximum, MinItems, MinLength, MinProperties, Minimum, MultipleOf, Not, OneOf,
    Pattern, Properties, Required, Type, UniqueItems,
};

pub(crate) const META_SCHEMA_ID: &str = "http://json-schema.org/draft-04/schema";

const META_SCHEMA: &str = include_str!("draft4.json");

static DEFAULT: LazyLock<Environment> = LazyLock::new(|| {
    let mut env = Environment::new();
    register_keywords(&mut env);
    register_formats(&mut env);
    env.register_schema(META_SCHEMA_ID, META_SCHEMA.as_bytes())
        .expect("Failed to build the draft-04 meta-schema");
    env
});

pub(crate) fn environment() -> Environment {
    DEFAULT.clone()
}

/// Registers every draft-04 validation keyword.
///
/// Priorities group keywords by the kind they apply to: generic keywords in
/// the 100s, then numbers, strings, arrays and objects.
pub(crate) fn register_keywords(env: &mut Environment) {
    env.register_keyword::<Type>(100, &["type"]);
    env.register_keyword::<Enum>(101, &["enum"]);
    env.register_keyword::<AnyOf>(102, &["anyOf"]);
    env.register_keyword::<AllOf>(103, &["allOf"]);
    env.register_keyword::<OneOf>(104, &["oneOf"]);
    env.register_keyword::<Not>(105, &["not"]);
    env.register_keyword::<Definitions>(106, &["definitions"]);
    env.register_keyword::<Format>(107, &["format"]);

    env.register_keyword::<MultipleOf>(200, &["multipleOf"]);
    env.register_keyword::<Maximum>(201, &["maximum", "exclusiveMaximum"]);
    env.register_keyword::<Minimum>(202, &["minimum", "exclusiveMinimum"]);

    env.register_keyword::<MaxLength>(300, &["maxLength"]);
    env.register_keyword::<MinLength>(301, &["minLength"]);
    env.register_keyword::<Pattern>(302, &["pattern"]);

    env.register_keyword::<Items>(400, &["items", "additionalItems"]);
    env.register_keyword::<MaxItems>(401, &["maxItems"]);
    env.register_keyword::<MinItems>(402, &["minItems"]);
    env.register_keyword::<UniqueItems>(403, &["uniqueItems"]);

    env.register_keyword::<MaxProperties>(500, &["maxProperties"]);
    env.register_keyword::<MinProperties>(501, &["minProperties"]);
    env.register_keyword::<Required>(502, &["required"]);
    env.register_keyword::<Properties>(
        503,
        &["properties", "patternProperties", "additionalProperties"],
    );
    env.register_keyword::<Dependencies>(504, &["dependencies"]);
}

pub(crate) fn register_formats(env: &mut Environment) {
    for &(name, predicate) in schemata_format::BUILTIN {
        env.register_format(name, predicate);
    }
}
