use std::thread;

use schemata::keyword::{Keyword, Setup};
use schemata::{BuildError, Builder, Context, Environment, ValidationError, Value};

fn value(text: &str) -> Value {
    schemata_value::from_str(text).unwrap()
}

#[test]
fn test_clone_has_independent_cache() {
    let env = Environment::draft4();
    let mut sandbox = env.clone();
    sandbox
        .register_schema("http://x.test/a.json", br#"{"type": "null"}"#)
        .unwrap();
    assert!(sandbox.schema("http://x.test/a.json").is_some());
    assert!(env.schema("http://x.test/a.json").is_none());
    assert!(env.meta_schema().is_some());
}

#[test]
fn test_build_schema_does_not_cache() {
    let mut env = Environment::draft4();
    env.build_schema("http://x.test/a.json", br#"{"type": "null"}"#)
        .unwrap();
    assert!(env.schema("http://x.test/a.json").is_none());
}

#[test]
fn test_declared_id_must_match() {
    let mut env = Environment::draft4();
    let error = env
        .register_schema(
            "http://x.test/a.json",
            br#"{"id": "http://x.test/b.json", "type": "null"}"#,
        )
        .unwrap_err();
    assert!(matches!(error, BuildError::IdMismatch { .. }));
    assert!(env.schema("http://x.test/a.json").is_none());

    env.register_schema(
        "http://x.test/a.json",
        br#"{"id": "http://x.test/a.json#", "type": "null"}"#,
    )
    .unwrap();
}

#[test]
fn test_declared_id_sets_base_without_registration_id() {
    let mut env = Environment::draft4();
    env.register_schema("http://x.test/types/int.json", br#"{"type": "integer"}"#)
        .unwrap();
    let schema = env
        .build_schema(
            "",
            br#"{"id": "http://x.test/types/root.json", "items": {"$ref": "int.json"}}"#,
        )
        .unwrap();
    assert_eq!(schema.id(), "http://x.test/types/root.json#");
    assert!(schema.validate(&value("[1]")).is_ok());
    assert!(schema.validate(&value("[true]")).is_err());
}

#[test]
fn test_failed_registration_keeps_previous_document() {
    let mut env = Environment::draft4();
    env.register_schema("http://x.test/a.json", br#"{"type": "string"}"#)
        .unwrap();
    assert!(
        env.register_schema("http://x.test/a.json", br##"{"$ref": "#/missing"}"##)
            .is_err()
    );
    let schema = env.schema("http://x.test/a.json").unwrap();
    assert!(schema.validate(&value(r#""s""#)).is_ok());
}

#[test]
fn test_build_errors() {
    let mut env = Environment::draft4();
    assert!(matches!(
        env.build_schema("", b"[]"),
        Err(BuildError::NotAnObject)
    ));
    assert!(matches!(
        env.build_schema("", b"{"),
        Err(BuildError::Decode(_))
    ));
    assert!(matches!(
        env.build_schema("", br#"{"$ref": "http://[::1"}"#),
        Err(BuildError::InvalidUri { .. })
    ));
    assert!(matches!(
        env.build_schema("", br#"{"properties": {"a": {"items": {"minimum": "0"}}}}"#),
        Err(BuildError::InvalidKeyword { keyword, .. }) if keyword == "minimum"
    ));
}

#[test]
fn test_unknown_keywords_are_ignored_but_indexed() {
    let mut env = Environment::draft4();
    let schema = env
        .build_schema(
            "",
            br##"{"x-extra": {"inner": {"type": "string"}}, "items": {"$ref": "#/x-extra/inner"}}"##,
        )
        .unwrap();
    assert!(schema.validate(&value("1")).is_ok());
    assert!(schema.validate(&value(r#"["a"]"#)).is_ok());
    assert!(schema.validate(&value("[1]")).is_err());
}

#[test]
fn test_subschema_lookup() {
    let mut env = Environment::draft4();
    let schema = env
        .build_schema(
            "http://x.test/a.json",
            br#"{"properties": {"a b": {"type": "integer"}}}"#,
        )
        .unwrap();
    let property = schema.subschema("/properties/a b").unwrap();
    assert_eq!(property.id(), "http://x.test/a.json#/properties/a b");
    assert!(schema.subschema("#/properties/a%20b").is_some());
    assert!(schema.subschema("/properties/c").is_none());
    assert_eq!(
        property.node().definition().get("type"),
        Some(&Value::from("integer"))
    );
}

#[test]
fn test_validate_data_keeps_integers_exact() {
    let mut env = Environment::draft4();
    let schema = env
        .build_schema("", br#"{"maximum": 9007199254740992}"#)
        .unwrap();
    assert!(schema.validate_data(b"9007199254740992").is_ok());
    assert!(schema.validate_data(b"9007199254740993").is_err());
    assert!(schema.validate_data(b"{").is_err());
}

#[test]
fn test_concurrent_validation() {
    let mut env = Environment::draft4();
    let schema = env
        .build_schema("", br#"{"items": {"type": "integer", "multipleOf": 2}}"#)
        .unwrap();
    thread::scope(|scope| {
        for n in 0..4i64 {
            let schema = &schema;
            scope.spawn(move || {
                let even = Value::from(vec![Value::from(n * 2); 100]);
                let odd = Value::from(vec![Value::from(n * 2 + 1)]);
                assert!(schema.validate(&even).is_ok());
                assert!(schema.validate(&odd).is_err());
            });
        }
    });
}

// =============================================================================
// Custom keywords
// =============================================================================

/// `x-even`: integers must be even.
#[derive(Debug)]
struct Even {
    enabled: bool,
}

impl Setup for Even {
    fn setup(builder: &mut Builder<'_, '_>) -> Result<Self, BuildError> {
        Ok(Self {
            enabled: builder.keyword("x-even").and_then(Value::as_bool).unwrap_or(false),
        })
    }
}

impl Keyword for Even {
    fn validate<'v>(&self, value: &'v Value, ctx: &mut Context<'v>) {
        let Some(n) = value.as_number().filter(|n| n.is_integral()) else {
            return;
        };
        if self.enabled && n.as_f64() % 2.0 != 0.0 {
            ctx.report(ValidationError::NotMultipleOf {
                factor: 2i64.into(),
                value: n.clone(),
            });
        }
    }
}

#[test]
fn test_custom_keyword() {
    let mut env = Environment::draft4();
    env.register_keyword::<Even>(600, &["x-even"]);
    let schema = env.build_schema("", br#"{"x-even": true}"#).unwrap();
    assert!(schema.validate(&value("4")).is_ok());
    assert!(matches!(
        schema.validate(&value("3")).unwrap_err().leaves().as_slice(),
        [ValidationError::NotMultipleOf { .. }]
    ));
}

#[test]
#[should_panic(expected = "already registered")]
fn test_duplicate_priority_panics() {
    let mut env = Environment::draft4();
    env.register_keyword::<Even>(100, &["x-even"]);
}

#[test]
#[should_panic(expected = "already registered")]
fn test_duplicate_format_panics() {
    let mut env = Environment::draft4();
    env.register_format("email", |_: &str| true);
}
