use schemata::{BuildError, Environment, TransportError, ValidationError, Value};

fn remote(url: &str) -> Result<Vec<u8>, TransportError> {
    let body: &[u8] = match url {
        "http://remote.test/integer.json" => br#"{"type": "integer"}"#,
        "http://remote.test/folder/a.json" => br#"{"$ref": "b.json"}"#,
        "http://remote.test/folder/b.json" => br#"{"type": "string"}"#,
        "http://remote.test/list.json" => {
            br#"{"properties": {"next": {"$ref": "node.json"}}, "required": ["value"]}"#
        }
        "http://remote.test/node.json" => {
            br#"{"properties": {"next": {"$ref": "list.json#"}}, "required": ["value"]}"#
        }
        "http://remote.test/defs.json" => {
            br##"{"definitions": {"pos": {"id": "#positive", "minimum": 0}}}"##
        }
        _ => return Err(TransportError::UnsupportedUrl(url.to_string())),
    };
    Ok(body.to_vec())
}

fn value(text: &str) -> Value {
    schemata_value::from_str(text).unwrap()
}

#[test]
fn test_inline_definition_wins_over_cached_document() {
    let mut env = Environment::draft4();
    env.register_schema(
        "http://x.test/s.json",
        br#"{"definitions": {"a": {"type": "string"}}}"#,
    )
    .unwrap();

    let schema = env
        .build_schema(
            "http://x.test/s.json",
            br##"{"$ref": "#/definitions/a", "definitions": {"a": {"type": "integer"}}}"##,
        )
        .unwrap();
    assert!(schema.validate(&value("1")).is_ok());
    assert!(schema.validate(&value(r#""a""#)).is_err());
}

#[test]
fn test_reference_into_cached_document() {
    let mut env = Environment::draft4();
    env.register_schema(
        "http://x.test/defs.json",
        br#"{"definitions": {"name": {"type": "string", "minLength": 1}}}"#,
    )
    .unwrap();
    let schema = env
        .build_schema("", br#"{"items": {"$ref": "http://x.test/defs.json#/definitions/name"}}"#)
        .unwrap();
    assert!(schema.validate(&value(r#"["a", "b"]"#)).is_ok());
    let error = schema.validate(&value(r#"["a", ""]"#)).unwrap_err();
    assert!(matches!(
        error.leaves().as_slice(),
        [ValidationError::TooShort { limit: 1, actual: 0, .. }]
    ));
}

#[test]
fn test_remote_reference_is_fetched_and_cached() {
    let mut env = Environment::draft4().with_transport(remote);
    let schema = env
        .build_schema("", br#"{"items": {"$ref": "http://remote.test/integer.json"}}"#)
        .unwrap();
    assert!(schema.validate(&value("[1, 2]")).is_ok());
    assert!(schema.validate(&value(r#"[1, "2"]"#)).is_err());
    assert!(env.schema("http://remote.test/integer.json").is_some());
}

#[test]
fn test_relative_reference_in_remote_document() {
    let mut env = Environment::draft4().with_transport(remote);
    let schema = env
        .build_schema("", br#"{"$ref": "http://remote.test/folder/a.json"}"#)
        .unwrap();
    assert!(schema.validate(&value(r#""text""#)).is_ok());
    assert!(schema.validate(&value("1")).is_err());
    assert!(env.schema("http://remote.test/folder/b.json").is_some());
}

#[test]
fn test_cross_document_cycle() {
    let mut env = Environment::draft4().with_transport(remote);
    let list = env
        .build_schema("", br#"{"$ref": "http://remote.test/list.json"}"#)
        .unwrap();
    assert!(
        list.validate(&value(r#"{"value": 1, "next": {"value": 2, "next": {"value": 3}}}"#))
            .is_ok()
    );
    let error = list
        .validate(&value(r#"{"value": 1, "next": {"value": 2, "next": {}}}"#))
        .unwrap_err();
    assert_eq!(
        error.leaves(),
        vec![&ValidationError::MissingProperty {
            property: "value".to_string()
        }]
    );
}

#[test]
fn test_plain_name_fragment() {
    let mut env = Environment::draft4().with_transport(remote);
    let schema = env
        .build_schema("", br##"{"$ref": "http://remote.test/defs.json#positive"}"##)
        .unwrap();
    assert!(schema.validate(&value("3")).is_ok());
    let error = schema.validate(&value("-3")).unwrap_err();
    let ValidationError::Invalid(invalid) = error else {
        panic!("expected an invalid instance");
    };
    assert_eq!(invalid.schema, "http://remote.test/defs.json#positive");

    let local = env
        .build_schema(
            "",
            br##"{"definitions": {"x": {"id": "#x", "type": "null"}}, "items": {"$ref": "#x"}}"##,
        )
        .unwrap();
    assert!(local.validate(&value("[null]")).is_ok());
    assert!(local.validate(&value("[0]")).is_err());
}

#[test]
fn test_percent_encoded_pointer() {
    let mut env = Environment::draft4();
    let schema = env
        .build_schema(
            "",
            br##"{
                "definitions": {"a b": {"type": "integer"}, "c%d": {"type": "string"}},
                "properties": {
                    "x": {"$ref": "#/definitions/a%20b"},
                    "y": {"$ref": "#/definitions/c%25d"}
                }
            }"##,
        )
        .unwrap();
    assert!(schema.validate(&value(r#"{"x": 1, "y": "s"}"#)).is_ok());
    let error = schema.validate(&value(r#"{"x": "1", "y": 2}"#)).unwrap_err();
    assert_eq!(error.leaves().len(), 2);
}

#[test]
fn test_reference_to_referenced_definition() {
    let mut env = Environment::draft4();
    let schema = env
        .build_schema(
            "",
            br##"{"$ref": "#/definitions/pos", "definitions": {"pos": {"minimum": 0}}}"##,
        )
        .unwrap();
    assert!(schema.validate(&value("5")).is_ok());
    let error = schema.validate(&value("-5")).unwrap_err();
    let ValidationError::Invalid(invalid) = &error else {
        panic!("expected an invalid instance");
    };
    assert_eq!(invalid.schema, "#/definitions/pos");
    assert_eq!(invalid.errors.len(), 1);
    assert!(matches!(invalid.errors[0], ValidationError::TooSmall { .. }));
}

#[test]
fn test_reference_siblings_are_ignored() {
    let mut env = Environment::draft4();
    let schema = env
        .build_schema(
            "",
            br##"{"definitions": {"s": {"type": "string"}}, "$ref": "#/definitions/s", "maxLength": 1}"##,
        )
        .unwrap();
    assert!(schema.validate(&value(r#""long""#)).is_ok());
}

#[test]
fn test_reference_siblings_are_not_compiled() {
    let mut env = Environment::draft4();
    for sibling in [r#""format": "no-such-format""#, r#""minimum": "x""#] {
        let text = format!(
            r##"{{"$ref": "#/definitions/a", {sibling}, "definitions": {{"a": {{"type": "integer"}}}}}}"##
        );
        let schema = env.build_schema("", text.as_bytes()).unwrap();
        assert!(schema.validate(&value("1")).is_ok());
        assert!(schema.validate(&value(r#""1""#)).is_err());
    }

    let schema = env
        .build_schema(
            "",
            br##"{"$ref": "#/definitions/type", "definitions": {"type": {"type": "null"}}}"##,
        )
        .unwrap();
    assert!(schema.validate(&value("null")).is_ok());
    assert!(schema.validate(&value("0")).is_err());
}

#[test]
fn test_remote_loading_disabled() {
    let mut env = Environment::draft4();
    let error = env
        .build_schema("", br#"{"$ref": "http://remote.test/integer.json"}"#)
        .unwrap_err();
    assert!(matches!(
        error,
        BuildError::RemoteLoadingDisabled { url } if url == "http://remote.test/integer.json"
    ));
}

#[test]
fn test_transport_failure() {
    let mut env = Environment::draft4().with_transport(remote);
    let error = env
        .build_schema("", br#"{"$ref": "http://remote.test/missing.json"}"#)
        .unwrap_err();
    assert!(matches!(
        error,
        BuildError::Transport {
            source: TransportError::UnsupportedUrl(_),
            ..
        }
    ));
}

#[test]
fn test_unknown_reference() {
    let mut env = Environment::draft4().with_transport(remote);
    assert!(matches!(
        env.build_schema("", br##"{"$ref": "#/definitions/missing"}"##),
        Err(BuildError::UnknownReference { reference }) if reference == "#/definitions/missing"
    ));
    assert!(matches!(
        env.build_schema("", br#"{"$ref": "http://remote.test/integer.json#/nope"}"#),
        Err(BuildError::UnknownReference { .. })
    ));
}

#[test]
fn test_reference_cycles_are_validation_loops() {
    let mut env = Environment::draft4();
    let schema = env.build_schema("", br##"{"$ref": "#"}"##).unwrap();
    assert!(matches!(
        schema.validate(&value("1")),
        Err(ValidationError::ValidationLoop { .. })
    ));

    let schema = env
        .build_schema(
            "",
            br##"{
                "definitions": {
                    "a": {"$ref": "#/definitions/b"},
                    "b": {"$ref": "#/definitions/a"}
                },
                "properties": {"x": {"$ref": "#/definitions/a"}}
            }"##,
        )
        .unwrap();
    assert!(schema.validate(&value("{}")).is_ok());
    let error = schema.validate(&value(r#"{"x": 1}"#)).unwrap_err();
    assert!(matches!(
        error.leaves().as_slice(),
        [ValidationError::ValidationLoop { .. }]
    ));
}

#[test]
fn test_recursive_schema_descends_into_values() {
    let mut env = Environment::draft4();
    let tree = env
        .build_schema(
            "",
            br##"{
                "type": "object",
                "required": ["name"],
                "properties": {"children": {"type": "array", "items": {"$ref": "#"}}}
            }"##,
        )
        .unwrap();
    assert!(
        tree.validate(&value(r#"{"name": "a", "children": [{"name": "b", "children": []}]}"#))
            .is_ok()
    );
    let error = tree
        .validate(&value(r#"{"name": "a", "children": [{"children": [{}]}]}"#))
        .unwrap_err();
    assert_eq!(error.leaves().len(), 2);
}
