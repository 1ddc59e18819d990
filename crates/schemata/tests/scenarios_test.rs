//! End-to-end behavior of the draft-04 keyword set.

use schemata::{Environment, Kind, Schema, ValidationError};

fn compile(text: &str) -> Schema {
    Environment::draft4()
        .build_schema("", text.as_bytes())
        .unwrap()
}

fn leaves(schema: &Schema, instance: &str) -> Vec<ValidationError> {
    let instance = schemata_value::from_str(instance).unwrap();
    match schema.validate(&instance) {
        Ok(()) => Vec::new(),
        Err(error) => error.leaves().into_iter().cloned().collect(),
    }
}

#[test]
fn test_bounded_integer() {
    let schema = compile(r#"{"type": "integer", "minimum": 0, "maximum": 10}"#);
    assert!(leaves(&schema, "5").is_empty());
    assert!(matches!(
        leaves(&schema, "-1").as_slice(),
        [ValidationError::TooSmall { .. }]
    ));
    assert!(matches!(
        leaves(&schema, "11").as_slice(),
        [ValidationError::TooLarge { .. }]
    ));
    assert_eq!(
        leaves(&schema, r#""5""#),
        vec![ValidationError::TypeMismatch {
            expected: vec![Kind::Integer],
            found: Kind::String,
        }]
    );
}

#[test]
fn test_closed_object() {
    let schema = compile(
        r#"{"properties": {"a": {"type": "string"}}, "required": ["a"], "additionalProperties": false}"#,
    );
    assert_eq!(
        leaves(&schema, r#"{"a": "x", "b": 1}"#),
        vec![ValidationError::AdditionalProperty {
            property: "b".to_string()
        }]
    );
}

#[test]
fn test_unique_items() {
    let schema = compile(r#"{"uniqueItems": true}"#);
    assert!(matches!(
        leaves(&schema, "[1, 2, 2, 3]").as_slice(),
        [ValidationError::NotUnique { first: 1, second: 2, .. }]
    ));
}

#[test]
fn test_one_of_exactness() {
    let schema = compile(
        r#"{"oneOf": [{"type": "string"}, {"maxLength": 2}, {"type": "number"}]}"#,
    );
    assert!(leaves(&schema, "null").is_empty());
    assert!(leaves(&schema, r#""abc""#).is_empty());
    assert!(matches!(
        leaves(&schema, r#""ab""#).as_slice(),
        [ValidationError::NotOneOf { matched: 2, .. }]
    ));
    assert!(matches!(
        leaves(&schema, "1").as_slice(),
        [ValidationError::NotOneOf { matched: 2, .. }]
    ));
    assert!(matches!(
        leaves(&compile(r#"{"oneOf": [{"type": "string"}, {"type": "null"}]}"#), "1").as_slice(),
        [ValidationError::NotOneOf { matched: 0, .. }]
    ));
}

#[test]
fn test_multiple_of_epsilon() {
    let schema = compile(r#"{"multipleOf": 0.1}"#);
    assert!(leaves(&schema, "0.3").is_empty());
    assert_eq!(leaves(&schema, "0.25").len(), 1);
}

#[test]
fn test_additional_items_tri_state() {
    let instance = r#"[1, "two", 3]"#;
    let declared = r#""items": [{"type": "integer"}, {"type": "string"}]"#;

    assert!(leaves(&compile(&format!("{{{declared}}}")), instance).is_empty());
    assert_eq!(
        leaves(
            &compile(&format!(r#"{{{declared}, "additionalItems": false}}"#)),
            instance
        ),
        vec![ValidationError::AdditionalItem { index: 2 }]
    );
    let validated = compile(&format!(
        r#"{{{declared}, "additionalItems": {{"type": "string"}}}}"#
    ));
    assert!(matches!(
        leaves(&validated, instance).as_slice(),
        [ValidationError::TypeMismatch { found: Kind::Integer, .. }]
    ));
    assert!(leaves(&validated, r#"[1, "two", "three"]"#).is_empty());
}

#[test]
fn test_all_violations_are_reported() {
    let schema = compile(
        r#"{
            "type": "object",
            "required": ["id", "tags"],
            "properties": {
                "name": {"type": "string", "minLength": 3, "pattern": "^[a-z]+$"},
                "tags": {"type": "array", "items": {"type": "string"}, "uniqueItems": true}
            }
        }"#,
    );
    let errors = leaves(&schema, r#"{"name": "A", "tags": ["x", 1, "x"]}"#);
    assert_eq!(errors.len(), 5, "{errors:?}");
    assert!(errors.contains(&ValidationError::MissingProperty {
        property: "id".to_string()
    }));
}

#[test]
fn test_error_report_renders_tree() {
    let schema = compile(r#"{"properties": {"a": {"minimum": 2}}}"#);
    let instance = schemata_value::from_str(r#"{"a": 1}"#).unwrap();
    let error = schema.validate(&instance).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Schema errors (#):\n\
         - invalid property \"a\": Schema errors (#/properties/a):\n  \
         - expected 1 to be larger than or equal to 2"
    );
}
