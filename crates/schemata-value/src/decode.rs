use thiserror::Error;

use crate::number::Number;
use crate::value::{Map, Value};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid number literal `{0}`")]
    Number(String),
}

/// Decodes a JSON document from bytes.
pub fn from_slice(bytes: &[u8]) -> Result<Value, DecodeError> {
    let json: serde_json::Value = serde_json::from_slice(bytes)?;
    Value::try_from(json)
}

/// Decodes a JSON document from text.
pub fn from_str(text: &str) -> Result<Value, DecodeError> {
    from_slice(text.as_bytes())
}

impl TryFrom<serde_json::Value> for Value {
    type Error = DecodeError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                // Number text is preserved verbatim, so integers of any size
                // survive the round trip through serde_json.
                let text = n.to_string();
                let number = text
                    .parse::<Number>()
                    .map_err(|_| DecodeError::Number(text))?;
                Value::Number(number)
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(members) => {
                let mut map = Map::with_capacity(members.len());
                for (key, item) in members {
                    map.insert(key, Value::try_from(item)?);
                }
                Value::Object(map)
            }
        })
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let json = serde_json::Value::deserialize(deserializer)?;
        Value::try_from(json).map_err(serde::de::Error::custom)
    }
}

/// A number JSON text cannot carry, such as an infinity decoded from
/// `1e400`.
#[derive(Debug, Error)]
#[error("number {0} has no JSON representation")]
pub struct UnrepresentableNumber(pub Number);

impl TryFrom<&Value> for serde_json::Value {
    type Error = UnrepresentableNumber;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::from_str(&n.to_string())
                .map_err(|_| UnrepresentableNumber(n.clone()))?,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => {
                let mut members = serde_json::Map::with_capacity(map.len());
                for (key, item) in map {
                    members.insert(key.clone(), serde_json::Value::try_from(item)?);
                }
                serde_json::Value::Object(members)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_decode_preserves_large_integers() {
        let value = from_str("[18446744073709551617]").unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(
            items[0].as_number().unwrap().as_integer(),
            Some(&"18446744073709551617".parse::<BigInt>().unwrap())
        );
    }

    #[test]
    fn test_decode_keeps_member_order() {
        let value = from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert!(matches!(from_str("{\"a\": }"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_deserialize_through_serde() {
        let value: Value = serde_json::from_str(r#"{"n": 1.25}"#).unwrap();
        assert_eq!(
            value.as_object().unwrap()["n"],
            Value::Number(Number::Float(1.25))
        );
    }

    #[test]
    fn test_back_to_serde_json() {
        let value = from_str(r#"{"a": [1, 1.5, "s", null, true]}"#).unwrap();
        let json = serde_json::Value::try_from(&value).unwrap();
        assert_eq!(json["a"][2], serde_json::json!("s"));
        assert_eq!(json["a"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_non_finite_number_has_no_json_form() {
        let value = from_str(r#"{"big": [1e400]}"#).unwrap();
        assert_eq!(
            value.as_object().unwrap()["big"].as_array().unwrap()[0],
            Value::Number(Number::Float(f64::INFINITY))
        );
        let error = serde_json::Value::try_from(&value).unwrap_err();
        assert!(matches!(error.0, Number::Float(f) if f == f64::INFINITY));

        let nan = Value::Number(Number::Float(f64::NAN));
        assert!(serde_json::Value::try_from(&nan).is_err());
    }
}
