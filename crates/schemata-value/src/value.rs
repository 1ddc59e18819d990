use core::fmt;

use indexmap::IndexMap;

use crate::number::Number;

/// Tolerance used when comparing two numbers that are not both integers.
pub const EPSILON: f64 = 1e-9;

/// Object members. Key order is kept for deterministic iteration only.
pub type Map = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

/// The JSON Schema primitive type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }

    /// Parses a draft-04 primitive type name.
    pub fn from_name(name: &str) -> Option<Kind> {
        Some(match name {
            "null" => Kind::Null,
            "boolean" => Kind::Boolean,
            "integer" => Kind::Integer,
            "number" => Kind::Number,
            "string" => Kind::String,
            "array" => Kind::Array,
            "object" => Kind::Object,
            _ => return None,
        })
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// The most specific kind of this value. Numbers written as integers
    /// report [`Kind::Integer`].
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(Number::Integer(_)) => Kind::Integer,
            Value::Number(Number::Float(_)) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    /// Whether this value is an instance of the given primitive type.
    ///
    /// `integer` accepts floats without a fractional part and `number`
    /// accepts every number.
    pub fn is_kind(&self, kind: Kind) -> bool {
        match (kind, self) {
            (Kind::Null, Value::Null) => true,
            (Kind::Boolean, Value::Bool(_)) => true,
            (Kind::Integer, Value::Number(n)) => n.is_integral(),
            (Kind::Number, Value::Number(_)) => true,
            (Kind::String, Value::String(_)) => true,
            (Kind::Array, Value::Array(_)) => true,
            (Kind::Object, Value::Object(_)) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Deep equality where numbers compare mathematically.
    ///
    /// Two integers compare exactly; any other pair of numbers is equal when
    /// their difference is below [`EPSILON`]. Objects compare by key set,
    /// regardless of member order.
    pub fn tolerant_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => match (a, b) {
                (Number::Integer(x), Number::Integer(y)) => x == y,
                _ => (a.as_f64() - b.as_f64()).abs() < EPSILON,
            },
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.tolerant_eq(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.tolerant_eq(y)))
            }
            (a, b) => a == b,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Object(value)
    }
}

/// Renders compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write_json_string(f, s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_json_string(f, key)?;
                    write!(f, ":{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_json_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    match serde_json::to_string(s) {
        Ok(quoted) => f.write_str(&quoted),
        Err(_) => Err(fmt::Error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_str;

    #[test]
    fn test_kind_of_numbers() {
        assert_eq!(from_str("1").unwrap().kind(), Kind::Integer);
        assert_eq!(from_str("1.5").unwrap().kind(), Kind::Number);
    }

    #[test]
    fn test_integer_kind_accepts_zero_fraction() {
        let value = from_str("1.0").unwrap();
        assert!(value.is_kind(Kind::Integer));
        assert!(value.is_kind(Kind::Number));
        assert!(!from_str("1.1").unwrap().is_kind(Kind::Integer));
    }

    #[test]
    fn test_tolerant_eq_numbers() {
        assert!(Value::from(1i64).tolerant_eq(&Value::from(1.0)));
        assert!(Value::from(0.3).tolerant_eq(&Value::from(0.1 + 0.2)));
        assert!(!Value::from(1i64).tolerant_eq(&Value::from(1.5)));
    }

    #[test]
    fn test_tolerant_eq_objects_ignore_order() {
        let a = from_str(r#"{"a": 1, "b": [true, null]}"#).unwrap();
        let b = from_str(r#"{"b": [true, null], "a": 1.0}"#).unwrap();
        assert!(a.tolerant_eq(&b));
    }

    #[test]
    fn test_tolerant_eq_does_not_mix_kinds() {
        assert!(!Value::Bool(true).tolerant_eq(&Value::from(1i64)));
        assert!(!Value::Null.tolerant_eq(&Value::from(0i64)));
    }

    #[test]
    fn test_display_compact_json() {
        let value = from_str(r#"{"a": [1, 2.5, "x\"y"], "b": null}"#).unwrap();
        assert_eq!(value.to_string(), r#"{"a":[1,2.5,"x\"y"],"b":null}"#);
    }
}
