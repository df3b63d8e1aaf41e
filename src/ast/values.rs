use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number};

use crate::error::{CompileError, CompileResult};

/// JSON key marking an extended date value: `{"$date": "2024-01-31T00:00:00Z"}`.
pub const DATE_KEY: &str = "$date";

/// A runtime value on the right-hand side of a leaf condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// Integers outside the `i64` range
    BigInt(i128),
    Float(f64),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<Value>),
}

/// Classification of a value, used only to pick an encoding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    String,
    Date,
    Number,
    BigInt,
    Object,
    Boolean,
    Null,
}

impl Value {
    pub fn var_type(&self) -> VarType {
        match self {
            Value::Null => VarType::Null,
            Value::Bool(_) => VarType::Boolean,
            Value::Int(_) | Value::Float(_) => VarType::Number,
            Value::BigInt(_) => VarType::BigInt,
            Value::String(_) => VarType::String,
            Value::Date(_) => VarType::Date,
            Value::Array(_) => VarType::Object,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.var_type(), VarType::Number | VarType::BigInt)
    }

    /// Decode a JSON value. Objects are only accepted in the `{"$date": ...}` form.
    pub fn from_json(json: &serde_json::Value) -> CompileResult<Self> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => number_to_value(n),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(Value::from_json)
                    .collect::<CompileResult<Vec<_>>>()?,
            ),
            serde_json::Value::Object(map) => date_from_json(map)?,
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::BigInt(n) => match u64::try_from(*n) {
                Ok(n) => serde_json::Value::from(n),
                Err(_) => serde_json::Value::String(n.to_string()),
            },
            Value::Float(n) => Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => {
                let mut map = Map::new();
                map.insert(DATE_KEY.to_string(), serde_json::Value::String(d.to_rfc3339()));
                serde_json::Value::Object(map)
            }
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int(i)
    } else if let Some(u) = n.as_u64() {
        Value::BigInt(i128::from(u))
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn date_from_json(map: &Map<String, serde_json::Value>) -> CompileResult<Value> {
    match (map.len(), map.get(DATE_KEY)) {
        (1, Some(serde_json::Value::String(raw))) => DateTime::parse_from_rfc3339(raw)
            .map(|d| Value::Date(d.with_timezone(&Utc)))
            .map_err(|e| CompileError::InvalidExpression(format!("invalid date '{raw}': {e}"))),
        _ => Err(CompileError::InvalidExpression(
            "object values must have the form {\"$date\": \"<RFC 3339>\"}".to_string(),
        )),
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::BigInt(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Value::from_json(&json).map_err(serde::de::Error::custom)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::BigInt(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_var_type_classification() {
        assert_eq!(Value::from("x").var_type(), VarType::String);
        assert_eq!(Value::from(1).var_type(), VarType::Number);
        assert_eq!(Value::from(1.5).var_type(), VarType::Number);
        assert_eq!(Value::BigInt(1).var_type(), VarType::BigInt);
        assert_eq!(Value::from(vec![1, 2]).var_type(), VarType::Object);
        assert_eq!(Value::Null.var_type(), VarType::Null);
        assert!(Value::BigInt(7).is_numeric());
        assert!(!Value::from("7").is_numeric());
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Value::from_json(&json!(42)).unwrap(), Value::Int(42));
        assert_eq!(
            Value::from_json(&json!(u64::MAX)).unwrap(),
            Value::BigInt(i128::from(u64::MAX))
        );
        assert_eq!(Value::from_json(&json!(2.5)).unwrap(), Value::Float(2.5));
    }

    #[test]
    fn test_from_json_date() {
        let v = Value::from_json(&json!({"$date": "2024-03-01T10:00:00+02:00"})).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(v, Value::Date(expected));
    }

    #[test]
    fn test_from_json_rejects_plain_objects() {
        let err = Value::from_json(&json!({"a": 1})).unwrap_err();
        assert!(matches!(err, CompileError::InvalidExpression(_)));

        let err = Value::from_json(&json!({"$date": "yesterday"})).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }
}
