use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Map;

use crate::ast::{Operation, Value};
use crate::error::{CompileError, CompileResult};

/// A single leaf comparison: `field <operation> value`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Where {
    /// Dotted path to the target attribute, e.g. `user.person.name`.
    /// Empty when the field is missing.
    pub field: String,
    /// Comparison operator. Falls back to the compiler default (`=`) when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    /// Right-hand side. `None` means the key was absent; `Some(Value::Null)`
    /// is an explicit null test.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Where {
    pub fn new(field: impl Into<String>, operation: Operation, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operation: Some(operation),
            value: Some(value.into()),
        }
    }

    /// A leaf with no explicit operation.
    pub fn field(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operation: None,
            value: Some(value.into()),
        }
    }

    /// Decode a leaf from its JSON object form `{field, operation?, value?}`.
    pub fn from_json(map: &Map<String, serde_json::Value>) -> CompileResult<Self> {
        let field = match map.get("field") {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(CompileError::InvalidExpression(format!(
                    "field must be a string, got {other}"
                )));
            }
        };

        let operation = match map.get("operation") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.parse::<Operation>()?),
            Some(other) => return Err(CompileError::UnknownOperation(other.to_string())),
        };

        let value = map.get("value").map(Value::from_json).transpose()?;

        Ok(Self {
            field,
            operation,
            value,
        })
    }

    pub fn has_field(&self) -> bool {
        !self.field.is_empty()
    }
}

impl<'de> Deserialize<'de> for Where {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::deserialize(deserializer)?;
        Where::from_json(&map).map_err(serde::de::Error::custom)
    }
}
