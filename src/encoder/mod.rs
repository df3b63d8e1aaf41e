//! Value encoder: turns a leaf's `(value, operation)` into a predicate terminal.
//!
//! Dispatch is on the value's [`VarType`]:
//!
//! | value                         | result                                  |
//! |-------------------------------|-----------------------------------------|
//! | null                          | null marker                             |
//! | `"NULL"` / `"TRUE"` / `"FALSE"` | operator + unquoted keyword           |
//! | string, LIKE/ILIKE            | operator + quoted `%pattern%`           |
//! | string                        | operator + quoted text                  |
//! | number / bigint               | operator + bare number                  |
//! | date                          | operator + quoted ISO timestamp         |
//! | array, BETWEEN                | `BETWEEN low AND high`                  |
//! | array, IN                     | `IN (a,b,...)`                          |
//! | boolean                       | the literal itself                      |
//!
//! Encoding is pure: the result depends only on the inputs and the encoder's
//! options.

pub mod descriptor;

pub use self::descriptor::{Comparison, Keyword, Number, Operand, Terminal};

use crate::ast::{Operation, Value, VarType};
use crate::error::{CompileError, CompileResult};

/// Encodes leaf values into [`Terminal`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueEncoder {
    /// Wrap LIKE/ILIKE operands in `%...%` after escaping `\`, `%` and `_`.
    pub wrap_patterns: bool,
}

impl Default for ValueEncoder {
    fn default() -> Self {
        Self {
            wrap_patterns: true,
        }
    }
}

impl ValueEncoder {
    pub fn new(wrap_patterns: bool) -> Self {
        Self { wrap_patterns }
    }

    pub fn encode(&self, value: &Value, operation: Operation) -> CompileResult<Terminal> {
        if let Value::Null = value {
            return Ok(Terminal::IsNull);
        }

        let expects_array = matches!(operation, Operation::In | Operation::Between);
        if expects_array && !matches!(value, Value::Array(_)) {
            return Err(CompileError::invalid_operand(
                operation,
                format!("expected an array, got {:?}", value.var_type()),
            ));
        }

        if let Some(n) = non_finite(value) {
            return Err(CompileError::invalid_operand(
                operation,
                format!("{n} is not a finite number"),
            ));
        }

        let operand = match value {
            Value::String(s) => self.encode_string(s, operation),
            Value::Int(_) | Value::BigInt(_) | Value::Float(_) | Value::Date(_) => {
                scalar_operand(value).ok_or_else(|| {
                    CompileError::invalid_operand(operation, "unsupported scalar")
                })?
            }
            Value::Array(items) => return encode_array(items, operation),
            Value::Bool(_) | Value::Null => return Ok(Terminal::Literal(value.clone())),
        };

        Ok(Terminal::compare(operation, operand))
    }

    fn encode_string(&self, s: &str, operation: Operation) -> Operand {
        if let Some(keyword) = Keyword::from_literal(s) {
            return Operand::Keyword(keyword);
        }
        if operation.is_pattern() {
            return Operand::Pattern(if self.wrap_patterns {
                format!("%{}%", escape_pattern(s))
            } else {
                s.to_string()
            });
        }
        Operand::Text(s.to_string())
    }
}

/// Encode with default options.
pub fn encode(value: &Value, operation: Operation) -> CompileResult<Terminal> {
    ValueEncoder::default().encode(value, operation)
}

fn encode_array(items: &[Value], operation: Operation) -> CompileResult<Terminal> {
    match operation {
        Operation::Between => {
            let [low, high] = items else {
                return Err(CompileError::invalid_operand(
                    operation,
                    format!("expected two bounds, got {}", items.len()),
                ));
            };
            let bound = |v: &Value| {
                scalar_operand(v).ok_or_else(|| {
                    CompileError::invalid_operand(
                        operation,
                        format!("bound must be a string, number or date, got {:?}", v.var_type()),
                    )
                })
            };
            Ok(Terminal::compare(
                Operation::Between,
                Operand::Range {
                    low: Box::new(bound(low)?),
                    high: Box::new(bound(high)?),
                },
            ))
        }
        Operation::In => {
            if items.is_empty() {
                return Err(CompileError::invalid_operand(operation, "empty list"));
            }
            let members = items
                .iter()
                .map(|v| match v {
                    Value::Null => Ok(Operand::Keyword(Keyword::Null)),
                    Value::Bool(true) => Ok(Operand::Keyword(Keyword::True)),
                    Value::Bool(false) => Ok(Operand::Keyword(Keyword::False)),
                    other => scalar_operand(other).ok_or_else(|| {
                        CompileError::invalid_operand(operation, "nested arrays are not allowed")
                    }),
                })
                .collect::<CompileResult<Vec<_>>>()?;
            Ok(Terminal::compare(Operation::In, Operand::List(members)))
        }
        other => Err(CompileError::invalid_operand(
            other,
            "array operands require IN or BETWEEN",
        )),
    }
}

/// The first NaN or infinity in `value`, including array members.
fn non_finite(value: &Value) -> Option<f64> {
    match value {
        Value::Float(n) if !n.is_finite() => Some(*n),
        Value::Array(items) => items.iter().find_map(non_finite),
        _ => None,
    }
}

/// Numbers stay bare; strings and dates are quoted.
fn scalar_operand(value: &Value) -> Option<Operand> {
    match value.var_type() {
        VarType::Number | VarType::BigInt => match value {
            Value::Int(n) => Some(Operand::Number(Number::Int(*n))),
            Value::BigInt(n) => Some(Operand::Number(Number::BigInt(*n))),
            Value::Float(n) => Some(Operand::Number(Number::Float(*n))),
            _ => None,
        },
        VarType::String => match value {
            Value::String(s) => Some(Operand::Text(s.clone())),
            _ => None,
        },
        VarType::Date => match value {
            Value::Date(d) => Some(Operand::Timestamp(*d)),
            _ => None,
        },
        VarType::Object | VarType::Boolean | VarType::Null => None,
    }
}

fn escape_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
