//! Error types for filter compilation.

use thiserror::Error;

use crate::ast::Operation;

/// Errors that can occur while decoding or compiling a filter expression.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The operation symbol is not one of the supported comparison operators.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// The value cannot be used with the requested operation
    /// (e.g. `BETWEEN` on a scalar, `IN` on an empty list).
    #[error("invalid operand for {operation}: {reason}")]
    InvalidOperand {
        operation: Operation,
        reason: String,
    },

    /// The input does not have the shape of a leaf or an `$and`/`$or` node.
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    /// Expression nesting is deeper than the configured limit.
    #[error("expression nesting exceeds maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    /// Distributing AND over OR produced more alternatives than allowed.
    #[error("expression expands to more than {limit} alternatives")]
    TooManyAlternatives { limit: usize },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompileError {
    pub(crate) fn invalid_operand(operation: Operation, reason: impl Into<String>) -> Self {
        CompileError::InvalidOperand {
            operation,
            reason: reason.into(),
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompileError::UnknownOperation("~~".to_string());
        assert_eq!(err.to_string(), "unknown operation '~~'");

        let err = CompileError::invalid_operand(Operation::Between, "expected two bounds");
        assert_eq!(
            err.to_string(),
            "invalid operand for BETWEEN: expected two bounds"
        );

        let err = CompileError::DepthExceeded { limit: 4 };
        assert!(err.to_string().contains("depth of 4"));
    }
}
