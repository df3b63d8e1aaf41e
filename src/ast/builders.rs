//! Ergonomic builder functions for filter expressions.
//!
//! # Example
//! ```
//! use serafim::ast::builders::*;
//!
//! let filter = and([
//!     eq("store.id", 123),
//!     or([like("name", "ann"), is_null("deletedAt")]),
//! ]);
//! ```

use crate::ast::{Expression, Operation, Order, SortOrder, Value, Where};

// ==================== Combinators ====================

/// All conditions must hold.
pub fn and(conditions: impl IntoIterator<Item = Expression>) -> Expression {
    Expression::And(conditions.into_iter().collect())
}

/// Any one condition must hold.
pub fn or(conditions: impl IntoIterator<Item = Expression>) -> Expression {
    Expression::Or(conditions.into_iter().collect())
}

// ==================== Leaves ====================

fn leaf(field: &str, operation: Operation, value: impl Into<Value>) -> Expression {
    Expression::Leaf(Where::new(field, operation, value))
}

pub fn eq(field: &str, value: impl Into<Value>) -> Expression {
    leaf(field, Operation::Eq, value)
}

pub fn ne(field: &str, value: impl Into<Value>) -> Expression {
    leaf(field, Operation::Ne, value)
}

pub fn gt(field: &str, value: impl Into<Value>) -> Expression {
    leaf(field, Operation::Gt, value)
}

pub fn gte(field: &str, value: impl Into<Value>) -> Expression {
    leaf(field, Operation::Gte, value)
}

pub fn lt(field: &str, value: impl Into<Value>) -> Expression {
    leaf(field, Operation::Lt, value)
}

pub fn lte(field: &str, value: impl Into<Value>) -> Expression {
    leaf(field, Operation::Lte, value)
}

/// `field LIKE '%value%'`
pub fn like(field: &str, value: &str) -> Expression {
    leaf(field, Operation::Like, value)
}

/// `field ILIKE '%value%'`
pub fn ilike(field: &str, value: &str) -> Expression {
    leaf(field, Operation::ILike, value)
}

/// `field IN (values...)`
pub fn is_in<T: Into<Value>>(field: &str, values: impl IntoIterator<Item = T>) -> Expression {
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    leaf(field, Operation::In, Value::Array(values))
}

/// `field BETWEEN low AND high`
pub fn between(field: &str, low: impl Into<Value>, high: impl Into<Value>) -> Expression {
    leaf(
        field,
        Operation::Between,
        Value::Array(vec![low.into(), high.into()]),
    )
}

/// Null test; compiles to the null marker.
pub fn is_null(field: &str) -> Expression {
    leaf(field, Operation::Is, Value::Null)
}

// ==================== Sort keys ====================

pub fn asc(field: &str) -> Order {
    Order::new(field, SortOrder::Asc)
}

pub fn desc(field: &str) -> Order {
    Order::new(field, SortOrder::Desc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_builds_two_element_array() {
        let expr = between("age", 10, 20);
        let Expression::Leaf(w) = expr else {
            panic!("expected leaf");
        };
        assert_eq!(w.operation, Some(Operation::Between));
        assert_eq!(w.value, Some(Value::Array(vec![Value::Int(10), Value::Int(20)])));
    }

    #[test]
    fn test_nested_builders() {
        let expr = and([eq("a", 1), or([eq("b", 2), is_null("c")])]);
        assert_eq!(expr.depth(), 3);
        assert_eq!(expr.leaves().len(), 3);
    }

    #[test]
    fn test_is_in_collects() {
        let Expression::Leaf(w) = is_in("id", ["x", "y"]) else {
            panic!("expected leaf");
        };
        assert_eq!(w.value, Some(Value::from(vec!["x", "y"])));
    }
}
