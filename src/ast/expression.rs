use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Map;

use crate::ast::Where;
use crate::error::{CompileError, CompileResult};

pub const AND_KEY: &str = "$and";
pub const OR_KEY: &str = "$or";

/// A filter expression: a leaf comparison or an AND/OR over child expressions.
///
/// JSON form:
/// ```text
/// Expression = Leaf | {"$and": [Expression]} | {"$or": [Expression]} | [Leaf]
/// ```
/// A bare array is shorthand for `$and`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Leaf(Where),
    /// All children must hold.
    And(Vec<Expression>),
    /// Any one child must hold.
    Or(Vec<Expression>),
}

impl Expression {
    pub fn from_json(json: &serde_json::Value) -> CompileResult<Self> {
        match json {
            serde_json::Value::Array(items) => Ok(Expression::And(children_from_json(items)?)),
            serde_json::Value::Object(map) => Self::from_object(map),
            other => Err(CompileError::InvalidExpression(format!(
                "expected an object or array, got {other}"
            ))),
        }
    }

    fn from_object(map: &Map<String, serde_json::Value>) -> CompileResult<Self> {
        let Some((key, children)) = map.iter().next().filter(|_| map.len() == 1) else {
            return Where::from_json(map).map(Expression::Leaf);
        };
        let items = match (key.as_str(), children) {
            (AND_KEY | OR_KEY, serde_json::Value::Array(items)) => children_from_json(items)?,
            (AND_KEY | OR_KEY, _) => {
                return Err(CompileError::InvalidExpression(format!(
                    "{key} expects an array of expressions"
                )));
            }
            _ => return Where::from_json(map).map(Expression::Leaf),
        };
        Ok(if key == AND_KEY {
            Expression::And(items)
        } else {
            Expression::Or(items)
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        let combinator = |key: &str, children: &[Expression]| {
            let mut map = Map::new();
            map.insert(
                key.to_string(),
                serde_json::Value::Array(children.iter().map(Expression::to_json).collect()),
            );
            serde_json::Value::Object(map)
        };
        match self {
            Expression::Leaf(leaf) => serde_json::to_value(leaf).unwrap_or_default(),
            Expression::And(children) => combinator(AND_KEY, children),
            Expression::Or(children) => combinator(OR_KEY, children),
        }
    }

    /// Nesting depth; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expression::Leaf(_) => 1,
            Expression::And(children) | Expression::Or(children) => {
                1 + children.iter().map(Expression::depth).max().unwrap_or(0)
            }
        }
    }

    /// Every leaf in the expression, depth first.
    pub fn leaves(&self) -> Vec<&Where> {
        match self {
            Expression::Leaf(leaf) => vec![leaf],
            Expression::And(children) | Expression::Or(children) => {
                children.iter().flat_map(Expression::leaves).collect()
            }
        }
    }
}

fn children_from_json(items: &[serde_json::Value]) -> CompileResult<Vec<Expression>> {
    items.iter().map(Expression::from_json).collect()
}

impl From<Where> for Expression {
    fn from(leaf: Where) -> Self {
        Expression::Leaf(leaf)
    }
}

/// A list of leaves is an implicit AND.
impl From<Vec<Where>> for Expression {
    fn from(leaves: Vec<Where>) -> Self {
        Expression::And(leaves.into_iter().map(Expression::Leaf).collect())
    }
}

impl TryFrom<serde_json::Value> for Expression {
    type Error = CompileError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Expression::from_json(&json)
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Expression::from_json(&json).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operation;
    use serde_json::json;

    #[test]
    fn test_parse_nested_expression() {
        let expr = Expression::from_json(&json!({
            "$and": [
                {"field": "a", "value": 1},
                {"$or": [
                    {"field": "b", "operation": "LIKE", "value": "x"},
                    {"field": "c", "value": null}
                ]}
            ]
        }))
        .unwrap();

        let Expression::And(children) = &expr else {
            panic!("expected AND, got {expr:?}");
        };
        assert_eq!(children.len(), 2);
        assert!(matches!(&children[1], Expression::Or(alts) if alts.len() == 2));
        assert_eq!(expr.depth(), 3);
        assert_eq!(expr.leaves().len(), 3);
        assert_eq!(expr.leaves()[1].operation, Some(Operation::Like));
    }

    #[test]
    fn test_bare_array_is_and() {
        let expr = Expression::from_json(&json!([{"field": "a", "value": 1}])).unwrap();
        assert_eq!(
            expr,
            Expression::And(vec![Expression::Leaf(Where::field("a", 1))])
        );
    }

    #[test]
    fn test_leaf_named_like_combinator() {
        let expr = Expression::from_json(&json!({"field": "$and", "value": 1})).unwrap();
        assert!(matches!(expr, Expression::Leaf(leaf) if leaf.field == "$and"));
    }

    #[test]
    fn test_combinator_requires_array() {
        let err = Expression::from_json(&json!({"$or": {"field": "a"}})).unwrap_err();
        assert!(err.to_string().contains("$or expects an array"));
    }

    #[test]
    fn test_rejects_scalars() {
        assert!(Expression::from_json(&json!("a = 1")).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let source = json!({"$or": [{"field": "a", "operation": "IN", "value": [1, 2]}]});
        let expr: Expression = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(serde_json::to_value(&expr).unwrap(), source);
    }
}
