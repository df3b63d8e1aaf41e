use serde::{Deserialize, Deserializer, Serialize};

use crate::ast::{Expression, SortOrder};

/// A sort key: dotted field path plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Order {
    pub fn new(field: impl Into<String>, sort_order: SortOrder) -> Self {
        Self {
            field: field.into(),
            sort_order,
        }
    }
}

/// A filter together with its sort keys, as received from a caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Search {
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expression>,
    /// Accepts a single sort key or a list.
    #[serde(default, deserialize_with = "one_or_many")]
    pub order: Vec<Order>,
}

impl Search {
    pub fn new(filter: impl Into<Expression>) -> Self {
        Self {
            filter: Some(filter.into()),
            order: Vec::new(),
        }
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.order.push(order);
        self
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Order>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<Order>),
        One(Order),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(order)) => vec![order],
        Some(OneOrMany::Many(orders)) => orders,
    })
}
