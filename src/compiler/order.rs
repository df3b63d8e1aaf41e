use crate::ast::{Order, SortOrder};
use crate::tree::Tree;

/// Nested sort directions, e.g. `{user: {createdAt: "desc"}}`.
pub type OrderBy = Tree<SortOrder>;

/// Encode sort keys into one nested mapping. Key order in the mapping is the
/// sort priority. Later keys win on the same path without moving it; keys
/// without a field are ignored.
pub fn encode_order(orders: &[Order]) -> OrderBy {
    let mut order_by = OrderBy::new();
    for order in orders.iter().filter(|o| !o.field.is_empty()) {
        order_by.set_path(&order.field, order.sort_order);
    }
    order_by
}
