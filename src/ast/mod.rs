pub mod builders;
pub mod conditions;
pub mod expression;
pub mod operators;
pub mod order;
pub mod values;

pub use self::conditions::Where;
pub use self::expression::Expression;
pub use self::operators::{Operation, SortOrder};
pub use self::order::{Order, Search};
pub use self::values::{Value, VarType};
