use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// Comparison operators accepted in a leaf condition.
///
/// Serialized as the operator's textual symbol (`"="`, `"ILIKE"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operation {
    /// Equal (=)
    #[default]
    Eq,
    /// Not equal (!=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// LIKE pattern match
    Like,
    /// ILIKE case-insensitive pattern match
    ILike,
    /// IN list (value is an array)
    In,
    /// BETWEEN x AND y (value is a two element array)
    Between,
    /// IS
    Is,
    /// NOT
    Not,
    /// NULL
    Null,
    /// TRUE
    True,
    /// FALSE
    False,
}

impl Operation {
    pub const ALL: [Operation; 15] = [
        Operation::Eq,
        Operation::Ne,
        Operation::Gt,
        Operation::Gte,
        Operation::Lt,
        Operation::Lte,
        Operation::Like,
        Operation::ILike,
        Operation::In,
        Operation::Between,
        Operation::Is,
        Operation::Not,
        Operation::Null,
        Operation::True,
        Operation::False,
    ];

    /// The operator as it appears in a rendered fragment.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Eq => "=",
            Operation::Ne => "!=",
            Operation::Gt => ">",
            Operation::Gte => ">=",
            Operation::Lt => "<",
            Operation::Lte => "<=",
            Operation::Like => "LIKE",
            Operation::ILike => "ILIKE",
            Operation::In => "IN",
            Operation::Between => "BETWEEN",
            Operation::Is => "IS",
            Operation::Not => "NOT",
            Operation::Null => "NULL",
            Operation::True => "TRUE",
            Operation::False => "FALSE",
        }
    }

    /// Whether the operand is wrapped as a `%...%` pattern.
    pub fn is_pattern(&self) -> bool {
        matches!(self, Operation::Like | Operation::ILike)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operation {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.symbol().eq_ignore_ascii_case(s))
            .ok_or_else(|| CompileError::UnknownOperation(s.to_string()))
    }
}

impl TryFrom<String> for Operation {
    type Error = CompileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.symbol().to_string()
    }
}

/// Sort order direction for a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Unsorted,
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Unsorted => write!(f, "unsorted"),
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_symbols_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.symbol().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn test_operation_keywords_ignore_case() {
        assert_eq!("ilike".parse::<Operation>().unwrap(), Operation::ILike);
        assert_eq!("Between".parse::<Operation>().unwrap(), Operation::Between);
    }

    #[test]
    fn test_only_exact_symbols_parse() {
        for text in ["==", "<>", " = ", "between "] {
            let err = text.parse::<Operation>().unwrap_err();
            assert!(matches!(err, CompileError::UnknownOperation(s) if s == text));
        }
    }

    #[test]
    fn test_unknown_operation() {
        let err = "~=".parse::<Operation>().unwrap_err();
        assert!(matches!(err, CompileError::UnknownOperation(s) if s == "~="));
    }

    #[test]
    fn test_operation_serde() {
        let op: Operation = serde_json::from_str("\">=\"").unwrap();
        assert_eq!(op, Operation::Gte);
        assert_eq!(serde_json::to_string(&Operation::In).unwrap(), "\"IN\"");
        assert!(serde_json::from_str::<Operation>("\"CONTAINS\"").is_err());
    }

    #[test]
    fn test_sort_order_serde() {
        let order: SortOrder = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(order, SortOrder::Desc);
        assert_eq!(SortOrder::default(), SortOrder::Unsorted);
        assert_eq!(serde_json::to_string(&SortOrder::Asc).unwrap(), "\"asc\"");
    }
}
