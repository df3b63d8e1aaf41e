//! Encoded comparison descriptors: the terminals of a compiled predicate.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::ast::{Operation, Value};

/// The terminal of a predicate path.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminal {
    /// Null marker: the persistence layer emits `IS NULL`.
    IsNull,
    /// An encoded comparison.
    Compare(Comparison),
    /// A value the encoder passes through untouched (booleans).
    Literal(Value),
}

/// `<alias> <operator> <operand>`, with the alias supplied at render time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub operator: Operation,
    pub operand: Operand,
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operand {
    /// `NULL`, `TRUE` or `FALSE`, emitted unquoted.
    Keyword(Keyword),
    /// Emitted unquoted.
    Number(Number),
    /// Emitted as a quoted string literal.
    Text(String),
    /// Emitted quoted, normalized to `YYYY-MM-DDTHH:MM:SS.sssZ`.
    #[serde(serialize_with = "serialize_timestamp")]
    Timestamp(DateTime<Utc>),
    /// Quoted LIKE pattern; wildcards are already in place.
    Pattern(String),
    /// `low AND high`
    Range { low: Box<Operand>, high: Box<Operand> },
    /// `(a,b,c)`
    List(Vec<Operand>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Keyword {
    Null,
    True,
    False,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    BigInt(i128),
    Float(f64),
}

impl Keyword {
    /// Matches the exact upper-case spelling only.
    pub fn from_literal(s: &str) -> Option<Self> {
        match s {
            "NULL" => Some(Keyword::Null),
            "TRUE" => Some(Keyword::True),
            "FALSE" => Some(Keyword::False),
            _ => None,
        }
    }
}

impl Comparison {
    pub fn new(operator: Operation, operand: Operand) -> Self {
        Self { operator, operand }
    }

    /// Render against a column alias, e.g. `"user"."name" = 'ann'`.
    pub fn render(&self, alias: &str) -> String {
        format!("{} {}", alias, self)
    }
}

impl Terminal {
    pub fn compare(operator: Operation, operand: Operand) -> Self {
        Terminal::Compare(Comparison::new(operator, operand))
    }

    pub fn as_comparison(&self) -> Option<&Comparison> {
        match self {
            Terminal::Compare(c) => Some(c),
            _ => None,
        }
    }

    /// Render against a column alias. A passed-through literal compares by equality.
    pub fn render(&self, alias: &str) -> String {
        match self {
            Terminal::IsNull => format!("{} IS NULL", alias),
            Terminal::Compare(c) => c.render(alias),
            Terminal::Literal(v) => format!("{} = {}", alias, v),
        }
    }
}

/// Millisecond precision, UTC, `Z` suffix. Sub-millisecond digits are dropped.
fn iso_millis(d: &DateTime<Utc>) -> String {
    d.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_timestamp<S: Serializer>(d: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&iso_millis(d))
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keyword::Null => write!(f, "NULL"),
            Keyword::True => write!(f, "TRUE"),
            Keyword::False => write!(f, "FALSE"),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::BigInt(n) => write!(f, "{}", n),
            Number::Float(n) => write!(f, "{}", n),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Keyword(k) => write!(f, "{}", k),
            Operand::Number(n) => write!(f, "{}", n),
            Operand::Text(s) | Operand::Pattern(s) => f.write_str(&quote(s)),
            Operand::Timestamp(d) => f.write_str(&quote(&iso_millis(d))),
            Operand::Range { low, high } => write!(f, "{} AND {}", low, high),
            Operand::List(items) => {
                let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "({})", parts.join(","))
            }
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.operand)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::IsNull => write!(f, "IS NULL"),
            Terminal::Compare(c) => write!(f, "{}", c),
            Terminal::Literal(v) => write!(f, "= {}", v),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::Int(n) => serializer.serialize_i64(*n),
            Number::BigInt(n) => match u64::try_from(*n) {
                Ok(n) => serializer.serialize_u64(n),
                Err(_) => serializer.serialize_str(&n.to_string()),
            },
            Number::Float(n) => serializer.serialize_f64(*n),
        }
    }
}

/// `{"$isNull": true}`, `{"$compare": {...}}`, or the literal itself.
impl Serialize for Terminal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Terminal::IsNull => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$isNull", &true)?;
                map.end()
            }
            Terminal::Compare(c) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$compare", c)?;
                map.end()
            }
            Terminal::Literal(v) => v.serialize(serializer),
        }
    }
}
