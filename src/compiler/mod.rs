//! Expression compiler.
//!
//! Walks a leaf/AND/OR tree and produces the disjunctive set of nested
//! predicates a relational persistence layer takes as its `where` option:
//!
//! - Leaf: one predicate, the encoded terminal placed at the leaf's field path.
//! - AND: cartesian merge of the children's alternatives, so an OR child
//!   multiplies the result.
//! - OR: the children's alternatives concatenated.
//!
//! A single alternative collapses to a bare predicate.

pub mod find;
pub mod order;
pub mod relations;


use serde::Serialize;

use crate::ast::{Expression, Where};
use crate::config::CompilerConfig;
use crate::encoder::{Terminal, ValueEncoder};
use crate::error::{CompileError, CompileResult};
use crate::tree::{Tree, cartesian_merge};

pub use self::find::{FindOptions, find_options};
pub use self::order::{OrderBy, encode_order};
pub use self::relations::{Relations, infer_relations};

/// A nested mapping whose terminals are encoded comparisons or null markers.
pub type Predicate = Tree<Terminal>;

/// Compiler output: one predicate, or several of which any one must match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Compiled {
    Single(Predicate),
    Any(Vec<Predicate>),
}

impl Compiled {
    pub fn empty() -> Self {
        Compiled::Single(Predicate::new())
    }

    /// Zero alternatives become the empty predicate, one becomes a bare predicate.
    pub fn collapse(alternatives: Vec<Predicate>) -> Self {
        match <[Predicate; 1]>::try_from(alternatives) {
            Ok([single]) => Compiled::Single(single),
            Err(alternatives) if alternatives.is_empty() => Compiled::empty(),
            Err(alternatives) => Compiled::Any(alternatives),
        }
    }

    pub fn alternatives(&self) -> &[Predicate] {
        match self {
            Compiled::Single(predicate) => std::slice::from_ref(predicate),
            Compiled::Any(predicates) => predicates,
        }
    }

    pub fn len(&self) -> usize {
        self.alternatives().len()
    }

    /// True for the unconstrained predicate.
    pub fn is_empty(&self) -> bool {
        matches!(self, Compiled::Single(p) if p.is_empty())
    }

    /// Relations needed by any alternative.
    pub fn relations(&self) -> Relations {
        relations::infer_relations_all(self.alternatives())
    }
}

/// Compiles filter expressions with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
    encoder: ValueEncoder,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        let encoder = config.encoder();
        Self { config, encoder }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile an expression. `None` compiles to the empty predicate.
    pub fn compile(&self, expr: Option<&Expression>) -> CompileResult<Compiled> {
        let Some(expr) = expr else {
            tracing::debug!("no filter expression, compiling to empty predicate");
            return Ok(Compiled::empty());
        };

        let alternatives = self.walk(expr, 1)?;
        tracing::debug!(alternatives = alternatives.len(), "compiled filter expression");
        Ok(Compiled::collapse(alternatives))
    }

    /// Decode and compile a JSON expression. `null` compiles to the empty predicate.
    pub fn compile_json(&self, json: &serde_json::Value) -> CompileResult<Compiled> {
        if json.is_null() {
            return self.compile(None);
        }
        let expr = Expression::from_json(json)?;
        self.compile(Some(&expr))
    }

    fn walk(&self, node: &Expression, depth: usize) -> CompileResult<Vec<Predicate>> {
        if depth > self.config.max_depth {
            return Err(CompileError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        match node {
            Expression::And(children) => {
                tracing::trace!(depth, children = children.len(), "AND");
                let mut acc = vec![Predicate::new()];
                for child in children {
                    let candidates = self.walk(child, depth + 1)?;
                    self.check_fan_out(acc.len().saturating_mul(candidates.len()))?;
                    acc = cartesian_merge(&acc, &candidates);
                }
                Ok(acc)
            }
            Expression::Or(children) => {
                tracing::trace!(depth, children = children.len(), "OR");
                let mut union = Vec::new();
                for child in children {
                    union.extend(self.walk(child, depth + 1)?);
                    self.check_fan_out(union.len())?;
                }
                Ok(union)
            }
            Expression::Leaf(leaf) => Ok(vec![self.leaf(leaf)?]),
        }
    }

    fn leaf(&self, leaf: &Where) -> CompileResult<Predicate> {
        let mut predicate = Predicate::new();
        let value = match &leaf.value {
            Some(value) if leaf.has_field() => value,
            _ => {
                tracing::debug!(field = %leaf.field, "skipping leaf without field or value");
                return Ok(predicate);
            }
        };

        let operation = leaf.operation.unwrap_or(self.config.default_operation);
        let terminal = self.encoder.encode(value, operation)?;
        tracing::trace!(field = %leaf.field, %terminal, "encoded leaf");
        predicate.set_path(&leaf.field, terminal);
        Ok(predicate)
    }

    fn check_fan_out(&self, alternatives: usize) -> CompileResult<()> {
        if alternatives > self.config.max_alternatives {
            return Err(CompileError::TooManyAlternatives {
                limit: self.config.max_alternatives,
            });
        }
        Ok(())
    }
}

/// Compile with the default configuration.
pub fn compile(expr: Option<&Expression>) -> CompileResult<Compiled> {
    Compiler::default().compile(expr)
}
