//! # serafim
//!
//! Compiles declarative filter trees into the nested predicate shape a
//! relational persistence layer takes for its `where`, `relations`, and
//! `order` options.
//!
//! ```
//! use serafim::prelude::*;
//!
//! let filter = and([
//!     eq("store.id", 123),
//!     or([ilike("name", "ann"), ilike("email", "ann")]),
//! ]);
//!
//! let compiled = compile(Some(&filter)).unwrap();
//! // AND over a two-way OR yields two alternatives.
//! assert_eq!(compiled.len(), 2);
//!
//! let relations = compiled.relations();
//! assert!(relations.contains_key("store"));
//! ```
//!
//! Filters can also be decoded from JSON:
//!
//! ```
//! use serafim::prelude::*;
//! use serde_json::json;
//!
//! let compiled = Compiler::default()
//!     .compile_json(&json!({"$or": [
//!         {"field": "user.person.name", "operation": "LIKE", "value": "ann"},
//!         {"field": "deletedAt", "value": null}
//!     ]}))
//!     .unwrap();
//! assert_eq!(compiled.len(), 2);
//! ```

pub mod ast;
pub mod compiler;
pub mod config;
pub mod encoder;
pub mod error;
pub mod tree;

pub use ast::{Expression, Operation, Order, Search, SortOrder, Value, Where};
pub use compiler::{
    Compiled, Compiler, FindOptions, OrderBy, Predicate, Relations, compile, encode_order,
    find_options, infer_relations,
};
pub use config::CompilerConfig;
pub use encoder::{Terminal, ValueEncoder, encode};
pub use error::CompileError;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::{Expression, Operation, Order, Search, SortOrder, Value, Where};
    pub use crate::compiler::{
        Compiled, Compiler, FindOptions, Predicate, compile, encode_order, find_options,
        infer_relations,
    };
    pub use crate::config::CompilerConfig;
    pub use crate::encoder::{Comparison, Operand, Terminal};
    pub use crate::error::CompileError;
}
