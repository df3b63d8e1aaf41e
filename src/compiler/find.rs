use serde::Serialize;

use crate::ast::Search;
use crate::compiler::{Compiled, Compiler, OrderBy, Relations, encode_order};
use crate::error::CompileResult;

/// Everything a find call needs from a [`Search`]: the compiled `where`,
/// the relations it joins through, and the ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindOptions {
    #[serde(rename = "where")]
    pub filter: Compiled,
    pub relations: Relations,
    pub order: OrderBy,
}

impl Compiler {
    pub fn find_options(&self, search: &Search) -> CompileResult<FindOptions> {
        let filter = self.compile(search.filter.as_ref())?;
        let relations = filter.relations();
        Ok(FindOptions {
            filter,
            relations,
            order: encode_order(&search.order),
        })
    }
}

/// [`Compiler::find_options`] with the default configuration.
pub fn find_options(search: &Search) -> CompileResult<FindOptions> {
    Compiler::default().find_options(search)
}
