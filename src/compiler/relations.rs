//! Relation inference: which relation paths a predicate joins through.
//!
//! Every terminal path minus its last segment names a relation to load:
//! `user.person.name` needs `user.person`, a top-level `name` needs nothing.

use crate::tree::{Entry, Tree, unique_leaf_paths};

/// Nested relation markers, e.g. `{user: {person: true}}`.
pub type Relations = Tree<bool>;

pub fn infer_relations<T>(predicate: &Tree<T>) -> Relations {
    let mut relations = Relations::new();
    add_relations(predicate, &mut relations);
    relations
}

/// Union of the relations of several predicates.
pub fn infer_relations_all<T>(predicates: &[Tree<T>]) -> Relations {
    let mut relations = Relations::new();
    for predicate in predicates {
        add_relations(predicate, &mut relations);
    }
    relations
}

fn add_relations<T>(predicate: &Tree<T>, relations: &mut Relations) {
    for path in unique_leaf_paths(predicate) {
        let Some((prefix, _)) = path.rsplit_once('.') else {
            continue;
        };
        // A deeper relation already implies this one.
        if relations.get_path(prefix).is_some_and(Entry::is_branch) {
            continue;
        }
        relations.set_path(prefix, true);
    }
}
