//! Nested mappings keyed by dotted paths.
//!
//! A [`Tree`] mirrors the shape of a dotted field path: `user.person.name`
//! becomes `{user: {person: {name: <leaf>}}}`. The same structure carries
//! compiled predicates, relation markers, and sort directions.

pub mod merge;
pub mod path;

use indexmap::IndexMap;
use serde::Serialize;

pub use self::merge::{cartesian_merge, deep_merge};
pub use self::path::{get_at_path, set_at_path, unique_leaf_paths};

/// A nested mapping whose terminals are `T`.
///
/// Keys keep their insertion order, which is also the serialized order.
/// Overwriting a key keeps its original position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tree<T> {
    entries: IndexMap<String, Entry<T>>,
}

/// A value inside a [`Tree`]: either a nested mapping or a terminal.
///
/// The variant is the only thing that decides whether merge recurses into a
/// value; terminals are never merged into.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry<T> {
    Branch(Tree<T>),
    Leaf(T),
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&Entry<T>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: Entry<T>) -> Option<Entry<T>> {
        self.entries.insert(key.into(), entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Entry<T>)> {
        self.entries.iter()
    }

    /// Look up the entry at a dotted path. See [`get_at_path`].
    pub fn get_path(&self, path: &str) -> Option<&Entry<T>> {
        get_at_path(path, self)
    }

    /// Set a terminal at a dotted path. See [`set_at_path`].
    pub fn set_path(&mut self, path: &str, value: T) {
        set_at_path(path, self, value)
    }

    /// Every terminal with its dotted path, depth first in insertion order.
    pub fn leaves(&self) -> Vec<(String, &T)> {
        let mut out = Vec::new();
        self.collect_leaves("", &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a T)>) {
        for (key, entry) in &self.entries {
            let path = join_path(prefix, key);
            match entry {
                Entry::Branch(tree) => tree.collect_leaves(&path, out),
                Entry::Leaf(value) => out.push((path, value)),
            }
        }
    }

    /// The child mapping at `key`, created if absent. A terminal at `key` is
    /// replaced by an empty mapping.
    pub(crate) fn branch_mut(&mut self, key: &str) -> &mut Tree<T> {
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Branch(Tree::new()))
            .make_branch()
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Entry<T> {
    pub fn as_branch(&self) -> Option<&Tree<T>> {
        match self {
            Entry::Branch(tree) => Some(tree),
            Entry::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&T> {
        match self {
            Entry::Branch(_) => None,
            Entry::Leaf(value) => Some(value),
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Entry::Branch(_))
    }

    fn make_branch(&mut self) -> &mut Tree<T> {
        if let Entry::Leaf(_) = self {
            *self = Entry::Branch(Tree::new());
        }
        match self {
            Entry::Branch(tree) => tree,
            Entry::Leaf(_) => unreachable!("leaf was replaced by a branch"),
        }
    }
}

impl<T> FromIterator<(String, Entry<T>)> for Tree<T> {
    fn from_iter<I: IntoIterator<Item = (String, Entry<T>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_as_nested_object() {
        let mut tree = Tree::new();
        tree.set_path("user.person.name", "x");
        tree.set_path("user.age", "y");
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"user": {"age": "y", "person": {"name": "x"}}})
        );
    }

    #[test]
    fn test_leaves_depth_first() {
        let mut tree = Tree::new();
        tree.set_path("b", 2);
        tree.set_path("a.c", 1);
        let leaves: Vec<(String, i32)> = tree.leaves().into_iter().map(|(p, v)| (p, *v)).collect();
        assert_eq!(leaves, vec![("b".to_string(), 2), ("a.c".to_string(), 1)]);
    }

    #[test]
    fn test_overwrite_keeps_key_position() {
        let mut tree = Tree::new();
        tree.set_path("z", 1);
        tree.set_path("a", 2);
        tree.set_path("z", 3);
        assert_eq!(serde_json::to_string(&tree).unwrap(), r#"{"z":3,"a":2}"#);
    }

    #[test]
    fn test_branch_mut_replaces_leaf() {
        let mut tree = Tree::new();
        tree.set_path("a", 1);
        tree.branch_mut("a").set_path("b", 2);
        assert_eq!(tree.get_path("a.b"), Some(&Entry::Leaf(2)));
    }
}
