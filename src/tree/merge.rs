//! Deep merge of trees and the cartesian merge used for AND.

use super::{Entry, Tree};

/// Merge `right` into a copy of `left`.
///
/// Where both sides hold a mapping under the same key the mappings are merged
/// recursively; anything else on the right (a terminal, or a mapping over a
/// terminal) replaces what was on the left. Neither input is modified.
pub fn deep_merge<T: Clone>(left: &Tree<T>, right: &Tree<T>) -> Tree<T> {
    let mut output = left.clone();
    for (key, incoming) in right.iter() {
        let merged = match (output.get(key), incoming) {
            (Some(Entry::Branch(existing)), Entry::Branch(branch)) => {
                Entry::Branch(deep_merge(existing, branch))
            }
            _ => incoming.clone(),
        };
        output.insert(key.clone(), merged);
    }
    output
}

/// Pairwise merge of every accumulated tree with every candidate.
///
/// The result has `acc.len() * candidates.len()` entries, ordered by
/// accumulated tree first.
pub fn cartesian_merge<T: Clone>(acc: &[Tree<T>], candidates: &[Tree<T>]) -> Vec<Tree<T>> {
    acc.iter()
        .flat_map(move |existing| {
            candidates
                .iter()
                .map(move |candidate| deep_merge(existing, candidate))
        })
        .collect()
}

impl<T: Clone> Tree<T> {
    /// See [`deep_merge`].
    pub fn merge(&self, other: &Tree<T>) -> Tree<T> {
        deep_merge(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(paths: &[(&str, i32)]) -> Tree<i32> {
        let mut t = Tree::new();
        for (path, value) in paths {
            t.set_path(path, *value);
        }
        t
    }

    #[test]
    fn test_merge_nested_siblings() {
        let left = tree(&[("user.person.name", 1)]);
        let right = tree(&[("user.person.age", 2), ("id", 3)]);
        let merged = deep_merge(&left, &right);

        assert_eq!(
            merged,
            tree(&[("user.person.name", 1), ("user.person.age", 2), ("id", 3)])
        );
        assert_eq!(left, tree(&[("user.person.name", 1)]));
        assert_eq!(right.len(), 2);
    }

    #[test]
    fn test_merge_right_leaf_overwrites() {
        let merged = deep_merge(&tree(&[("a.b", 1)]), &tree(&[("a", 9)]));
        assert_eq!(merged, tree(&[("a", 9)]));

        let merged = deep_merge(&tree(&[("a", 9)]), &tree(&[("a.b", 1)]));
        assert_eq!(merged, tree(&[("a.b", 1)]));

        let merged = deep_merge(&tree(&[("a", 1)]), &tree(&[("a", 2)]));
        assert_eq!(merged, tree(&[("a", 2)]));
    }

    #[test]
    fn test_cartesian_merge_size() {
        let acc = vec![tree(&[("a", 1)]), tree(&[("a", 2)])];
        let candidates = vec![tree(&[("b", 1)]), tree(&[("b", 2)]), tree(&[("b", 3)])];
        let out = cartesian_merge(&acc, &candidates);

        assert_eq!(out.len(), 6);
        assert_eq!(out[0], tree(&[("a", 1), ("b", 1)]));
        assert_eq!(out[5], tree(&[("a", 2), ("b", 3)]));
    }

    #[test]
    fn test_cartesian_merge_with_empty_side() {
        let acc = vec![Tree::<i32>::new()];
        assert!(cartesian_merge(&acc, &[]).is_empty());
    }
}
