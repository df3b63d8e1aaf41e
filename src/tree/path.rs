//! Read, write, and enumerate dotted paths inside a [`Tree`].

use std::collections::BTreeSet;

use super::{Entry, Tree, join_path};

/// Walk `path` segment by segment.
///
/// Returns `None` when any segment is absent or a terminal is reached
/// before the last segment.
pub fn get_at_path<'a, T>(path: &str, tree: &'a Tree<T>) -> Option<&'a Entry<T>> {
    let mut segments = path.split('.');
    let mut entry = tree.get(segments.next()?)?;
    for segment in segments {
        entry = entry.as_branch()?.get(segment)?;
    }
    Some(entry)
}

/// Assign `value` at `path`, creating intermediate mappings as needed.
///
/// Existing intermediate mappings are reused so their other keys survive.
/// An intermediate terminal is replaced by a mapping; the final segment is
/// always overwritten.
pub fn set_at_path<T>(path: &str, tree: &mut Tree<T>, value: T) {
    let (parents, last) = match path.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, path),
    };

    let mut current = tree;
    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        current = current.branch_mut(segment);
    }
    current.insert(last, Entry::Leaf(value));
}

/// Every distinct terminal path of `tree`, depth first in insertion order.
///
/// Empty mappings contribute no path.
pub fn unique_leaf_paths<T>(tree: &Tree<T>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut paths = Vec::new();
    collect_paths(tree, "", &mut seen, &mut paths);
    paths
}

fn collect_paths<T>(
    tree: &Tree<T>,
    prefix: &str,
    seen: &mut BTreeSet<String>,
    paths: &mut Vec<String>,
) {
    for (key, entry) in tree.iter() {
        let path = join_path(prefix, key);
        match entry {
            Entry::Branch(child) => collect_paths(child, &path, seen, paths),
            Entry::Leaf(_) => {
                if seen.insert(path.clone()) {
                    paths.push(path);
                }
            }
        }
    }
}
