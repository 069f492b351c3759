//! Dotted paths into the document tree.
//!
//! `root.children.name` follows mapping keys. A sequence met along the way
//! is flattened: the rest of the path is applied to each of its items, so
//! the path above visits the `name` of every child.

use iacv_yaml::Node;

/// Every node reached by `path`, in document order.
pub fn select<'a>(tree: &'a Node, path: &str) -> Vec<&'a Node> {
    let keys: Vec<&str> = path.split('.').filter(|key| !key.is_empty()).collect();
    let mut found = Vec::new();
    walk(tree, &keys, &mut found);
    found
}

/// Text of every scalar reached by `path`; sequences at the end are
/// flattened too.
pub fn select_values(tree: &Node, path: &str) -> Vec<String> {
    let mut values = Vec::new();
    for node in select(tree, path) {
        collect_scalars(node, &mut values);
    }
    values
}

fn walk<'a>(node: &'a Node, keys: &[&str], found: &mut Vec<&'a Node>) {
    if let Some(items) = node.as_sequence() {
        for item in items {
            walk(item, keys, found);
        }
        return;
    }

    match keys.split_first() {
        None => found.push(node),
        Some((key, rest)) => {
            if let Some(child) = node.get(key) {
                walk(child, rest, found);
            }
        }
    }
}

fn collect_scalars(node: &Node, values: &mut Vec<String>) {
    match node.as_sequence() {
        Some(items) => items.iter().for_each(|item| collect_scalars(item, values)),
        None => {
            if !node.is_null()
                && let Some(text) = node.scalar_text()
            {
                values.push(text);
            }
        }
    }
}
