//! Sequence item reconciliation.

use crate::merge::{MergeOptions, merge_normalized};
use iacv_yaml::{Node, NodeKind};
use indexmap::IndexMap;

/// Whether two sequence items describe the same entity.
///
/// Mapping items match when every key that is scalar-valued on one side and
/// present on the other holds equal values, and at least one such key was
/// compared. Keys defined on only one side are ignored, as are keys whose
/// value is a mapping or sequence on both sides. Structurally identical
/// items always match. Any other pair matches by equality.
pub fn items_match(a: &Node, b: &Node) -> bool {
    match (&a.kind, &b.kind) {
        (NodeKind::Mapping(left), NodeKind::Mapping(right)) => {
            if left == right {
                return true;
            }
            let (compared_left, agree_left) = compare_scalar_keys(left, right);
            let (compared_right, agree_right) = compare_scalar_keys(right, left);
            (compared_left || compared_right) && agree_left && agree_right
        }
        _ => a == b,
    }
}

/// Compare the scalar-valued keys of `from` against `other`.
///
/// Returns `(comparison, match)`.
fn compare_scalar_keys(from: &IndexMap<String, Node>, other: &IndexMap<String, Node>) -> (bool, bool) {
    let mut comparison = false;
    let mut matched = true;
    for (key, value) in from {
        if !value.is_scalar() {
            continue;
        }
        let Some(counterpart) = other.get(key) else {
            continue;
        };
        comparison = true;
        if value != counterpart {
            matched = false;
        }
    }
    (comparison, matched)
}

/// Merge `item` into `destination`.
///
/// The first matching item absorbs `item` when both are mappings; any other
/// match means `item` is a duplicate and is dropped. Without a match, `item`
/// is appended. `item` is expected to be normalized already (see
/// [`deduplicate`]).
///
/// Enriching an item can make it match a later (or earlier) item it did not
/// match before. Such items are folded into the earlier of the two, so no two
/// items of `destination` match each other afterwards, provided none did
/// before.
pub fn merge_list_item(item: Node, destination: &mut Vec<Node>, options: &MergeOptions) {
    let Some(index) = destination
        .iter()
        .position(|existing| items_match(&item, existing))
    else {
        destination.push(item);
        return;
    };

    if item.is_mapping() && destination[index].is_mapping() {
        merge_normalized(item, &mut destination[index], options);
        coalesce(destination, index, options);
    }
}

/// Fold any item matching `items[index]` into the earlier of the pair,
/// repeating until nothing matches.
fn coalesce(items: &mut Vec<Node>, mut index: usize, options: &MergeOptions) {
    loop {
        let partner = items
            .iter()
            .enumerate()
            .position(|(other, candidate)| other != index && items_match(&items[index], candidate));
        let Some(other) = partner else {
            return;
        };

        let (keep, fold) = if other < index {
            (other, index)
        } else {
            (index, other)
        };
        tracing::trace!(keep, fold, "coalescing matching sequence items");
        let folded = items.remove(fold);
        if folded.is_mapping() && items[keep].is_mapping() {
            merge_normalized(folded, &mut items[keep], options);
        }
        index = keep;
    }
}

/// Normalize every sequence in `node` so that no two of its items match.
///
/// Works bottom-up: nested sequences are normalized before the sequence
/// containing them. Applying it twice changes nothing.
pub fn deduplicate(node: &mut Node) {
    match &mut node.kind {
        NodeKind::Scalar(_) => {}
        NodeKind::Mapping(entries) => {
            for value in entries.values_mut() {
                deduplicate(value);
            }
        }
        NodeKind::Sequence(items) => {
            for item in items.iter_mut() {
                deduplicate(item);
            }
            let options = MergeOptions::default();
            let mut placed = Vec::with_capacity(items.len());
            for item in std::mem::take(items) {
                merge_list_item(item, &mut placed, &options);
            }
            *items = placed;
        }
    }
}
