//! Recursive merge of one tree into another.

use crate::list::{deduplicate, merge_list_item};
use iacv_yaml::{Node, NodeKind};

/// Options controlling [`merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Reconcile sequence items instead of concatenating sequences.
    ///
    /// Defaults to `true`.
    pub deduplicate: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self { deduplicate: true }
    }
}

/// Merge `source` into `destination` in place.
///
/// - mapping into mapping: absent keys are inserted, present keys merge
///   recursively;
/// - sequence into sequence: every incoming item goes through
///   [`merge_list_item`], or is appended when deduplication is off;
/// - anything else: `source` replaces `destination`.
///
/// Replaced and inserted values keep the source location they were parsed
/// from. Recursion follows the depth of `source` only.
///
/// With deduplication on, `source` is normalized with [`deduplicate`] first,
/// so merging the same document twice gives the same tree as merging it
/// once.
pub fn merge(mut source: Node, destination: &mut Node, options: &MergeOptions) {
    if options.deduplicate {
        deduplicate(&mut source);
    }
    merge_normalized(source, destination, options);
}

/// [`merge`] for a `source` whose sequences are already normalized.
pub(crate) fn merge_normalized(source: Node, destination: &mut Node, options: &MergeOptions) {
    let Node { kind, source_info } = source;
    match kind {
        NodeKind::Mapping(entries) if destination.is_mapping() => {
            let Some(target) = destination.as_mapping_mut() else {
                return;
            };
            for (key, value) in entries {
                match target.get_mut(&key) {
                    Some(existing) => merge_normalized(value, existing, options),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        NodeKind::Sequence(items) if destination.is_sequence() => {
            let Some(target) = destination.as_sequence_mut() else {
                return;
            };
            if options.deduplicate {
                for item in items {
                    merge_list_item(item, target, options);
                }
            } else {
                target.extend(items);
            }
        }
        kind => *destination = Node { kind, source_info },
    }
}

/// Fold documents in order into an empty mapping, then normalize every
/// sequence of the result with [`deduplicate`].
pub fn merge_documents<I>(documents: I, options: &MergeOptions) -> Node
where
    I: IntoIterator<Item = Node>,
{
    let mut tree = Node::empty_mapping();
    for document in documents {
        merge(document, &mut tree, options);
    }
    if options.deduplicate {
        deduplicate(&mut tree);
    }
    tree
}
