//! Property tests for merging and deduplication.
//!
//! Generated documents hold a `root.children` list whose items are keyed by
//! `name`. Every scalar attribute of an item is derived from its name, so
//! two items with the same name never disagree and always describe the same
//! entity.

use iacv_merge::{MergeOptions, deduplicate, items_match, merge, merge_documents};
use iacv_yaml::{Node, SourceInfo, Yaml};
use indexmap::IndexMap;
use proptest::prelude::*;

const NAMES: [&str; 4] = ["leaf-1", "leaf-2", "spine-1", "border"];
const TAGS: [&str; 3] = ["core", "edge", "lab"];

fn scalar(value: &str) -> Node {
    Node::new_scalar(Yaml::String(value.to_string()), SourceInfo::default())
}

fn mapping(entries: Vec<(String, Node)>) -> Node {
    Node::new_mapping(entries.into_iter().collect::<IndexMap<_, _>>(), SourceInfo::default())
}

fn sequence(items: Vec<Node>) -> Node {
    Node::new_sequence(items, SourceInfo::default())
}

fn child(name_index: usize, attributes: u8, tags: &[usize]) -> Node {
    let name = NAMES[name_index];
    let mut entries = vec![("name".to_string(), scalar(name))];
    for bit in 0..3 {
        if attributes & (1 << bit) != 0 {
            entries.push((format!("attr{bit}"), scalar(&format!("{name}-{bit}"))));
        }
    }
    if !tags.is_empty() {
        let tags = tags.iter().map(|t| scalar(TAGS[*t])).collect();
        entries.push(("tags".to_string(), sequence(tags)));
    }
    mapping(entries)
}

fn document(root_key: &'static str) -> impl Strategy<Value = Node> {
    let item = (0..NAMES.len(), 0u8..8, prop::collection::vec(0..TAGS.len(), 0..3));
    (
        prop::collection::vec(item, 0..6),
        prop::collection::vec(0..TAGS.len(), 0..4),
    )
        .prop_map(move |(children, tags)| {
            let children = children
                .iter()
                .map(|(name, attributes, tags)| child(*name, *attributes, tags))
                .collect();
            let tags = tags.iter().map(|t| scalar(TAGS[*t])).collect();
            let root = mapping(vec![
                ("children".to_string(), sequence(children)),
                ("tags".to_string(), sequence(tags)),
            ]);
            mapping(vec![(root_key.to_string(), root)])
        })
}

fn normalized(mut node: Node) -> Node {
    deduplicate(&mut node);
    node
}

/// Assert that no two items of any sequence in `node` match.
fn assert_no_matching_items(node: &Node) {
    if let Some(items) = node.as_sequence() {
        for (i, a) in items.iter().enumerate() {
            for b in &items[i + 1..] {
                assert!(!items_match(a, b), "matching items remain: {a:?} / {b:?}");
            }
        }
        items.iter().for_each(assert_no_matching_items);
    }
    if let Some(entries) = node.as_mapping() {
        entries.values().for_each(assert_no_matching_items);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Merging the same document a second time changes nothing.
    #[test]
    fn merge_is_idempotent(a in document("root"), b in document("root")) {
        let options = MergeOptions::default();

        let mut once = normalized(a);
        merge(b.clone(), &mut once, &options);

        let mut twice = once.clone();
        merge(b, &mut twice, &options);

        prop_assert_eq!(twice, once);
    }

    /// A document merged into itself does not grow any sequence.
    #[test]
    fn self_merge_does_not_grow(a in document("root")) {
        let a = normalized(a);
        let mut tree = a.clone();
        merge(a.clone(), &mut tree, &MergeOptions::default());
        prop_assert_eq!(tree, a);
    }

    /// After loading, no sequence holds two items describing one entity.
    #[test]
    fn merged_sequences_hold_no_matching_items(
        docs in prop::collection::vec(document("root"), 1..4)
    ) {
        let tree = merge_documents(docs, &MergeOptions::default());
        assert_no_matching_items(&tree);
    }

    /// Deduplication applied twice is the same as applied once.
    #[test]
    fn deduplicate_is_idempotent(a in document("root")) {
        let once = normalized(a);
        let twice = normalized(once.clone());
        prop_assert_eq!(twice, once);
    }

    /// Documents with disjoint keys merge to the same tree in any order.
    #[test]
    fn disjoint_documents_commute(a in document("alpha"), b in document("beta")) {
        let options = MergeOptions::default();
        let forward = merge_documents(vec![a.clone(), b.clone()], &options);
        let backward = merge_documents(vec![b, a], &options);
        prop_assert_eq!(forward, backward);
    }

    /// Every child name of every input survives the merge exactly once.
    #[test]
    fn every_entity_survives_once(
        docs in prop::collection::vec(document("root"), 1..4)
    ) {
        let mut expected: Vec<String> = docs
            .iter()
            .filter_map(|d| d.get_path(&["root", "children"]))
            .filter_map(Node::as_sequence)
            .flatten()
            .filter_map(|c| c.get("name").and_then(Node::as_str).map(str::to_string))
            .collect();
        expected.sort();
        expected.dedup();

        let tree = merge_documents(docs, &MergeOptions::default());
        let mut names: Vec<String> = tree
            .get_path(&["root", "children"])
            .and_then(Node::as_sequence)
            .unwrap_or_default()
            .iter()
            .filter_map(|c| c.get("name").and_then(Node::as_str).map(str::to_string))
            .collect();
        names.sort();

        prop_assert_eq!(names, expected);
    }
}
