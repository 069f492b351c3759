//! Merging of parsed documents into one tree.
//!
//! Documents are folded one at a time into an accumulator with [`merge`].
//! Mappings merge key by key, sequences are reconciled item by item, and any
//! other combination lets the incoming value win.
//!
//! # Sequence items
//!
//! Two mapping items describe the same entity when they agree on every
//! scalar key they both define and define at least one such key in common
//! (see [`items_match`]). Matching items are merged, so a list entry can be
//! specified partially in one file and enriched in another:
//!
//! ```rust
//! use iacv_merge::{MergeOptions, merge};
//! use iacv_yaml::parse;
//!
//! let mut tree = parse("root:\n  children:\n    - name: a\n").unwrap();
//! let other = parse("root:\n  children:\n    - name: a\n      extra: v\n").unwrap();
//! merge(other, &mut tree, &MergeOptions::default());
//!
//! let children = tree.get_path(&["root", "children"]).unwrap();
//! assert_eq!(children.len(), 1);
//! ```
//!
//! Scalar items are dropped when an equal item is already present.

mod list;
mod merge;

pub use list::{deduplicate, items_match, merge_list_item};
pub use merge::{MergeOptions, merge, merge_documents};
