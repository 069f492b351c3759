//! # iacv-yaml
//!
//! YAML parsing with source location tracking.
//!
//! This crate turns YAML text into [`Node`] trees where every value carries
//! the file, line and column it was read from. Locations survive merging, so
//! diagnostics about a merged document can still point at the input file a
//! value came from.
//!
//! Two custom scalar tags are resolved while parsing: `!env NAME` reads an
//! environment variable and `!vault CIPHERTEXT` is decrypted through a
//! pluggable [`Decryptor`].
//!
//! ## Example
//!
//! ```rust
//! use iacv_yaml::parse_file;
//!
//! let node = parse_file("root:\n  name: leaf\n", "data.yaml").unwrap();
//! let name = node.get_path(&["root", "name"]).unwrap();
//! assert_eq!(name.source_info.line, 2);
//! ```

mod emit;
mod error;
mod node;
mod parser;
mod source_info;
pub mod tags;

pub use emit::{EmitError, to_yaml_string, write_yaml_file};
pub use error::{Error, Result};
pub use node::{Node, NodeKind, scalar_to_string, yaml_type_name};
pub use parser::{parse, parse_file, parse_path, parse_with_resolver};
pub use source_info::SourceInfo;
pub use tags::{AnsibleVaultDecryptor, CustomTag, Decryptor, TagError, TagResolver};

pub use yaml_rust2::Yaml;
