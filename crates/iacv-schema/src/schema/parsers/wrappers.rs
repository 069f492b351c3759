//! Schema wrapper parser
//!
//! The `schema` key adds annotations to a schema without nesting them under
//! the type keyword:
//!
//! ```yaml
//! schema:
//!   anyOf: [boolean, string]
//! description: A boolean or string
//! ```

use crate::error::SchemaResult;
use iacv_yaml::Node;

use crate::schema::Schema;
use crate::schema::annotations::{merge_annotations, parse_annotations};
use crate::schema::helpers::invalid;
use crate::schema::parser::from_node;

pub(in crate::schema) fn parse_schema_wrapper(node: &Node) -> SchemaResult<Schema> {
    let inner = node
        .get("schema")
        .ok_or_else(|| invalid(node, "schema wrapper requires 'schema' key"))?;

    let inner_schema = from_node(inner)?;
    let outer_annotations = parse_annotations(node)?;
    let merged = merge_annotations(inner_schema.annotations().clone(), outer_annotations);

    Ok(inner_schema.with_annotations(merged))
}
