//! Reference schema parser
//!
//! `ref: name` and `$ref: name` point at an entry of the schema file's
//! `definitions`; they are resolved during validation.

use crate::error::SchemaResult;
use iacv_yaml::Node;

use crate::schema::Schema;
use crate::schema::helpers::invalid;
use crate::schema::types::RefSchema;

pub(in crate::schema) fn parse_ref_schema(node: &Node) -> SchemaResult<Schema> {
    let reference = node
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(node, "ref must be a string"))?;

    Ok(Schema::Ref(RefSchema {
        annotations: Default::default(),
        reference,
    }))
}
