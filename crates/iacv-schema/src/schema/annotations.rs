//! Schema annotation parsing

use crate::error::SchemaResult;
use iacv_yaml::Node;

use super::helpers::get_string;
use super::types::SchemaAnnotations;

/// Static empty annotations for False and True schemas
pub(super) static EMPTY_ANNOTATIONS: SchemaAnnotations = SchemaAnnotations {
    description: None,
    error_message: None,
};

/// Parse common annotations from a schema mapping
///
/// Non-mapping nodes carry no annotations.
pub(super) fn parse_annotations(node: &Node) -> SchemaResult<SchemaAnnotations> {
    Ok(SchemaAnnotations {
        description: get_string(node, "description")?,
        error_message: get_string(node, "errorMessage")?,
    })
}

/// Merge outer annotations with inner annotations; outer ones win.
pub(super) fn merge_annotations(
    inner: SchemaAnnotations,
    outer: SchemaAnnotations,
) -> SchemaAnnotations {
    SchemaAnnotations {
        description: outer.description.or(inner.description),
        error_message: outer.error_message.or(inner.error_message),
    }
}
