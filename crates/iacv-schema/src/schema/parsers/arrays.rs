//! Array schema parsers
//!
//! - array: { items, minItems, maxItems, uniqueItems }
//! - arrayOf: <schema>, or arrayOf: { schema: <schema>, length: N }

use crate::error::SchemaResult;
use iacv_yaml::Node;

use super::check_params;
use crate::schema::Schema;
use crate::schema::annotations::parse_annotations;
use crate::schema::helpers::{get_bool, get_usize};
use crate::schema::parser::from_node;
use crate::schema::types::ArraySchema;

/// Parse an array schema
///
/// ```yaml
/// array:
///   items: string
///   minItems: 1
///   uniqueItems: true
/// ```
pub(in crate::schema) fn parse_array_schema(params: &Node) -> SchemaResult<Schema> {
    check_params(params, "array")?;
    let items = match params.get("items") {
        Some(items) => Some(Box::new(from_node(items)?)),
        None => None,
    };

    Ok(Schema::Array(ArraySchema {
        annotations: parse_annotations(params)?,
        items,
        min_items: get_usize(params, "minItems")?,
        max_items: get_usize(params, "maxItems")?,
        unique_items: get_bool(params, "uniqueItems")?,
    }))
}

/// Parse the arrayOf shorthand
///
/// The `length` property of the long form sets both minItems and maxItems.
pub(in crate::schema) fn parse_arrayof_schema(node: &Node) -> SchemaResult<Schema> {
    if let Some(schema) = node.get("schema") {
        let length = get_usize(node, "length")?;
        return Ok(Schema::Array(ArraySchema {
            annotations: parse_annotations(node)?,
            items: Some(Box::new(from_node(schema)?)),
            min_items: length,
            max_items: length,
            unique_items: None,
        }));
    }

    Ok(Schema::Array(ArraySchema {
        annotations: Default::default(),
        items: Some(Box::new(from_node(node)?)),
        min_items: None,
        max_items: None,
        unique_items: None,
    }))
}
