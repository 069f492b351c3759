//! Schema parsing entry point.
//!
//! A schema is written in one of three forms:
//!
//! - a type name: `string`, `integer`, `number`, `boolean`, `null`, `any`,
//!   `object`, `array`, or `true` / `false`;
//! - a list, which is shorthand for an enum of its values;
//! - a mapping with one type keyword whose value holds the parameters,
//!   optionally next to `description` / `errorMessage` annotations:
//!
//! ```yaml
//! object:
//!   properties:
//!     name:
//!       string:
//!         pattern: "^[a-z0-9-]+$"
//!     vlan:
//!       integer: {minimum: 1, maximum: 4094}
//!   required: [name]
//! description: A network device
//! ```

use crate::error::{SchemaError, SchemaResult};
use iacv_yaml::{Node, NodeKind};
use yaml_rust2::Yaml;

use super::Schema;
use super::annotations::{merge_annotations, parse_annotations};
use super::helpers::invalid;
use super::parsers::{
    parse_allof_schema, parse_any_schema, parse_anyof_schema, parse_array_schema,
    parse_arrayof_schema, parse_boolean_schema, parse_enum_schema, parse_null_schema,
    parse_number_schema, parse_object_schema, parse_ref_schema, parse_schema_wrapper,
    parse_string_schema,
};

/// Keywords that select a schema type in the mapping form.
const TYPE_KEYWORDS: &[&str] = &[
    "boolean", "number", "integer", "string", "null", "any", "enum", "anyOf", "allOf", "array",
    "arrayOf", "object", "ref", "$ref",
];

/// Parse a schema from a node
pub(super) fn from_node(node: &Node) -> SchemaResult<Schema> {
    match &node.kind {
        NodeKind::Scalar(Yaml::Boolean(true)) => Ok(Schema::True),
        NodeKind::Scalar(Yaml::Boolean(false)) => Ok(Schema::False),
        NodeKind::Scalar(Yaml::String(name)) => parse_short_form(name, node),
        // a bare `null` is read as the null value, not the string
        NodeKind::Scalar(Yaml::Null) => parse_short_form("null", node),
        NodeKind::Scalar(_) => Err(invalid(
            node,
            "schema must be a type name, a list of values or a mapping",
        )),
        NodeKind::Sequence(_) => parse_enum_schema(node),
        NodeKind::Mapping(entries) => {
            if entries.contains_key("schema") {
                return parse_schema_wrapper(node);
            }

            let Some((keyword, params)) = entries
                .iter()
                .find(|(key, _)| TYPE_KEYWORDS.contains(&key.as_str()))
            else {
                let name = entries.keys().next().cloned().unwrap_or_default();
                return Err(SchemaError::InvalidType {
                    name,
                    location: node.source_info.clone(),
                });
            };

            let schema = parse_keyword(keyword, params)?;
            let outer = parse_annotations(node)?;
            let annotations = merge_annotations(schema.annotations().clone(), outer);
            Ok(schema.with_annotations(annotations))
        }
    }
}

/// Parse a bare type name such as `string`
fn parse_short_form(name: &str, node: &Node) -> SchemaResult<Schema> {
    match name {
        "boolean" | "number" | "integer" | "string" | "null" | "any" | "object" | "array" => {
            parse_keyword(name, &Node::new_scalar(Yaml::Null, node.source_info.clone()))
        }
        _ => Err(SchemaError::InvalidType {
            name: name.to_string(),
            location: node.source_info.clone(),
        }),
    }
}

/// Parse the parameters of a type keyword
fn parse_keyword(keyword: &str, params: &Node) -> SchemaResult<Schema> {
    match keyword {
        "boolean" => parse_boolean_schema(params),
        "number" => parse_number_schema(params, false),
        "integer" => parse_number_schema(params, true),
        "string" => parse_string_schema(params),
        "null" => parse_null_schema(params),
        "any" => parse_any_schema(params),
        "enum" => parse_enum_schema(params),
        "anyOf" => parse_anyof_schema(params),
        "allOf" => parse_allof_schema(params),
        "array" => parse_array_schema(params),
        "arrayOf" => parse_arrayof_schema(params),
        "object" => parse_object_schema(params),
        "ref" | "$ref" => parse_ref_schema(params),
        other => Err(SchemaError::InvalidType {
            name: other.to_string(),
            location: params.source_info.clone(),
        }),
    }
}
