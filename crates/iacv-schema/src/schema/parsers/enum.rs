//! Enum schema parser
//!
//! Supports both inline and explicit forms:
//! - Inline: enum: [val1, val2, val3]
//! - Explicit: enum: { values: [...], description: "..." }

use crate::error::SchemaResult;
use iacv_yaml::Node;

use crate::schema::Schema;
use crate::schema::annotations::parse_annotations;
use crate::schema::helpers::{invalid, scalar_to_json_value};
use crate::schema::types::EnumSchema;

/// Parse an enum schema
pub(in crate::schema) fn parse_enum_schema(node: &Node) -> SchemaResult<Schema> {
    let annotations = parse_annotations(node)?;

    let items = if let Some(values) = node.get("values") {
        values
            .as_sequence()
            .ok_or_else(|| invalid(values, "enum values must be an array"))?
    } else {
        node.as_sequence()
            .ok_or_else(|| invalid(node, "Expected array for inline enum"))?
    };

    let values: SchemaResult<Vec<_>> = items.iter().map(scalar_to_json_value).collect();

    Ok(Schema::Enum(EnumSchema {
        annotations,
        values: values?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use iacv_yaml::parse;

    #[test]
    fn test_explicit_form() {
        let node = parse("values: [1, two, true]\ndescription: mixed").unwrap();
        match parse_enum_schema(&node).unwrap() {
            Schema::Enum(e) => {
                assert_eq!(
                    e.values,
                    vec![
                        serde_json::json!(1),
                        serde_json::json!("two"),
                        serde_json::json!(true)
                    ]
                );
                assert_eq!(e.annotations.description.as_deref(), Some("mixed"));
            }
            other => panic!("Expected Enum schema, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_values_rejected() {
        let node = parse("[[a]]").unwrap();
        assert!(parse_enum_schema(&node).is_err());
    }
}
