//! Combinator schema parsers
//!
//! - anyOf: validates if any subschema matches
//! - allOf: validates if all subschemas match
//!
//! Both support the inline list form and the explicit form with a
//! `schemas` key next to annotations.

use crate::error::SchemaResult;
use iacv_yaml::Node;

use crate::schema::Schema;
use crate::schema::annotations::parse_annotations;
use crate::schema::helpers::invalid;
use crate::schema::parser::from_node;
use crate::schema::types::{AllOfSchema, AnyOfSchema, SchemaAnnotations};

fn parse_alternatives(node: &Node, keyword: &str) -> SchemaResult<(SchemaAnnotations, Vec<Schema>)> {
    let annotations = parse_annotations(node)?;

    let items = if let Some(schemas) = node.get("schemas") {
        schemas
            .as_sequence()
            .ok_or_else(|| invalid(schemas, format!("{} schemas must be an array", keyword)))?
    } else {
        node.as_sequence()
            .ok_or_else(|| invalid(node, format!("Expected array for {}", keyword)))?
    };

    let schemas: SchemaResult<Vec<_>> = items.iter().map(from_node).collect();
    Ok((annotations, schemas?))
}

/// Parse an anyOf schema
pub(in crate::schema) fn parse_anyof_schema(node: &Node) -> SchemaResult<Schema> {
    let (annotations, schemas) = parse_alternatives(node, "anyOf")?;
    Ok(Schema::AnyOf(AnyOfSchema {
        annotations,
        schemas,
    }))
}

/// Parse an allOf schema
pub(in crate::schema) fn parse_allof_schema(node: &Node) -> SchemaResult<Schema> {
    let (annotations, schemas) = parse_alternatives(node, "allOf")?;
    Ok(Schema::AllOf(AllOfSchema {
        annotations,
        schemas,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use iacv_yaml::parse;

    #[test]
    fn test_anyof_inline_array() {
        let node = parse("[string, boolean]").unwrap();
        match parse_anyof_schema(&node).unwrap() {
            Schema::AnyOf(s) => assert_eq!(s.schemas.len(), 2),
            other => panic!("Expected AnyOf schema, got {other:?}"),
        }
    }

    #[test]
    fn test_allof_explicit_form() {
        let node = parse("schemas:\n  - string\n  - string: {minLength: 2}\ndescription: both").unwrap();
        match parse_allof_schema(&node).unwrap() {
            Schema::AllOf(s) => {
                assert_eq!(s.schemas.len(), 2);
                assert_eq!(s.annotations.description.as_deref(), Some("both"));
            }
            other => panic!("Expected AllOf schema, got {other:?}"),
        }
    }

    #[test]
    fn test_schemas_not_array_error() {
        let node = parse("schemas: not an array").unwrap();
        match parse_anyof_schema(&node).unwrap_err() {
            SchemaError::InvalidStructure { message, .. } => {
                assert!(message.contains("anyOf schemas must be an array"));
            }
            other => panic!("Expected InvalidStructure error, got {other:?}"),
        }
    }
}
