//! Object schema parser
//!
//! ```yaml
//! object:
//!   properties:
//!     name: string
//!   patternProperties:
//!     "^x-": any
//!   additionalProperties: false
//!   required: [name]        # or `all`
//!   closed: true
//!   minProperties: 1
//! ```

use crate::error::SchemaResult;
use iacv_yaml::Node;
use indexmap::IndexMap;

use super::check_params;
use crate::schema::Schema;
use crate::schema::annotations::parse_annotations;
use crate::schema::helpers::{compile_pattern, get_bool, get_string_array, get_usize, invalid};
use crate::schema::parser::from_node;
use crate::schema::types::ObjectSchema;

pub(in crate::schema) fn parse_object_schema(params: &Node) -> SchemaResult<Schema> {
    check_params(params, "object")?;

    let mut properties = IndexMap::new();
    if let Some(node) = params.get("properties") {
        let entries = node
            .as_mapping()
            .ok_or_else(|| invalid(node, "properties must be a mapping"))?;
        for (key, value) in entries {
            properties.insert(key.clone(), from_node(value)?);
        }
    }

    let mut pattern_properties = Vec::new();
    if let Some(node) = params.get("patternProperties") {
        let entries = node
            .as_mapping()
            .ok_or_else(|| invalid(node, "patternProperties must be a mapping"))?;
        for (pattern, value) in entries {
            let pattern = compile_pattern(pattern, &value.source_info)?;
            pattern_properties.push((pattern, from_node(value)?));
        }
    }

    let additional_properties = match params.get("additionalProperties") {
        Some(node) => Some(Box::new(from_node(node)?)),
        None => None,
    };

    let required = match params.get("required") {
        Some(node) if node.as_str() == Some("all") => properties.keys().cloned().collect(),
        Some(_) => get_string_array(params, "required")?.unwrap_or_default(),
        None => Vec::new(),
    };

    Ok(Schema::Object(ObjectSchema {
        annotations: parse_annotations(params)?,
        properties,
        pattern_properties,
        additional_properties,
        required,
        min_properties: get_usize(params, "minProperties")?,
        max_properties: get_usize(params, "maxProperties")?,
        closed: get_bool(params, "closed")?.unwrap_or(false),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use iacv_yaml::parse;

    fn object(text: &str) -> ObjectSchema {
        match parse_object_schema(&parse(text).unwrap()).unwrap() {
            Schema::Object(o) => o,
            other => panic!("Expected Object schema, got {other:?}"),
        }
    }

    #[test]
    fn test_properties_keep_order() {
        let o = object("properties:\n  zeta: string\n  alpha: integer\n");
        let keys: Vec<&String> = o.properties.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_required_all() {
        let o = object("properties:\n  a: string\n  b: string\nrequired: all\n");
        assert_eq!(o.required, vec!["a", "b"]);
    }

    #[test]
    fn test_schema_for_key() {
        let o = object(
            "properties:\n  name: string\npatternProperties:\n  '^x-': integer\nadditionalProperties: boolean\n",
        );
        assert!(matches!(o.schema_for_key("name"), Some(Schema::String(_))));
        assert!(matches!(o.schema_for_key("x-id"), Some(Schema::Number(_))));
        assert!(matches!(o.schema_for_key("other"), Some(Schema::Boolean(_))));
    }

    #[test]
    fn test_closed_flag() {
        assert!(object("closed: true").closed);
        assert!(!object("properties: {}").closed);
    }

    #[test]
    fn test_empty_params() {
        let o = match parse_object_schema(&parse("~").unwrap()).unwrap() {
            Schema::Object(o) => o,
            other => panic!("Expected Object schema, got {other:?}"),
        };
        assert!(o.properties.is_empty());
        assert!(o.additional_properties.is_none());
    }
}
