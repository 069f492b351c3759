//! Primitive schema parsers

use crate::error::SchemaResult;
use iacv_yaml::Node;

use super::check_params;
use crate::schema::Schema;
use crate::schema::annotations::parse_annotations;
use crate::schema::helpers::{get_number, get_pattern, get_usize};
use crate::schema::types::{AnySchema, BooleanSchema, NullSchema, NumberSchema, StringSchema};

pub(in crate::schema) fn parse_boolean_schema(params: &Node) -> SchemaResult<Schema> {
    check_params(params, "boolean")?;
    Ok(Schema::Boolean(BooleanSchema {
        annotations: parse_annotations(params)?,
    }))
}

/// Parse a number schema
///
/// ```yaml
/// integer:
///   minimum: 1
///   maximum: 4094
/// ```
pub(in crate::schema) fn parse_number_schema(params: &Node, integer: bool) -> SchemaResult<Schema> {
    check_params(params, if integer { "integer" } else { "number" })?;
    Ok(Schema::Number(NumberSchema {
        annotations: parse_annotations(params)?,
        integer,
        minimum: get_number(params, "minimum")?,
        maximum: get_number(params, "maximum")?,
        exclusive_minimum: get_number(params, "exclusiveMinimum")?,
        exclusive_maximum: get_number(params, "exclusiveMaximum")?,
        multiple_of: get_number(params, "multipleOf")?,
    }))
}

/// Parse a string schema; `pattern` is compiled here, once.
pub(in crate::schema) fn parse_string_schema(params: &Node) -> SchemaResult<Schema> {
    check_params(params, "string")?;
    Ok(Schema::String(StringSchema {
        annotations: parse_annotations(params)?,
        min_length: get_usize(params, "minLength")?,
        max_length: get_usize(params, "maxLength")?,
        pattern: get_pattern(params, "pattern")?,
    }))
}

pub(in crate::schema) fn parse_null_schema(params: &Node) -> SchemaResult<Schema> {
    check_params(params, "null")?;
    Ok(Schema::Null(NullSchema {
        annotations: parse_annotations(params)?,
    }))
}

pub(in crate::schema) fn parse_any_schema(params: &Node) -> SchemaResult<Schema> {
    check_params(params, "any")?;
    Ok(Schema::Any(AnySchema {
        annotations: parse_annotations(params)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use iacv_yaml::parse;

    #[test]
    fn test_string_constraints() {
        let params = parse("minLength: 1\nmaxLength: 8\npattern: '^[a-z]+$'").unwrap();
        match parse_string_schema(&params).unwrap() {
            Schema::String(s) => {
                assert_eq!(s.min_length, Some(1));
                assert_eq!(s.max_length, Some(8));
                assert!(s.pattern.unwrap().is_match("abc"));
            }
            other => panic!("Expected String schema, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_pattern_fails_at_load() {
        let params = parse("pattern: '[unclosed'").unwrap();
        let err = parse_string_schema(&params).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { .. }));
    }

    #[test]
    fn test_integer_bounds() {
        let params = parse("minimum: 1\nexclusiveMaximum: 4095").unwrap();
        match parse_number_schema(&params, true).unwrap() {
            Schema::Number(n) => {
                assert!(n.integer);
                assert_eq!(n.minimum, Some(1.0));
                assert_eq!(n.exclusive_maximum, Some(4095.0));
            }
            other => panic!("Expected Number schema, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_parameter_type() {
        let params = parse("minLength: many").unwrap();
        assert!(parse_string_schema(&params).is_err());

        let scalar = parse("just text").unwrap();
        assert!(parse_boolean_schema(&scalar).is_err());
    }
}
