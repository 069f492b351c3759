//! Schema parser modules
//!
//! One module per schema category:
//! - primitive: boolean, number, integer, string, null, any
//! - enum: enumerations
//! - ref: references to named definitions
//! - combinators: anyOf, allOf
//! - arrays: array, arrayOf
//! - objects: object
//! - wrappers: the `schema:` wrapper

pub(super) mod arrays;
pub(super) mod combinators;
pub(super) mod r#enum;
pub(super) mod objects;
pub(super) mod primitive;
pub(super) mod r#ref;
pub(super) mod wrappers;

use crate::error::SchemaResult;
use iacv_yaml::Node;

use super::helpers::invalid;

pub(super) use arrays::{parse_array_schema, parse_arrayof_schema};
pub(super) use combinators::{parse_allof_schema, parse_anyof_schema};
pub(super) use r#enum::parse_enum_schema;
pub(super) use objects::parse_object_schema;
pub(super) use primitive::{
    parse_any_schema, parse_boolean_schema, parse_null_schema, parse_number_schema,
    parse_string_schema,
};
pub(super) use r#ref::parse_ref_schema;
pub(super) use wrappers::parse_schema_wrapper;

/// Type parameters must be a mapping, or empty (`string:`).
fn check_params(params: &Node, keyword: &str) -> SchemaResult<()> {
    if params.is_mapping() || params.is_null() {
        Ok(())
    } else {
        Err(invalid(
            params,
            format!("parameters of '{}' must be a mapping", keyword),
        ))
    }
}
