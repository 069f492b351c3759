//! Schema type definitions
//!
//! Each schema type struct contains:
//! - annotations: common metadata like description and error messages
//! - type-specific fields: constraints specific to that type

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Schema;

/// Annotations that can be attached to any schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaAnnotations {
    /// Short description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Custom error message to display on validation failure
    #[serde(rename = "errorMessage", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// A regular expression compiled once when the schema is loaded.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Pattern)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.as_str())
    }
}

/// Boolean type schema
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanSchema {
    pub annotations: SchemaAnnotations,
}

/// Number type schema (`integer: true` only accepts integers)
#[derive(Debug, Clone, PartialEq)]
pub struct NumberSchema {
    pub annotations: SchemaAnnotations,
    pub integer: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,
}

/// String type schema
#[derive(Debug, Clone, PartialEq)]
pub struct StringSchema {
    pub annotations: SchemaAnnotations,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
}

/// Null type schema
#[derive(Debug, Clone, PartialEq)]
pub struct NullSchema {
    pub annotations: SchemaAnnotations,
}

/// Enum type schema
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub annotations: SchemaAnnotations,
    pub values: Vec<serde_json::Value>,
}

/// Any type schema (no validation)
#[derive(Debug, Clone, PartialEq)]
pub struct AnySchema {
    pub annotations: SchemaAnnotations,
}

/// AnyOf schema (validates if any subschema matches)
#[derive(Debug, Clone, PartialEq)]
pub struct AnyOfSchema {
    pub annotations: SchemaAnnotations,
    pub schemas: Vec<Schema>,
}

/// AllOf schema (validates if all subschemas match)
#[derive(Debug, Clone, PartialEq)]
pub struct AllOfSchema {
    pub annotations: SchemaAnnotations,
    pub schemas: Vec<Schema>,
}

/// Array type schema
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub annotations: SchemaAnnotations,
    pub items: Option<Box<Schema>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: Option<bool>,
}

/// Object type schema
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    pub annotations: SchemaAnnotations,
    pub properties: IndexMap<String, Schema>,
    pub pattern_properties: Vec<(Pattern, Schema)>,
    pub additional_properties: Option<Box<Schema>>,
    pub required: Vec<String>,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
    /// If true, the object cannot have undeclared properties even when
    /// validating in non-strict mode
    pub closed: bool,
}

impl ObjectSchema {
    /// Schema governing `key`: a declared property first, then the first
    /// matching pattern property, then `additionalProperties`.
    pub fn schema_for_key(&self, key: &str) -> Option<&Schema> {
        self.properties
            .get(key)
            .or_else(|| {
                self.pattern_properties
                    .iter()
                    .find(|(pattern, _)| pattern.is_match(key))
                    .map(|(_, schema)| schema)
            })
            .or(self.additional_properties.as_deref())
    }
}

/// Reference to a named definition
#[derive(Debug, Clone, PartialEq)]
pub struct RefSchema {
    pub annotations: SchemaAnnotations,
    pub reference: String,
}
