//! Schema representation and parsing.

mod annotations;
mod helpers;
mod parser;
mod parsers;
mod registry;
mod types;

pub use registry::SchemaRegistry;
pub use types::{
    AllOfSchema, AnyOfSchema, AnySchema, ArraySchema, BooleanSchema, EnumSchema, NullSchema,
    NumberSchema, ObjectSchema, Pattern, RefSchema, SchemaAnnotations, StringSchema,
};

use crate::error::SchemaResult;
use iacv_yaml::Node;

/// A compiled schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Rejects every value
    False,
    /// Accepts every value
    True,
    Boolean(BooleanSchema),
    Number(NumberSchema),
    String(StringSchema),
    Null(NullSchema),
    Enum(EnumSchema),
    Any(AnySchema),
    AnyOf(AnyOfSchema),
    AllOf(AllOfSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
    Ref(RefSchema),
}

impl Schema {
    /// Parse a schema from a document node.
    ///
    /// ```rust
    /// use iacv_schema::Schema;
    ///
    /// let node = iacv_yaml::parse("object:\n  properties:\n    name: string\n").unwrap();
    /// let schema = Schema::from_node(&node).unwrap();
    /// assert_eq!(schema.type_name(), "object");
    /// ```
    pub fn from_node(node: &Node) -> SchemaResult<Schema> {
        parser::from_node(node)
    }

    /// Get the annotations of this schema
    pub fn annotations(&self) -> &SchemaAnnotations {
        match self {
            Schema::False | Schema::True => &annotations::EMPTY_ANNOTATIONS,
            Schema::Boolean(s) => &s.annotations,
            Schema::Number(s) => &s.annotations,
            Schema::String(s) => &s.annotations,
            Schema::Null(s) => &s.annotations,
            Schema::Enum(s) => &s.annotations,
            Schema::Any(s) => &s.annotations,
            Schema::AnyOf(s) => &s.annotations,
            Schema::AllOf(s) => &s.annotations,
            Schema::Array(s) => &s.annotations,
            Schema::Object(s) => &s.annotations,
            Schema::Ref(s) => &s.annotations,
        }
    }

    /// Replace the annotations of this schema
    pub fn with_annotations(self, annotations: SchemaAnnotations) -> Schema {
        match self {
            Schema::False | Schema::True => self,
            Schema::Boolean(_) => Schema::Boolean(BooleanSchema { annotations }),
            Schema::Number(s) => Schema::Number(NumberSchema { annotations, ..s }),
            Schema::String(s) => Schema::String(StringSchema { annotations, ..s }),
            Schema::Null(_) => Schema::Null(NullSchema { annotations }),
            Schema::Enum(s) => Schema::Enum(EnumSchema { annotations, ..s }),
            Schema::Any(_) => Schema::Any(AnySchema { annotations }),
            Schema::AnyOf(s) => Schema::AnyOf(AnyOfSchema { annotations, ..s }),
            Schema::AllOf(s) => Schema::AllOf(AllOfSchema { annotations, ..s }),
            Schema::Array(s) => Schema::Array(ArraySchema { annotations, ..s }),
            Schema::Object(s) => Schema::Object(ObjectSchema { annotations, ..s }),
            Schema::Ref(s) => Schema::Ref(RefSchema { annotations, ..s }),
        }
    }

    /// Human-readable type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::False => "false",
            Schema::True => "true",
            Schema::Boolean(_) => "boolean",
            Schema::Number(s) if s.integer => "integer",
            Schema::Number(_) => "number",
            Schema::String(_) => "string",
            Schema::Null(_) => "null",
            Schema::Enum(_) => "enum",
            Schema::Any(_) => "any",
            Schema::AnyOf(_) => "anyOf",
            Schema::AllOf(_) => "allOf",
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
            Schema::Ref(_) => "ref",
        }
    }

    /// Names of all definitions referenced from this schema, in order of
    /// appearance (duplicates included).
    pub fn references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references<'a>(&'a self, refs: &mut Vec<&'a str>) {
        match self {
            Schema::Ref(s) => refs.push(&s.reference),
            Schema::AnyOf(AnyOfSchema { schemas, .. }) | Schema::AllOf(AllOfSchema { schemas, .. }) => {
                for schema in schemas {
                    schema.collect_references(refs);
                }
            }
            Schema::Array(s) => {
                if let Some(items) = &s.items {
                    items.collect_references(refs);
                }
            }
            Schema::Object(s) => {
                for schema in s.properties.values() {
                    schema.collect_references(refs);
                }
                for (_, schema) in &s.pattern_properties {
                    schema.collect_references(refs);
                }
                if let Some(additional) = &s.additional_properties {
                    additional.collect_references(refs);
                }
            }
            _ => {}
        }
    }
}
