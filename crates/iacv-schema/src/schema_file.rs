//! Loading schema files.
//!
//! A schema file holds either a single schema or a root schema together with
//! named definitions:
//!
//! ```yaml
//! schema:
//!   object:
//!     properties:
//!       interfaces:
//!         arrayOf:
//!           ref: interface
//! definitions:
//!   interface:
//!     object:
//!       properties:
//!         name: string
//! ```

use crate::error::{SchemaError, SchemaResult, ValidationError};
use crate::schema::{Schema, SchemaRegistry};
use crate::validator;
use iacv_yaml::Node;
use std::path::Path;

/// A compiled schema with the definitions its references resolve against.
#[derive(Debug, Clone)]
pub struct SchemaFile {
    pub root: Schema,
    pub registry: SchemaRegistry,
}

impl SchemaFile {
    /// Read and compile a schema file
    pub fn load(path: &Path) -> SchemaResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let schema = Self::parse(&content, &path.display().to_string())?;
        tracing::debug!(
            path = %path.display(),
            definitions = schema.registry.len(),
            "loaded schema"
        );
        Ok(schema)
    }

    /// Compile a schema from YAML text; `filename` only labels locations.
    pub fn parse(content: &str, filename: &str) -> SchemaResult<Self> {
        let node = iacv_yaml::parse_file(content, filename)?;
        Self::from_node(&node)
    }

    /// Compile a schema from a parsed document.
    ///
    /// A mapping with a `definitions` key is the two-part form; anything
    /// else is a single schema.
    pub fn from_node(node: &Node) -> SchemaResult<Self> {
        if node.is_mapping() && node.is_empty() {
            return Err(SchemaError::InvalidStructure {
                message: "schema file is empty".to_string(),
                location: node.source_info.clone(),
            });
        }

        let mut registry = SchemaRegistry::new();
        let root = match node.get("definitions") {
            Some(definitions) => {
                let entries =
                    definitions
                        .as_mapping()
                        .ok_or_else(|| SchemaError::InvalidStructure {
                            message: "definitions must be a mapping".to_string(),
                            location: definitions.source_info.clone(),
                        })?;
                for (name, definition) in entries {
                    registry.register(name.clone(), Schema::from_node(definition)?);
                }

                let root = node.get("schema").ok_or_else(|| SchemaError::InvalidStructure {
                    message: "a schema file with definitions needs a 'schema' key".to_string(),
                    location: node.source_info.clone(),
                })?;
                Schema::from_node(root)?
            }
            None => Schema::from_node(node)?,
        };

        registry.check_references(&root)?;
        Ok(Self { root, registry })
    }

    /// Validate a document against the root schema
    pub fn validate(&self, node: &Node, strict: bool) -> Vec<ValidationError> {
        validator::validate(node, &self.root, &self.registry, strict)
    }
}
