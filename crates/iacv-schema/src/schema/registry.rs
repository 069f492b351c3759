//! Named schema definitions.

use super::Schema;
use crate::error::{SchemaError, SchemaResult};
use indexmap::IndexMap;

/// Named definitions that `ref` schemas resolve against.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any previous one with the same name
    pub fn register(&mut self, name: String, schema: Schema) {
        self.schemas.insert(name, schema);
    }

    /// Look up a definition by name
    pub fn resolve(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Check that every reference in `root` and in every registered
    /// definition names a registered definition.
    pub fn check_references(&self, root: &Schema) -> SchemaResult<()> {
        let definitions = self.schemas.values();
        for schema in std::iter::once(root).chain(definitions) {
            if let Some(missing) = schema.references().into_iter().find(|r| !self.contains(r)) {
                return Err(SchemaError::UnresolvedRef(missing.to_string()));
            }
        }
        Ok(())
    }
}
