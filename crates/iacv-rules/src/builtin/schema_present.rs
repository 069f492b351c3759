use crate::definition::RuleDefinition;
use crate::error::RuleError;
use crate::rule::{Rule, RuleHeader};
use iacv_schema::SchemaFile;
use iacv_yaml::Node;

/// Fails when validation runs without a schema.
#[derive(Debug)]
pub struct SchemaPresent {
    header: RuleHeader,
}

impl SchemaPresent {
    pub const KIND: &'static str = "schema_present";

    pub fn from_definition(definition: &RuleDefinition) -> Result<Box<dyn Rule>, RuleError> {
        Ok(Box::new(Self {
            header: definition.header.clone(),
        }))
    }
}

impl Rule for SchemaPresent {
    fn header(&self) -> &RuleHeader {
        &self.header
    }

    fn uses_schema(&self) -> bool {
        true
    }

    fn matches(&self, _tree: &Node, schema: Option<&SchemaFile>) -> Vec<String> {
        match schema {
            Some(_) => Vec::new(),
            None => vec!["No schema".to_string()],
        }
    }
}
