use crate::definition::RuleDefinition;
use crate::error::RuleError;
use crate::path::select;
use crate::rule::{Rule, RuleHeader};
use iacv_schema::SchemaFile;
use iacv_yaml::Node;

/// Reports mappings at `path` that lack one of `keys`, as
/// `"<path>[<index>].<key>"` where the index counts the mappings found.
#[derive(Debug)]
pub struct RequiredKeys {
    header: RuleHeader,
    path: String,
    keys: Vec<String>,
}

impl RequiredKeys {
    pub const KIND: &'static str = "required_keys";

    pub fn from_definition(definition: &RuleDefinition) -> Result<Box<dyn Rule>, RuleError> {
        Ok(Box::new(Self {
            header: definition.header.clone(),
            path: definition.string_param("path")?,
            keys: definition.scalar_list_param("keys")?,
        }))
    }
}

impl Rule for RequiredKeys {
    fn header(&self) -> &RuleHeader {
        &self.header
    }

    fn matches(&self, tree: &Node, _schema: Option<&SchemaFile>) -> Vec<String> {
        let mut findings = Vec::new();
        let mappings = select(tree, &self.path)
            .into_iter()
            .filter(|node| node.is_mapping());
        for (index, mapping) in mappings.enumerate() {
            for key in &self.keys {
                if mapping.get(key).is_none() {
                    findings.push(format!("{}[{}].{}", self.path, index, key));
                }
            }
        }
        findings
    }
}
