use crate::definition::RuleDefinition;
use crate::error::RuleError;
use crate::path::select_values;
use crate::rule::{Rule, RuleHeader};
use iacv_schema::SchemaFile;
use iacv_yaml::Node;
use std::collections::HashSet;

use super::finding;

/// Reports values at `path` that do not occur at `target`.
///
/// ```yaml
/// kind: reference
/// path: interfaces.vlan
/// target: vlans.id
/// ```
#[derive(Debug)]
pub struct Reference {
    header: RuleHeader,
    path: String,
    target: String,
}

impl Reference {
    pub const KIND: &'static str = "reference";

    pub fn from_definition(definition: &RuleDefinition) -> Result<Box<dyn Rule>, RuleError> {
        Ok(Box::new(Self {
            header: definition.header.clone(),
            path: definition.string_param("path")?,
            target: definition.string_param("target")?,
        }))
    }
}

impl Rule for Reference {
    fn header(&self) -> &RuleHeader {
        &self.header
    }

    fn matches(&self, tree: &Node, _schema: Option<&SchemaFile>) -> Vec<String> {
        let targets: HashSet<String> = select_values(tree, &self.target).into_iter().collect();
        select_values(tree, &self.path)
            .into_iter()
            .filter(|value| !targets.contains(value))
            .map(|value| finding(&self.path, &value))
            .collect()
    }
}
