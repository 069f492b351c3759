use crate::definition::RuleDefinition;
use crate::error::RuleError;
use crate::path::select_values;
use crate::rule::{Rule, RuleHeader};
use iacv_schema::SchemaFile;
use iacv_yaml::Node;
use std::collections::HashSet;

use super::finding;

/// Reports values that occur more than once at `path`, once per value.
#[derive(Debug)]
pub struct UniqueValues {
    header: RuleHeader,
    path: String,
}

impl UniqueValues {
    pub const KIND: &'static str = "unique_values";

    pub fn from_definition(definition: &RuleDefinition) -> Result<Box<dyn Rule>, RuleError> {
        Ok(Box::new(Self {
            header: definition.header.clone(),
            path: definition.string_param("path")?,
        }))
    }
}

impl Rule for UniqueValues {
    fn header(&self) -> &RuleHeader {
        &self.header
    }

    fn matches(&self, tree: &Node, _schema: Option<&SchemaFile>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut findings = Vec::new();
        for value in select_values(tree, &self.path) {
            if !seen.insert(value.clone()) && reported.insert(value.clone()) {
                findings.push(finding(&self.path, &value));
            }
        }
        findings
    }
}
