//! Declarative rule definitions.
//!
//! A rule file holds one mapping:
//!
//! ```yaml
//! id: "101"
//! description: Verify child naming restrictions
//! severity: HIGH
//! kind: forbidden_values
//! path: root.children.name
//! values: [FORBIDDEN]
//! ```
//!
//! `id`, `description` and `kind` are required and `severity` defaults to
//! `MEDIUM`. Every other key is a parameter of the rule kind.

use crate::error::RuleError;
use crate::rule::{RuleHeader, Severity};
use iacv_yaml::Node;
use indexmap::IndexMap;

const HEADER_KEYS: &[&str] = &["id", "description", "severity", "kind"];

/// A parsed rule file, not yet bound to a rule kind.
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    pub header: RuleHeader,
    pub kind: String,
    pub params: IndexMap<String, Node>,
}

impl RuleDefinition {
    pub fn from_node(node: &Node) -> Result<Self, RuleError> {
        let entries = node.as_mapping().ok_or(RuleError::NotAMapping)?;

        let id = required_scalar(node, "id")?;
        let description = required_scalar(node, "description")?;
        let kind = required_scalar(node, "kind")?;
        let severity = match node.get("severity") {
            Some(value) => value
                .scalar_text()
                .ok_or_else(|| RuleError::invalid("severity", "must be a string"))?
                .parse::<Severity>()
                .map_err(|message| RuleError::invalid("severity", message))?,
            None => Severity::default(),
        };

        let params = entries
            .iter()
            .filter(|(key, _)| !HEADER_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            header: RuleHeader {
                id,
                description,
                severity,
            },
            kind,
            params,
        })
    }

    /// A required string parameter
    pub fn string_param(&self, name: &'static str) -> Result<String, RuleError> {
        let value = self.params.get(name).ok_or(RuleError::MissingField(name))?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RuleError::invalid(name, "must be a string"))
    }

    /// A required list of scalars, rendered as text
    pub fn scalar_list_param(&self, name: &'static str) -> Result<Vec<String>, RuleError> {
        let value = self.params.get(name).ok_or(RuleError::MissingField(name))?;
        let items = value
            .as_sequence()
            .ok_or_else(|| RuleError::invalid(name, "must be a list"))?;
        items
            .iter()
            .map(|item| {
                item.scalar_text()
                    .ok_or_else(|| RuleError::invalid(name, "must only contain scalars"))
            })
            .collect()
    }
}

fn required_scalar(node: &Node, field: &'static str) -> Result<String, RuleError> {
    let value = node.get(field).ok_or(RuleError::MissingField(field))?;
    match value.scalar_text() {
        Some(text) if !value.is_null() && !text.is_empty() => Ok(text),
        _ => Err(RuleError::invalid(field, "must be a non-empty scalar")),
    }
}
