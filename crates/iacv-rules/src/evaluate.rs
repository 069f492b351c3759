//! Running rules against the merged tree.

use crate::loader::RuleSet;
use iacv_schema::SchemaFile;
use iacv_yaml::Node;
use indexmap::IndexMap;

/// Run every rule and collect findings by rule id.
///
/// Rules without findings get no entry. The schema is only handed to rules
/// that ask for it.
pub fn evaluate(
    rules: &RuleSet,
    tree: &Node,
    schema: Option<&SchemaFile>,
) -> IndexMap<String, Vec<String>> {
    let mut results = IndexMap::new();
    for (id, rule) in rules {
        tracing::info!("Verifying rule id {}", id);
        let schema = if rule.uses_schema() { schema } else { None };
        let findings = rule.matches(tree, schema);
        if !findings.is_empty() {
            tracing::debug!(id = %id, findings = findings.len(), "rule reported findings");
            results.insert(id.clone(), findings);
        }
    }
    results
}
