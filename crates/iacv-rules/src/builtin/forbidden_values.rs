use crate::definition::RuleDefinition;
use crate::error::RuleError;
use crate::path::select_values;
use crate::rule::{Rule, RuleHeader};
use iacv_schema::SchemaFile;
use iacv_yaml::Node;

use super::finding;

/// Reports every value at `path` that appears in `values`.
#[derive(Debug)]
pub struct ForbiddenValues {
    header: RuleHeader,
    path: String,
    values: Vec<String>,
}

impl ForbiddenValues {
    pub const KIND: &'static str = "forbidden_values";

    pub fn from_definition(definition: &RuleDefinition) -> Result<Box<dyn Rule>, RuleError> {
        Ok(Box::new(Self {
            header: definition.header.clone(),
            path: definition.string_param("path")?,
            values: definition.scalar_list_param("values")?,
        }))
    }
}

impl Rule for ForbiddenValues {
    fn header(&self) -> &RuleHeader {
        &self.header
    }

    fn matches(&self, tree: &Node, _schema: Option<&SchemaFile>) -> Vec<String> {
        select_values(tree, &self.path)
            .into_iter()
            .filter(|value| self.values.contains(value))
            .map(|value| finding(&self.path, &value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iacv_yaml::parse;

    #[test]
    fn test_reports_each_occurrence() {
        let def = RuleDefinition::from_node(
            &parse("id: '101'\ndescription: d\nkind: forbidden_values\npath: root.children.name\nvalues: [FORBIDDEN]\n").unwrap(),
        )
        .unwrap();
        let rule = ForbiddenValues::from_definition(&def).unwrap();

        let tree = parse("root:\n  children:\n    - name: FORBIDDEN\n    - name: ok\n").unwrap();
        assert_eq!(rule.matches(&tree, None), vec!["root.children.name - FORBIDDEN"]);

        let clean = parse("root:\n  children:\n    - name: ok\n").unwrap();
        assert!(rule.matches(&clean, None).is_empty());

        // nothing at the path is not an error
        assert!(rule.matches(&parse("other: 1").unwrap(), None).is_empty());
    }
}
