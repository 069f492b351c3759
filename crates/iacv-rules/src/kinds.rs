//! Registry of rule kinds.
//!
//! A rule kind is compiled code that rule files instantiate by name through
//! their `kind` key. The built-in kinds are always available; library users
//! can register more.

use crate::builtin::{ForbiddenValues, Reference, RequiredKeys, SchemaPresent, UniqueValues};
use crate::definition::RuleDefinition;
use crate::error::RuleError;
use crate::rule::Rule;
use indexmap::IndexMap;

/// Builds a rule from its definition, checking the kind's parameters.
pub type RuleFactory = fn(&RuleDefinition) -> Result<Box<dyn Rule>, RuleError>;

/// Rule kinds by name.
#[derive(Clone)]
pub struct RuleKinds {
    factories: IndexMap<String, RuleFactory>,
}

impl RuleKinds {
    /// A registry holding the built-in kinds.
    pub fn new() -> Self {
        let mut kinds = Self::empty();
        kinds.register(ForbiddenValues::KIND, ForbiddenValues::from_definition);
        kinds.register(UniqueValues::KIND, UniqueValues::from_definition);
        kinds.register(Reference::KIND, Reference::from_definition);
        kinds.register(RequiredKeys::KIND, RequiredKeys::from_definition);
        kinds.register(SchemaPresent::KIND, SchemaPresent::from_definition);
        kinds
    }

    /// A registry without any kinds.
    pub fn empty() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Register a kind, replacing any kind with the same name.
    pub fn register(&mut self, name: impl Into<String>, factory: RuleFactory) {
        self.factories.insert(name.into(), factory);
    }

    /// Instantiate the rule a definition describes.
    pub fn create(&self, definition: &RuleDefinition) -> Result<Box<dyn Rule>, RuleError> {
        let factory = self
            .factories
            .get(&definition.kind)
            .ok_or_else(|| RuleError::UnknownKind(definition.kind.clone()))?;
        factory(definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered kind names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

impl Default for RuleKinds {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleKinds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleHeader;
    use iacv_schema::SchemaFile;
    use iacv_yaml::{Node, parse};

    struct AlwaysFails(RuleHeader);

    impl Rule for AlwaysFails {
        fn header(&self) -> &RuleHeader {
            &self.0
        }

        fn matches(&self, _tree: &Node, _schema: Option<&SchemaFile>) -> Vec<String> {
            vec!["always".to_string()]
        }
    }

    fn always_fails(definition: &RuleDefinition) -> Result<Box<dyn Rule>, RuleError> {
        Ok(Box::new(AlwaysFails(definition.header.clone())))
    }

    fn definition(kind: &str) -> RuleDefinition {
        RuleDefinition::from_node(
            &parse(&format!("id: x\ndescription: d\nkind: {}\npath: a\nvalues: [b]\n", kind)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_builtin_kinds() {
        let kinds = RuleKinds::new();
        assert_eq!(
            kinds.names(),
            vec![
                "forbidden_values",
                "unique_values",
                "reference",
                "required_keys",
                "schema_present"
            ]
        );
        assert_eq!(kinds.create(&definition("forbidden_values")).unwrap().id(), "x");
    }

    #[test]
    fn test_unknown_kind() {
        let err = RuleKinds::new().create(&definition("shell_script")).unwrap_err();
        assert!(matches!(err, RuleError::UnknownKind(kind) if kind == "shell_script"));
    }

    #[test]
    fn test_register_custom_kind() {
        let mut kinds = RuleKinds::empty();
        assert!(!kinds.contains("always"));
        kinds.register("always", always_fails);

        let rule = kinds.create(&definition("always")).unwrap();
        assert_eq!(rule.matches(&Node::empty_mapping(), None), vec!["always"]);
    }
}
