//! Validator configuration.

use crate::defaults::{DEFAULT_RULES, DEFAULT_SCHEMA};
use iacv_rules::RuleKinds;
use iacv_schema::SchemaError;
use iacv_yaml::Decryptor;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// How documents are checked against the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyntaxMode {
    /// Validate each input file on its own.
    #[default]
    PerFile,
    /// Validate the merged tree once; errors still point at input files.
    Merged,
}

/// Problems that stop a run before any validation happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("schema file '{}' does not exist", .0.display())]
    SchemaNotFound(PathBuf),

    #[error("rules directory '{}' does not exist", .0.display())]
    RulesNotFound(PathBuf),

    #[error("cannot load schema '{}': {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
}

/// Settings for a [`Validator`](crate::Validator).
///
/// `schema` and `rules` are the paths given by the user. When unset, the
/// defaults (`.schema.yaml`, `.rules/`) are used if they exist.
#[derive(Clone)]
pub struct ValidatorConfig {
    pub schema: Option<PathBuf>,
    pub rules: Option<PathBuf>,
    /// Reject keys the schema does not declare
    pub strict: bool,
    pub syntax_mode: SyntaxMode,
    pub decryptor: Option<Arc<dyn Decryptor>>,
    pub rule_kinds: RuleKinds,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            schema: None,
            rules: None,
            strict: true,
            syntax_mode: SyntaxMode::default(),
            decryptor: None,
            rule_kinds: RuleKinds::default(),
        }
    }
}

impl ValidatorConfig {
    /// Strict per-file validation with the default paths.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema = Some(path.into());
        self
    }

    pub fn with_rules(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules = Some(path.into());
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_syntax_mode(mut self, mode: SyntaxMode) -> Self {
        self.syntax_mode = mode;
        self
    }

    pub fn with_decryptor(mut self, decryptor: Arc<dyn Decryptor>) -> Self {
        self.decryptor = Some(decryptor);
        self
    }

    pub fn with_rule_kinds(mut self, kinds: RuleKinds) -> Self {
        self.rule_kinds = kinds;
        self
    }

    /// The schema file to load, if any.
    pub(crate) fn schema_path(&self) -> Result<Option<PathBuf>, ConfigError> {
        resolve(self.schema.as_ref(), DEFAULT_SCHEMA, ConfigError::SchemaNotFound)
    }

    /// The rules directory to load, if any.
    pub(crate) fn rules_path(&self) -> Result<Option<PathBuf>, ConfigError> {
        resolve(self.rules.as_ref(), DEFAULT_RULES, ConfigError::RulesNotFound)
    }
}

/// An explicit path must exist; the default one may be absent.
fn resolve(
    explicit: Option<&PathBuf>,
    default: &str,
    missing: fn(PathBuf) -> ConfigError,
) -> Result<Option<PathBuf>, ConfigError> {
    match explicit {
        Some(path) if path.exists() => Ok(Some(path.clone())),
        Some(path) => Err(missing(path.clone())),
        None => {
            let path = PathBuf::from(default);
            if path.exists() {
                Ok(Some(path))
            } else {
                tracing::info!("no {} found, skipping", default);
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("schema", &self.schema)
            .field("rules", &self.rules)
            .field("strict", &self.strict)
            .field("syntax_mode", &self.syntax_mode)
            .field("decryptor", &self.decryptor.is_some())
            .field("rule_kinds", &self.rule_kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_missing_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = ValidatorConfig::new()
            .with_schema(dir.path().join("schema.yaml"))
            .with_rules(dir.path().join("rules"));
        assert!(matches!(config.schema_path(), Err(ConfigError::SchemaNotFound(_))));
        assert!(matches!(config.rules_path(), Err(ConfigError::RulesNotFound(_))));
    }

    #[test]
    fn test_explicit_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = ValidatorConfig::new().with_rules(dir.path());
        assert_eq!(config.rules_path().unwrap(), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::new();
        assert!(config.strict);
        assert_eq!(config.syntax_mode, SyntaxMode::PerFile);
        assert_eq!(config.rule_kinds.names().len(), 5);
    }

    #[test]
    fn test_default_matches_new() {
        let config = ValidatorConfig::default();
        assert!(config.strict);
        assert_eq!(format!("{:?}", config), format!("{:?}", ValidatorConfig::new()));
    }
}
