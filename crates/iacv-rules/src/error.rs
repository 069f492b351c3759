// Error types for rule loading

use std::path::PathBuf;
use thiserror::Error;

/// Why a rule definition could not be turned into a rule.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Yaml(#[from] iacv_yaml::Error),

    #[error("rule definition must be a mapping")]
    NotAMapping,

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' {message}")]
    InvalidField {
        field: String,
        message: String,
    },

    #[error("unknown rule kind '{0}'")]
    UnknownKind(String),
}

impl RuleError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        RuleError::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A rule file that was skipped.
#[derive(Debug, Error)]
#[error("Failed loading rule '{}': {source}", file.display())]
pub struct RuleLoadError {
    pub file: PathBuf,
    #[source]
    pub source: RuleError,
}

impl RuleLoadError {
    pub fn new(file: impl Into<PathBuf>, source: impl Into<RuleError>) -> Self {
        Self {
            file: file.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_message() {
        let err = RuleLoadError::new(".rules/bad.yaml", RuleError::MissingField("id"));
        assert_eq!(
            err.to_string(),
            "Failed loading rule '.rules/bad.yaml': missing field 'id'"
        );

        let err = RuleLoadError::new("r.yml", RuleError::invalid("values", "must be a list"));
        assert_eq!(err.to_string(), "Failed loading rule 'r.yml': field 'values' must be a list");
    }
}
