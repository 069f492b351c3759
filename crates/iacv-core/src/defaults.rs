//! Default locations of the schema and the rules directory.
//!
//! Both are optional: a run without them skips the matching stage.

/// Schema file looked up in the working directory.
pub const DEFAULT_SCHEMA: &str = ".schema.yaml";

/// Rules directory looked up in the working directory.
pub const DEFAULT_RULES: &str = ".rules/";

/// File suffixes recognized as YAML documents.
pub const YAML_SUFFIXES: &[&str] = &["yaml", "yml"];
