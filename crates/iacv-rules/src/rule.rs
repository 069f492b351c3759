//! The rule abstraction.

use iacv_schema::SchemaFile;
use iacv_yaml::Node;
use std::fmt;
use std::str::FromStr;

/// How serious a rule violation is. Informational only: every finding
/// fails validation regardless of severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(Severity::Low),
            "MEDIUM" => Ok(Severity::Medium),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(format!(
                "unknown severity '{}' (expected LOW, MEDIUM, HIGH or CRITICAL)",
                s
            )),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

/// Identity shared by every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHeader {
    pub id: String,
    pub description: String,
    pub severity: Severity,
}

/// A semantic check over the merged document tree.
///
/// Rules only ever see the tree by shared reference. A rule returns one
/// string per finding, usually `"<path> - <value>"`; an empty list means the
/// tree passes.
pub trait Rule: Send + Sync {
    fn header(&self) -> &RuleHeader;

    /// Whether the rule wants the schema passed to [`Rule::matches`].
    fn uses_schema(&self) -> bool {
        false
    }

    /// Check the tree. `schema` is `None` unless [`Rule::uses_schema`]
    /// returns true and a schema is configured.
    fn matches(&self, tree: &Node, schema: Option<&SchemaFile>) -> Vec<String>;

    fn id(&self) -> &str {
        &self.header().id
    }

    fn description(&self) -> &str {
        &self.header().description
    }

    fn severity(&self) -> Severity {
        self.header().severity
    }
}

impl fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id())
            .field("severity", &self.severity())
            .finish()
    }
}
