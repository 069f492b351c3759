//! Collected validation problems.

use std::fmt;

/// What stage produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A document is not well-formed YAML or its root is not a mapping
    ParseError,
    /// A document does not conform to the schema
    SchemaViolation,
    /// A rule file could not be loaded
    RuleLoadError,
    /// A rule reported findings
    RuleViolation,
    /// An input path could not be read
    LoadError,
    /// The merged output could not be written
    OutputError,
}

/// Where a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File {
        path: String,
        line: Option<usize>,
        column: Option<usize>,
    },
    /// The rule that reported the problem
    Rule(String),
}

impl Location {
    pub fn file(path: impl Into<String>) -> Self {
        Location::File {
            path: path.into(),
            line: None,
            column: None,
        }
    }

    pub fn file_position(path: impl Into<String>, line: usize, column: usize) -> Self {
        Location::File {
            path: path.into(),
            line: Some(line),
            column: Some(column),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File {
                path,
                line: Some(line),
                column: Some(column),
            } => write!(f, "{}:{}:{}", path, line, column),
            Location::File { path, .. } => write!(f, "{}", path),
            Location::Rule(id) => write!(f, "rule {}", id),
        }
    }
}

/// One reported problem. `message` is the complete user-facing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub location: Option<Location>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, location: Option<Location>, message: impl Into<String>) -> Self {
        Self {
            kind,
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered, append-only list of diagnostics for one run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it at `error` level.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::error!("{}", diagnostic.message);
        self.items.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Number of diagnostics of one kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    /// Diagnostics added after the first `mark` entries.
    pub fn since(&self, mark: usize) -> &[Diagnostic] {
        self.items.get(mark..).unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Result of a full validation run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub diagnostics: Diagnostics,
}

impl Report {
    /// True when nothing was reported.
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Process exit code: 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_only_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::new(DiagnosticKind::ParseError, None, "first"));
        let mark = diagnostics.len();
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::RuleViolation,
            Some(Location::Rule("101".into())),
            "second",
        ));

        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(diagnostics.since(mark).len(), 1);
        assert_eq!(diagnostics.count(DiagnosticKind::ParseError), 1);
    }

    #[test]
    fn test_report_exit_code() {
        let mut report = Report::default();
        assert_eq!(report.exit_code(), 0);
        report
            .diagnostics
            .push(Diagnostic::new(DiagnosticKind::LoadError, None, "missing"));
        assert!(!report.is_success());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::file_position("a.yaml", 3, 5).to_string(), "a.yaml:3:5");
        assert_eq!(Location::file("a.yaml").to_string(), "a.yaml");
        assert_eq!(Location::Rule("101".into()).to_string(), "rule 101");
    }
}
