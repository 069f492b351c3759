//! The validation pipeline.
//!
//! A run goes through these stages:
//!
//! ```text
//! Loading -> SyntaxValidating -> SemanticValidating -> Writing -> Done
//!                  |
//!                  +-- syntax errors: stop
//! ```
//!
//! Every stage appends to the run's [`Diagnostics`]; nothing is removed.

use crate::config::{ConfigError, SyntaxMode, ValidatorConfig};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Location, Report};
use crate::loader::{LoadError, Loader, SourceFile};
use iacv_merge::{MergeOptions, merge_documents};
use iacv_rules::{RuleSet, evaluate, load_rules};
use iacv_schema::{SchemaFile, ValidationError};
use iacv_yaml::{Node, TagResolver};
use std::fmt;
use std::path::{Path, PathBuf};

/// Stage of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    SyntaxValidating,
    SemanticValidating,
    Writing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loading => "loading",
            Stage::SyntaxValidating => "syntax validation",
            Stage::SemanticValidating => "semantic validation",
            Stage::Writing => "writing output",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Validates input documents against a schema and a set of rules.
pub struct Validator {
    schema: Option<SchemaFile>,
    rules: RuleSet,
    loader: Loader,
    strict: bool,
    syntax_mode: SyntaxMode,
    diagnostics: Diagnostics,
    stage: Stage,
    /// Merged tree, loaded on first use
    data: Option<Node>,
}

impl Validator {
    /// Load the schema and the rules named by `config`.
    ///
    /// Rule files that fail to load are recorded as diagnostics; a missing
    /// explicit path or a broken schema is a [`ConfigError`].
    pub fn new(config: ValidatorConfig) -> Result<Self, ConfigError> {
        let schema = match config.schema_path()? {
            Some(path) => {
                tracing::info!("Loading schema");
                let schema = SchemaFile::load(&path)
                    .map_err(|source| ConfigError::Schema { path, source })?;
                Some(schema)
            }
            None => None,
        };

        let mut diagnostics = Diagnostics::new();
        let rules = match config.rules_path()? {
            Some(dir) => {
                tracing::info!("Loading rules");
                let loaded = load_rules(&dir, &config.rule_kinds);
                for err in loaded.errors {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::RuleLoadError,
                        Some(Location::file(err.file.display().to_string())),
                        err.to_string(),
                    ));
                }
                loaded.rules
            }
            None => RuleSet::new(),
        };

        let resolver = match config.decryptor {
            Some(decryptor) => TagResolver::new().with_decryptor(decryptor),
            None => TagResolver::new(),
        };

        Ok(Self {
            schema,
            rules,
            loader: Loader::new(resolver),
            strict: config.strict,
            syntax_mode: config.syntax_mode,
            diagnostics,
            stage: Stage::Loading,
            data: None,
        })
    }

    pub fn schema(&self) -> Option<&SchemaFile> {
        self.schema.as_ref()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!(from = %self.stage, to = %stage, "stage change");
        self.stage = stage;
    }

    /// Check every document for YAML errors and, when a schema is
    /// configured, for schema violations. Returns whether errors were added.
    pub fn validate_syntax(&mut self, paths: &[PathBuf]) -> bool {
        self.enter(Stage::SyntaxValidating);
        let mark = self.diagnostics.len();

        let files = match self.loader.documents(paths) {
            Ok(files) => files,
            Err(err) => {
                self.report_load_error(&err);
                return true;
            }
        };

        match self.syntax_mode {
            SyntaxMode::PerFile => {
                for file in &files {
                    if let Some(document) = self.parse_checked(file) {
                        self.check_schema(&document, &file.path);
                    }
                }
            }
            SyntaxMode::Merged => {
                let documents: Vec<Node> =
                    files.iter().filter_map(|file| self.parse_checked(file)).collect();
                if self.diagnostics.len() == mark && self.schema.is_some() {
                    let merged = merge_documents(documents, &MergeOptions::default());
                    self.check_schema(&merged, Path::new("<merged>"));
                }
            }
        }

        self.diagnostics.len() > mark
    }

    /// Run every rule against the merged tree. Returns whether errors were
    /// added.
    pub fn validate_semantics(&mut self, paths: &[PathBuf]) -> bool {
        self.enter(Stage::SemanticValidating);
        if self.rules.is_empty() {
            return false;
        }
        let mark = self.diagnostics.len();

        tracing::info!("Loading yaml files from {:?}", paths);
        if !self.ensure_data(paths) {
            return true;
        }
        let Some(data) = &self.data else {
            return false;
        };

        let results = evaluate(&self.rules, data, self.schema.as_ref());
        for (id, findings) in results {
            let description = self
                .rules
                .get(&id)
                .map(|rule| rule.description().to_string())
                .unwrap_or_default();
            let message = format!(
                "Semantic error, rule {}: {} ({})",
                id,
                description,
                format_findings(&findings)
            );
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::RuleViolation,
                Some(Location::Rule(id)),
                message,
            ));
        }

        self.diagnostics.len() > mark
    }

    /// Write the merged tree to `output`. Returns whether errors were added.
    pub fn write_output(&mut self, paths: &[PathBuf], output: &Path) -> bool {
        self.enter(Stage::Writing);
        if !self.ensure_data(paths) {
            return true;
        }
        let Some(data) = &self.data else {
            return false;
        };

        tracing::info!(path = %output.display(), "writing merged output");
        match iacv_yaml::write_yaml_file(data, output) {
            Ok(()) => false,
            Err(err) => {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::OutputError,
                    Some(Location::file(output.display().to_string())),
                    format!("Failed writing output '{}': {}", output.display(), err),
                ));
                true
            }
        }
    }

    /// Run the whole pipeline.
    ///
    /// Semantic validation and writing are skipped when syntax validation
    /// reported errors.
    pub fn run(mut self, paths: &[PathBuf], output: Option<&Path>) -> Report {
        if !self.validate_syntax(paths) {
            self.validate_semantics(paths);
            if let Some(output) = output {
                self.write_output(paths, output);
            }
        } else {
            tracing::info!("syntax errors found, skipping semantic validation");
        }
        self.enter(Stage::Done);
        self.into_report()
    }

    pub fn into_report(self) -> Report {
        Report {
            diagnostics: self.diagnostics,
        }
    }

    /// Load the merged tree once per run. Returns false if loading failed.
    fn ensure_data(&mut self, paths: &[PathBuf]) -> bool {
        if self.data.is_some() {
            return true;
        }
        match self.loader.load(paths) {
            Ok(tree) => {
                self.data = Some(tree);
                true
            }
            Err(err) => {
                self.report_load_error(&err);
                false
            }
        }
    }

    /// Parse one file, reporting a parse error diagnostic on failure.
    fn parse_checked(&mut self, file: &SourceFile) -> Option<Node> {
        tracing::info!("Validate file: {}", file.path.display());
        match self.loader.parse_document(&file.path) {
            Ok(document) => Some(document),
            Err(err) => {
                self.report_parse_error(&file.path, &err);
                None
            }
        }
    }

    fn check_schema(&mut self, document: &Node, path: &Path) {
        let Some(schema) = &self.schema else {
            return;
        };
        let errors = schema.validate(document, self.strict);
        for error in errors {
            self.report_violation(&error, path);
        }
    }

    fn report_parse_error(&mut self, path: &Path, err: &LoadError) {
        let file = path.display().to_string();
        let (line, column, problem) = match err {
            LoadError::Parse { source, .. } => {
                let (line, column) = source
                    .location()
                    .map(|loc| (loc.line, loc.col))
                    .unwrap_or((0, 0));
                (line, column, source.to_string())
            }
            LoadError::NotAMapping { found, .. } => {
                (1, 1, format!("document root must be a mapping, found {}", found))
            }
            other => (0, 0, other.to_string()),
        };

        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::ParseError,
            Some(Location::file_position(&file, line, column)),
            format!(
                "Syntax error '{}': Line {}, Column {} - {}",
                file, line, column, problem
            ),
        ));
    }

    fn report_violation(&mut self, error: &ValidationError, fallback: &Path) {
        let file = error
            .file()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.display().to_string());
        let location = match &error.location {
            Some(loc) => Location::file_position(&file, loc.line, loc.col),
            None => Location::file(&file),
        };
        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::SchemaViolation,
            Some(location),
            format!("Syntax error '{}': {}", file, error),
        ));
    }

    fn report_load_error(&mut self, err: &LoadError) {
        let location = match err {
            LoadError::MissingPath(path)
            | LoadError::Walk { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::NotAMapping { path, .. } => Location::file(path.display().to_string()),
        };
        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::LoadError,
            Some(location),
            err.to_string(),
        ));
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("schema", &self.schema.is_some())
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .field("strict", &self.strict)
            .field("syntax_mode", &self.syntax_mode)
            .field("stage", &self.stage)
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}

/// Render findings as a bracketed, quoted list: `['a', 'b']`.
fn format_findings(findings: &[String]) -> String {
    let quoted: Vec<String> = findings.iter().map(|f| format!("'{}'", f)).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_findings() {
        assert_eq!(
            format_findings(&["root.children.name - FORBIDDEN".to_string()]),
            "['root.children.name - FORBIDDEN']"
        );
        assert_eq!(format_findings(&["a".into(), "b".into()]), "['a', 'b']");
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::SyntaxValidating.to_string(), "syntax validation");
        assert_eq!(Stage::Done.to_string(), "done");
    }
}
