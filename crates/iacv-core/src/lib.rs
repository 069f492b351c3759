//! # iacv-core
//!
//! The validation pipeline: load YAML documents from files and directories,
//! merge them into one tree, check them against a schema, then run semantic
//! rules on the merged tree and optionally write it out.
//!
//! ```rust,no_run
//! use iacv_core::{Validator, ValidatorConfig};
//! use std::path::PathBuf;
//!
//! let validator = Validator::new(ValidatorConfig::new().with_schema("schema.yaml"))?;
//! let report = validator.run(&[PathBuf::from("data/")], None);
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{}", diagnostic);
//! }
//! std::process::exit(report.exit_code());
//! # Ok::<(), iacv_core::ConfigError>(())
//! ```

mod config;
pub mod defaults;
mod diagnostics;
mod loader;
mod validator;

pub use config::{ConfigError, SyntaxMode, ValidatorConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Location, Report};
pub use loader::{LoadError, Loader, SourceFile, is_yaml_file};
pub use validator::{Stage, Validator};
