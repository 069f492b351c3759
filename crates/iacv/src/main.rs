//! iac-validate - validate YAML configuration files against a schema and
//! semantic rules.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use iacv_core::{SyntaxMode, Validator, ValidatorConfig, defaults};
use iacv_yaml::AnsibleVaultDecryptor;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A CLI tool to perform syntactic and semantic validation of YAML files.
#[derive(Parser, Debug)]
#[command(name = "iac-validate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        env = "IAC_VALIDATE_VERBOSITY",
        default_value_t = Verbosity::Warning,
        ignore_case = true,
        value_name = "LVL"
    )]
    verbosity: Verbosity,

    /// Path to schema file
    #[arg(
        short,
        long,
        env = "IAC_VALIDATE_SCHEMA",
        value_name = "FILE",
        long_help = format!("Path to schema file [default: {}]", defaults::DEFAULT_SCHEMA)
    )]
    schema: Option<PathBuf>,

    /// Path to directory with semantic validation rules
    #[arg(
        short,
        long,
        env = "IAC_VALIDATE_RULES",
        value_name = "DIR",
        long_help = format!("Path to directory with semantic validation rules [default: {}]", defaults::DEFAULT_RULES)
    )]
    rules: Option<PathBuf>,

    /// Write merged content from YAML files to a new YAML file
    #[arg(short, long, env = "IAC_VALIDATE_OUTPUT", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Accept keys the schema does not declare
    #[arg(long, env = "IAC_VALIDATE_NON_STRICT")]
    non_strict: bool,

    /// Validate the merged content instead of each file
    #[arg(long, env = "IAC_VALIDATE_MERGED")]
    merged: bool,

    /// Password file used to decrypt !vault values with ansible-vault
    #[arg(long, env = "IAC_VALIDATE_VAULT_PASSWORD_FILE", value_name = "FILE")]
    vault_password_file: Option<PathBuf>,

    /// Files or directories with YAML input
    #[arg(required = true, value_parser = existing_path)]
    paths: Vec<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Verbosity {
    #[value(name = "CRITICAL")]
    Critical,
    #[value(name = "ERROR")]
    Error,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "INFO")]
    Info,
    #[value(name = "DEBUG")]
    Debug,
}

impl Verbosity {
    fn filter(self) -> &'static str {
        match self {
            Verbosity::Critical | Verbosity::Error => "error",
            Verbosity::Warning => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        }
    }
}

fn existing_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("path '{}' does not exist", value))
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --verbosity
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.verbosity.filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut config = ValidatorConfig::new()
        .with_strict(!cli.non_strict)
        .with_syntax_mode(if cli.merged {
            SyntaxMode::Merged
        } else {
            SyntaxMode::PerFile
        });
    if let Some(schema) = cli.schema {
        config = config.with_schema(schema);
    }
    if let Some(rules) = cli.rules {
        config = config.with_rules(rules);
    }
    if let Some(password_file) = cli.vault_password_file {
        config = config.with_decryptor(Arc::new(AnsibleVaultDecryptor::new(password_file)));
    }

    let validator = Validator::new(config)?;
    let report = validator.run(&cli.paths, cli.output.as_deref());
    tracing::debug!(diagnostics = report.diagnostics.len(), "validation finished");

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
