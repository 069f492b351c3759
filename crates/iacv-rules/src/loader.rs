//! Discovery of rule files.

use crate::definition::RuleDefinition;
use crate::error::{RuleError, RuleLoadError};
use crate::kinds::RuleKinds;
use crate::rule::Rule;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Rules by id, in load order.
pub type RuleSet = IndexMap<String, Box<dyn Rule>>;

/// Outcome of loading a rules directory: the rules that loaded and the
/// files that did not.
#[derive(Debug, Default)]
pub struct LoadedRules {
    pub rules: RuleSet,
    pub errors: Vec<RuleLoadError>,
}

/// Load every `*.yaml` / `*.yml` file directly inside `dir`.
///
/// Files are read in file-name order. A file that cannot be read, parsed or
/// instantiated is recorded in [`LoadedRules::errors`] and skipped; reporting
/// those errors is left to the caller. When two files declare the same id the
/// later one wins.
pub fn load_rules(dir: &Path, kinds: &RuleKinds) -> LoadedRules {
    let mut loaded = LoadedRules::default();

    let files = match rule_files(dir) {
        Ok(files) => files,
        Err(err) => {
            tracing::debug!(dir = %dir.display(), "cannot read rules directory: {}", err);
            loaded.errors.push(RuleLoadError::new(dir, err));
            return loaded;
        }
    };

    for file in files {
        match load_rule_file(&file, kinds) {
            Ok(rule) => {
                tracing::debug!(id = rule.id(), file = %file.display(), "loaded rule");
                let id = rule.id().to_string();
                if loaded.rules.insert(id.clone(), rule).is_some() {
                    tracing::warn!(
                        id = %id,
                        file = %file.display(),
                        "rule id defined more than once, the later definition replaces the earlier one"
                    );
                }
            }
            Err(err) => {
                tracing::debug!("{}", err);
                loaded.errors.push(err);
            }
        }
    }

    loaded
}

/// Load a single rule file.
pub fn load_rule_file(path: &Path, kinds: &RuleKinds) -> Result<Box<dyn Rule>, RuleLoadError> {
    let load = || -> Result<Box<dyn Rule>, RuleError> {
        let content = std::fs::read_to_string(path)?;
        let node = iacv_yaml::parse_file(&content, &path.display().to_string())?;
        let definition = RuleDefinition::from_node(&node)?;
        kinds.create(&definition)
    };
    load().map_err(|source| RuleLoadError::new(path, source))
}

fn rule_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if is_yaml && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
