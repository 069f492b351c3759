//! Finding, parsing and merging input documents.

use crate::defaults::YAML_SUFFIXES;
use iacv_merge::{MergeOptions, merge_documents};
use iacv_yaml::{Node, TagResolver};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while loading input documents.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input path '{}' does not exist", .0.display())]
    MissingPath(PathBuf),

    #[error("cannot walk '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("cannot load '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: iacv_yaml::Error,
    },

    #[error("cannot load '{}': document root must be a mapping, found {found}", path.display())]
    NotAMapping { path: PathBuf, found: &'static str },
}

/// A document file to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Named on the command line rather than found in a directory
    pub explicit: bool,
}

/// Whether `path` has one of the recognized YAML suffixes.
pub fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| YAML_SUFFIXES.contains(&ext))
}

/// Loads input paths into a single merged tree.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    resolver: TagResolver,
    merge_options: MergeOptions,
}

impl Loader {
    pub fn new(resolver: TagResolver) -> Self {
        Self {
            resolver,
            merge_options: MergeOptions::default(),
        }
    }

    pub fn with_merge_options(mut self, options: MergeOptions) -> Self {
        self.merge_options = options;
        self
    }

    /// Recognized document files under `paths`.
    ///
    /// Directories are walked recursively with entries sorted by file name,
    /// following symbolic links. Entries the walk cannot read are skipped
    /// with a warning.
    pub fn documents(&self, paths: &[PathBuf]) -> Result<Vec<SourceFile>, LoadError> {
        let mut files = Vec::new();
        for path in paths {
            if path.is_file() {
                if is_yaml_file(path) {
                    files.push(SourceFile {
                        path: path.clone(),
                        explicit: true,
                    });
                } else {
                    tracing::debug!(path = %path.display(), "ignoring file without YAML suffix");
                }
            } else if path.is_dir() {
                for entry in WalkDir::new(path).follow_links(true).sort_by_file_name() {
                    let entry = match entry {
                        Ok(entry) => entry,
                        Err(source) => {
                            let err = LoadError::Walk {
                                path: path.clone(),
                                source,
                            };
                            tracing::warn!("skipping entry: {}", err);
                            continue;
                        }
                    };
                    if entry.file_type().is_file() && is_yaml_file(entry.path()) {
                        files.push(SourceFile {
                            path: entry.into_path(),
                            explicit: false,
                        });
                    }
                }
            } else {
                return Err(LoadError::MissingPath(path.clone()));
            }
        }
        Ok(files)
    }

    /// Parse one document, resolving custom tags.
    pub fn parse_document(&self, path: &Path) -> Result<Node, LoadError> {
        tracing::debug!(path = %path.display(), "loading document");
        let node = iacv_yaml::parse_path(path, &self.resolver).map_err(|source| {
            LoadError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        if !node.is_mapping() {
            return Err(LoadError::NotAMapping {
                path: path.to_path_buf(),
                found: node.type_name(),
            });
        }
        Ok(node)
    }

    /// Load and merge every document under `paths`.
    ///
    /// A broken file named explicitly aborts the load; one found while
    /// walking a directory is skipped with a warning.
    pub fn load(&self, paths: &[PathBuf]) -> Result<Node, LoadError> {
        let mut documents = Vec::new();
        for file in self.documents(paths)? {
            match self.parse_document(&file.path) {
                Ok(node) => documents.push(node),
                Err(err) if file.explicit => return Err(err),
                Err(err) => tracing::warn!("skipping file: {}", err),
            }
        }

        tracing::debug!(documents = documents.len(), "merging documents");
        Ok(merge_documents(documents, &self.merge_options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_documents_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.yml", "b: 1\n");
        write(dir.path(), "a.yaml", "a: 1\n");
        write(dir.path(), "readme.md", "# no\n");
        write(dir.path(), "sub/c.yaml", "c: 1\n");

        let files = Loader::default()
            .documents(&[dir.path().to_path_buf()])
            .unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| f.path.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yml", "sub/c.yaml"]);
        assert!(files.iter().all(|f| !f.explicit));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_walk_entry_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.yaml", "a: 1\n");
        write(dir.path(), "z.yaml", "z: 1\n");
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("m.yaml")).unwrap();

        let loader = Loader::default();
        let files = loader.documents(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|f| f.path.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.yaml", "z.yaml"]);

        let tree = loader.load(&[dir.path().to_path_buf()]).unwrap();
        assert!(tree.get("a").is_some());
        assert!(tree.get("z").is_some());
    }

    #[test]
    fn test_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Loader::default()
            .documents(&[dir.path().join("absent")])
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingPath(_)));
    }

    #[test]
    fn test_load_merges_documents() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1.yaml", "root:\n  children:\n    - name: a\n");
        write(dir.path(), "2.yaml", "root:\n  children:\n    - name: a\n      extra: v\n");

        let tree = Loader::default().load(&[dir.path().to_path_buf()]).unwrap();
        let children = tree.get_path(&["root", "children"]).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(
            children.as_sequence().unwrap()[0].get("extra").and_then(Node::as_str),
            Some("v")
        );
    }

    #[test]
    fn test_broken_walked_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "good.yaml", "a: 1\n");
        write(dir.path(), "bad.yaml", "a: [unclosed\n");

        let tree = Loader::default().load(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(tree.get("a").and_then(|n| n.scalar_text()), Some("1".to_string()));
    }

    #[test]
    fn test_broken_explicit_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(dir.path(), "bad.yaml", "a: [unclosed\n");
        let err = Loader::default().load(&[bad]).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_non_mapping_root() {
        let dir = tempfile::tempdir().unwrap();
        let list = write(dir.path(), "list.yaml", "- a\n- b\n");
        let err = Loader::default().parse_document(&list).unwrap_err();
        assert!(matches!(err, LoadError::NotAMapping { found: "array", .. }));
    }

    #[test]
    fn test_merge_without_deduplication() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.yaml", "list: [x]\n");
        let b = write(dir.path(), "b.yaml", "list: [x]\n");

        let dedup = Loader::default().load(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(dedup.get("list").map(Node::len), Some(1));

        let plain = Loader::default()
            .with_merge_options(MergeOptions { deduplicate: false })
            .load(&[a, b])
            .unwrap();
        assert_eq!(plain.get("list").map(Node::len), Some(2));
    }
}
