//! Serialization of document trees back to YAML text.

use crate::Node;
use std::path::Path;
use thiserror::Error;
use yaml_rust2::YamlEmitter;

/// Errors raised while writing a document.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("YAML emitter failed: {0}")]
    Emit(String),

    #[error("cannot write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Render a document as YAML text.
///
/// Mapping keys keep their insertion order. The output always ends with a
/// newline.
pub fn to_yaml_string(node: &Node) -> Result<String, EmitError> {
    let yaml = node.to_yaml();
    let mut out = String::new();
    YamlEmitter::new(&mut out)
        .dump(&yaml)
        .map_err(|e| EmitError::Emit(format!("{:?}", e)))?;

    // The emitter writes a document start marker and no trailing newline.
    let body = out.strip_prefix("---\n").unwrap_or(&out);
    let mut text = body.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Write a document to `path`, creating or truncating the file.
pub fn write_yaml_file(node: &Node, path: &Path) -> Result<(), EmitError> {
    let text = to_yaml_string(node)?;
    std::fs::write(path, text).map_err(|source| EmitError::Io {
        path: path.display().to_string(),
        source,
    })
}
