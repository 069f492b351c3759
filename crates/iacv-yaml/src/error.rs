//! Error types for YAML parsing with source locations.

use crate::SourceInfo;
use crate::tags::TagError;
use thiserror::Error;

/// Result type alias for iacv-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// YAML syntax error
    #[error("{message}")]
    ParseError {
        message: String,
        location: Option<SourceInfo>,
    },

    /// A tag that is neither a standard YAML tag nor `!env`/`!vault`
    #[error("unknown tag '{tag}'")]
    UnknownTag { tag: String, location: SourceInfo },

    /// A recognized tag whose value could not be resolved
    #[error("cannot resolve tag '!{tag}': {source}")]
    TagResolution {
        tag: String,
        #[source]
        source: TagError,
        location: SourceInfo,
    },

    /// Well-formed YAML that cannot be represented as a document tree
    #[error("{message}")]
    InvalidStructure {
        message: String,
        location: Option<SourceInfo>,
    },
}

impl Error {
    /// Where in the source the error was detected, if known.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            Error::ParseError { location, .. } | Error::InvalidStructure { location, .. } => {
                location.as_ref()
            }
            Error::UnknownTag { location, .. } | Error::TagResolution { location, .. } => {
                Some(location)
            }
        }
    }

    /// Attach a filename to the error location.
    pub fn with_file(self, file: &str) -> Self {
        let set = |location: SourceInfo| location.with_file(file);
        match self {
            Error::ParseError { message, location } => Error::ParseError {
                message,
                location: location.map(set),
            },
            Error::InvalidStructure { message, location } => Error::InvalidStructure {
                message,
                location: location.map(set),
            },
            Error::UnknownTag { tag, location } => Error::UnknownTag {
                tag,
                location: set(location),
            },
            Error::TagResolution {
                tag,
                source,
                location,
            } => Error::TagResolution {
                tag,
                source,
                location: set(location),
            },
        }
    }
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::ParseError {
            message: err.info().to_string(),
            location: Some(SourceInfo::from_marker(err.marker(), 0)),
        }
    }
}
