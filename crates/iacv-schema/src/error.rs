// Error types for schema loading and validation

use iacv_yaml::SourceInfo;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while loading a schema
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Unknown schema type name
    #[error("invalid schema type '{name}' at {location}")]
    InvalidType { name: String, location: SourceInfo },

    /// Invalid schema structure
    #[error("invalid schema structure: {message} (at {location})")]
    InvalidStructure {
        message: String,
        location: SourceInfo,
    },

    /// A pattern that does not compile
    #[error("invalid pattern '{pattern}' at {location}: {source}")]
    InvalidPattern {
        pattern: String,
        location: SourceInfo,
        #[source]
        source: regex::Error,
    },

    /// Reference to a definition that does not exist
    #[error("unresolved schema reference '{0}'")]
    UnresolvedRef(String),

    /// The schema file could not be read
    #[error("cannot read schema file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] iacv_yaml::Error),
}

/// Result type for schema parsing operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Structured validation error kinds
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ValidationErrorKind {
    /// Type mismatch
    TypeMismatch { expected: String, got: String },

    /// Missing required property
    MissingRequiredProperty { property: String },

    /// Property not declared by the schema
    UnknownProperty { property: String },

    /// Value not in enum
    InvalidEnumValue { value: String, allowed: Vec<String> },

    /// Number out of range
    NumberOutOfRange {
        value: f64,
        minimum: Option<f64>,
        maximum: Option<f64>,
        exclusive_minimum: Option<f64>,
        exclusive_maximum: Option<f64>,
    },

    /// Number not a multiple of
    NumberNotMultipleOf { value: f64, multiple_of: f64 },

    /// String length invalid
    StringLengthInvalid {
        length: usize,
        min_length: Option<usize>,
        max_length: Option<usize>,
    },

    /// String doesn't match pattern
    StringPatternMismatch { value: String, pattern: String },

    /// Array length invalid
    ArrayLengthInvalid {
        length: usize,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },

    /// Array items not unique
    ArrayItemsNotUnique,

    /// Object property count invalid
    ObjectPropertyCountInvalid {
        count: usize,
        min_properties: Option<usize>,
        max_properties: Option<usize>,
    },

    /// Value matched none of the `anyOf` alternatives
    NoAlternativeMatched { alternatives: usize },

    /// Value rejected by a `false` schema
    NotAllowed,

    /// Unresolved schema reference
    UnresolvedReference { ref_id: String },

    /// Message supplied by the schema's `errorMessage` annotation
    Custom { message: String },
}

impl ValidationErrorKind {
    /// Format a human-readable message from this error kind
    pub fn message(&self) -> String {
        match self {
            ValidationErrorKind::TypeMismatch { expected, got } => {
                format!("Expected {}, got {}", expected, got)
            }
            ValidationErrorKind::MissingRequiredProperty { property } => {
                format!("Missing required property '{}'", property)
            }
            ValidationErrorKind::UnknownProperty { property } => {
                format!("Unknown property '{}'", property)
            }
            ValidationErrorKind::InvalidEnumValue { value, allowed } => {
                format!(
                    "Value must be one of: {}, got '{}'",
                    allowed.join(", "),
                    value
                )
            }
            ValidationErrorKind::NumberOutOfRange {
                value,
                minimum,
                maximum,
                exclusive_minimum,
                exclusive_maximum,
            } => {
                if let Some(min) = minimum {
                    format!("Number {} is less than minimum {}", value, min)
                } else if let Some(max) = maximum {
                    format!("Number {} is greater than maximum {}", value, max)
                } else if let Some(min) = exclusive_minimum {
                    format!("Number {} is not greater than {}", value, min)
                } else if let Some(max) = exclusive_maximum {
                    format!("Number {} is not less than {}", value, max)
                } else {
                    format!("Number {} is out of range", value)
                }
            }
            ValidationErrorKind::NumberNotMultipleOf { value, multiple_of } => {
                format!("Number {} is not a multiple of {}", value, multiple_of)
            }
            ValidationErrorKind::StringLengthInvalid {
                length,
                min_length,
                max_length,
            } => {
                if let Some(min) = min_length {
                    format!("String length {} is less than minimum {}", length, min)
                } else if let Some(max) = max_length {
                    format!("String length {} is greater than maximum {}", length, max)
                } else {
                    format!("String length {} is invalid", length)
                }
            }
            ValidationErrorKind::StringPatternMismatch { value, pattern } => {
                format!("String '{}' does not match pattern '{}'", value, pattern)
            }
            ValidationErrorKind::ArrayLengthInvalid {
                length,
                min_items,
                max_items,
            } => {
                if let Some(min) = min_items {
                    format!("Array length {} is less than minimum {}", length, min)
                } else if let Some(max) = max_items {
                    format!("Array length {} is greater than maximum {}", length, max)
                } else {
                    format!("Array length {} is invalid", length)
                }
            }
            ValidationErrorKind::ArrayItemsNotUnique => "Array items must be unique".to_string(),
            ValidationErrorKind::ObjectPropertyCountInvalid {
                count,
                min_properties,
                max_properties,
            } => {
                if let Some(min) = min_properties {
                    format!("Object has {} properties, less than minimum {}", count, min)
                } else if let Some(max) = max_properties {
                    format!(
                        "Object has {} properties, greater than maximum {}",
                        count, max
                    )
                } else {
                    format!("Object has {} properties (invalid)", count)
                }
            }
            ValidationErrorKind::NoAlternativeMatched { alternatives } => {
                format!("Value does not match any of the {} allowed schemas", alternatives)
            }
            ValidationErrorKind::NotAllowed => "Value is not allowed here".to_string(),
            ValidationErrorKind::UnresolvedReference { ref_id } => {
                format!("Unresolved schema reference: {}", ref_id)
            }
            ValidationErrorKind::Custom { message } => message.clone(),
        }
    }
}

/// Validation error with source location information
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ValidationError {
    /// The structured error kind
    pub kind: ValidationErrorKind,
    /// Instance path where the error occurred (e.g., ["root", "children", 0])
    pub instance_path: InstancePath,
    /// Schema path that failed (e.g., ["object", "properties", "root"])
    pub schema_path: SchemaPath,
    /// Where the offending node was read from
    pub location: Option<SourceInfo>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.instance_path, self.kind.message())?;
        if let Some(loc) = &self.location {
            write!(f, " (line {}, column {})", loc.line, loc.col)?;
        }
        Ok(())
    }
}

impl ValidationError {
    /// Create a new validation error with a structured kind
    pub fn new(kind: ValidationErrorKind, instance_path: InstancePath) -> Self {
        Self {
            kind,
            instance_path,
            schema_path: SchemaPath::new(),
            location: None,
        }
    }

    /// Get the human-readable message for this error
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// File the offending node came from, if known
    pub fn file(&self) -> Option<&str> {
        self.location.as_ref().and_then(|loc| loc.file.as_deref())
    }

    /// Set the schema path for this error
    pub fn with_schema_path(mut self, schema_path: SchemaPath) -> Self {
        self.schema_path = schema_path;
        self
    }

    /// Set the source location for this error
    pub fn with_location(mut self, location: SourceInfo) -> Self {
        self.location = Some(location);
        self
    }
}

/// Instance path (e.g., ["root", "children", 0, "name"])
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstancePath {
    segments: Vec<PathSegment>,
}

impl InstancePath {
    /// Create a new empty instance path
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Push a segment onto the path
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Push a key segment onto the path
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Push an index segment onto the path
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Pop the last segment from the path
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Get the segments as a slice
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the length of the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i > 0 => write!(f, ".{}", key)?,
                PathSegment::Key(key) => write!(f, "{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Schema path (e.g., ["object", "properties", "root"])
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaPath {
    segments: Vec<String>,
}

impl SchemaPath {
    /// Create a new empty schema path
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Push a segment onto the path
    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Pop the last segment from the path
    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Get the segments as a slice
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.segments.join(" > "))
        }
    }
}

/// A segment in an instance path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_path_display() {
        let mut path = InstancePath::new();
        assert_eq!(path.to_string(), "(root)");

        path.push_key("root");
        assert_eq!(path.to_string(), "root");

        path.push_key("children");
        path.push_index(0);
        path.push_key("name");
        assert_eq!(path.to_string(), "root.children[0].name");
    }

    #[test]
    fn test_schema_path_display() {
        let mut path = SchemaPath::new();
        assert_eq!(path.to_string(), "(root)");

        path.push("object");
        path.push("properties");
        assert_eq!(path.to_string(), "object > properties");
    }

    #[test]
    fn test_validation_error_display() {
        let mut path = InstancePath::new();
        path.push_key("port");

        let error = ValidationError::new(
            ValidationErrorKind::TypeMismatch {
                expected: "integer".to_string(),
                got: "string".to_string(),
            },
            path,
        )
        .with_location(SourceInfo::new(Some("a.yaml".into()), 0, 4, 7, 3));

        assert_eq!(error.message(), "Expected integer, got string");
        assert_eq!(error.file(), Some("a.yaml"));
        assert_eq!(
            error.to_string(),
            "port: Expected integer, got string (line 4, column 7)"
        );
    }

    #[test]
    fn test_custom_message() {
        let error = ValidationError::new(
            ValidationErrorKind::Custom {
                message: "VLAN ids are 1-4094".to_string(),
            },
            InstancePath::new(),
        );
        assert_eq!(error.to_string(), "(root): VLAN ids are 1-4094");
    }
}
