//! # iacv-schema
//!
//! A small schema language for YAML documents and a validator that checks
//! [`iacv_yaml::Node`] trees against it.
//!
//! Schemas are written in YAML:
//!
//! ```yaml
//! object:
//!   properties:
//!     name:
//!       string:
//!         pattern: "^[a-z0-9-]+$"
//!     mode: [access, trunk]
//!     vlan:
//!       integer: {minimum: 1, maximum: 4094}
//!   required: [name]
//! ```
//!
//! Validation collects every violation. Each [`ValidationError`] carries the
//! instance path, the schema path and the location of the offending value,
//! which is the input file it came from even after documents were merged.
//!
//! ```rust
//! use iacv_schema::SchemaFile;
//!
//! let schema = SchemaFile::parse("object:\n  properties:\n    name: string\n", "schema.yaml").unwrap();
//! let data = iacv_yaml::parse_file("name: 42\n", "data.yaml").unwrap();
//!
//! let errors = schema.validate(&data, true);
//! assert_eq!(errors[0].to_string(), "name: Expected string, got integer (line 1, column 7)");
//! ```

pub mod error;
pub mod schema;
mod schema_file;
pub mod validator;

pub use error::{
    InstancePath, PathSegment, SchemaError, SchemaPath, SchemaResult, ValidationError,
    ValidationErrorKind,
};
pub use schema::{Schema, SchemaRegistry};
pub use schema_file::SchemaFile;
pub use validator::validate;
