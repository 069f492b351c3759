//! # iacv-rules
//!
//! Semantic rules over a merged document tree.
//!
//! Rules are declared in YAML files inside a rules directory. Each file
//! names a rule kind, compiled code registered in [`RuleKinds`], and the
//! parameters that kind needs:
//!
//! ```yaml
//! id: "101"
//! description: Verify child naming restrictions
//! severity: HIGH
//! kind: forbidden_values
//! path: root.children.name
//! values: [FORBIDDEN]
//! ```
//!
//! [`evaluate`] runs every loaded rule and returns the findings of the rules
//! that failed, keyed by rule id.

mod builtin;
mod definition;
mod error;
mod evaluate;
mod kinds;
mod loader;
pub mod path;
mod rule;

pub use builtin::{ForbiddenValues, Reference, RequiredKeys, SchemaPresent, UniqueValues};
pub use definition::RuleDefinition;
pub use error::{RuleError, RuleLoadError};
pub use evaluate::evaluate;
pub use kinds::{RuleFactory, RuleKinds};
pub use loader::{LoadedRules, RuleSet, load_rule_file, load_rules};
pub use rule::{Rule, RuleHeader, Severity};
