//! Built-in rule kinds.

mod forbidden_values;
mod reference;
mod required_keys;
mod schema_present;
mod unique_values;

pub use forbidden_values::ForbiddenValues;
pub use reference::Reference;
pub use required_keys::RequiredKeys;
pub use schema_present::SchemaPresent;
pub use unique_values::UniqueValues;

/// Format a finding the way every value-based rule reports it.
fn finding(path: &str, value: &str) -> String {
    format!("{} - {}", path, value)
}
