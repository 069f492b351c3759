//! Helper functions for parsing schemas
//!
//! Utility functions for extracting typed values from schema mappings,
//! with errors that point at the offending node.

use crate::error::{SchemaError, SchemaResult};
use iacv_yaml::{Node, SourceInfo};
use yaml_rust2::Yaml;

use super::types::Pattern;

pub(super) fn invalid(node: &Node, message: impl Into<String>) -> SchemaError {
    SchemaError::InvalidStructure {
        message: message.into(),
        location: node.source_info.clone(),
    }
}

/// Get a string value from a mapping by key
pub(super) fn get_string(node: &Node, key: &str) -> SchemaResult<Option<String>> {
    if let Some(value) = node.get(key) {
        if let Some(s) = value.as_str() {
            return Ok(Some(s.to_string()));
        }
        return Err(invalid(value, format!("Field '{}' must be a string", key)));
    }
    Ok(None)
}

/// Get a number value from a mapping by key
pub(super) fn get_number(node: &Node, key: &str) -> SchemaResult<Option<f64>> {
    if let Some(value) = node.get(key) {
        match value.as_yaml() {
            Some(Yaml::Integer(i)) => return Ok(Some(*i as f64)),
            Some(Yaml::Real(r)) => {
                if let Ok(f) = r.parse::<f64>() {
                    return Ok(Some(f));
                }
            }
            _ => {}
        }
        return Err(invalid(value, format!("Field '{}' must be a number", key)));
    }
    Ok(None)
}

/// Get a usize value from a mapping by key
pub(super) fn get_usize(node: &Node, key: &str) -> SchemaResult<Option<usize>> {
    if let Some(value) = node.get(key) {
        if let Some(i) = value.as_yaml().and_then(Yaml::as_i64)
            && let Ok(n) = usize::try_from(i)
        {
            return Ok(Some(n));
        }
        return Err(invalid(
            value,
            format!("Field '{}' must be a non-negative integer", key),
        ));
    }
    Ok(None)
}

/// Get a boolean value from a mapping by key
pub(super) fn get_bool(node: &Node, key: &str) -> SchemaResult<Option<bool>> {
    if let Some(value) = node.get(key) {
        if let Some(b) = value.as_yaml().and_then(Yaml::as_bool) {
            return Ok(Some(b));
        }
        return Err(invalid(value, format!("Field '{}' must be a boolean", key)));
    }
    Ok(None)
}

/// Get an array of strings from a mapping by key
pub(super) fn get_string_array(node: &Node, key: &str) -> SchemaResult<Option<Vec<String>>> {
    if let Some(value) = node.get(key) {
        let items = value
            .as_sequence()
            .ok_or_else(|| invalid(value, format!("Field '{}' must be an array", key)))?;

        let result: SchemaResult<Vec<_>> = items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(item, format!("Field '{}' items must be strings", key)))
            })
            .collect();
        return Ok(Some(result?));
    }
    Ok(None)
}

/// Get a compiled pattern from a mapping by key
pub(super) fn get_pattern(node: &Node, key: &str) -> SchemaResult<Option<Pattern>> {
    match get_string(node, key)? {
        Some(pattern) => compile_pattern(&pattern, &node.source_info).map(Some),
        None => Ok(None),
    }
}

pub(super) fn compile_pattern(pattern: &str, location: &SourceInfo) -> SchemaResult<Pattern> {
    Pattern::new(pattern).map_err(|source| SchemaError::InvalidPattern {
        pattern: pattern.to_string(),
        location: location.clone(),
        source,
    })
}

/// Convert a scalar to a JSON value (for enum values)
pub(super) fn scalar_to_json_value(node: &Node) -> SchemaResult<serde_json::Value> {
    match node.as_yaml() {
        Some(Yaml::String(s)) => Ok(serde_json::Value::String(s.clone())),
        Some(Yaml::Integer(i)) => Ok(serde_json::Value::Number((*i).into())),
        Some(Yaml::Real(r)) => {
            if let Ok(f) = r.parse::<f64>()
                && let Some(n) = serde_json::Number::from_f64(f)
            {
                return Ok(serde_json::Value::Number(n));
            }
            Err(invalid(node, format!("Invalid number: {}", r)))
        }
        Some(Yaml::Boolean(b)) => Ok(serde_json::Value::Bool(*b)),
        Some(Yaml::Null) => Ok(serde_json::Value::Null),
        _ => Err(invalid(node, "enum values must be scalars")),
    }
}
