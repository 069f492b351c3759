// Structural validation of document trees

use crate::error::{
    InstancePath, PathSegment, SchemaPath, ValidationError, ValidationErrorKind,
};
use crate::schema::{
    AllOfSchema, AnyOfSchema, ArraySchema, EnumSchema, NumberSchema, ObjectSchema, RefSchema,
    Schema, SchemaRegistry, StringSchema,
};
use iacv_yaml::{Node, NodeKind, scalar_to_string};
use std::collections::HashSet;
use yaml_rust2::Yaml;

/// Nested `ref` resolutions allowed before a schema is treated as cyclic.
const MAX_REF_DEPTH: usize = 256;

/// Validate a document tree against a schema.
///
/// Every violation is collected, not just the first one. With `strict` set,
/// object keys not covered by the schema are violations; otherwise only
/// `closed` objects reject them.
pub fn validate(
    node: &Node,
    schema: &Schema,
    registry: &SchemaRegistry,
    strict: bool,
) -> Vec<ValidationError> {
    let mut context = ValidationContext::new(registry, strict);
    validate_generic(node, schema, &mut context);
    tracing::trace!(errors = context.errors.len(), strict, "schema validation finished");
    context.errors
}

/// Validation context tracks state during validation
pub struct ValidationContext<'a> {
    /// Named definitions for `ref` resolution
    registry: &'a SchemaRegistry,
    strict: bool,
    /// Current instance path (e.g., ["root", "children", 0])
    instance_path: InstancePath,
    /// Current schema path (e.g., ["object", "properties", "root"])
    schema_path: SchemaPath,
    ref_depth: usize,
    /// Collected validation errors
    errors: Vec<ValidationError>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(registry: &'a SchemaRegistry, strict: bool) -> Self {
        Self {
            registry,
            strict,
            instance_path: InstancePath::new(),
            schema_path: SchemaPath::new(),
            ref_depth: 0,
            errors: Vec::new(),
        }
    }

    /// A fresh context at the same position, for trying alternatives.
    fn fork(&self) -> Self {
        Self {
            registry: self.registry,
            strict: self.strict,
            instance_path: self.instance_path.clone(),
            schema_path: self.schema_path.clone(),
            ref_depth: self.ref_depth,
            errors: Vec::new(),
        }
    }

    /// Add an error located at `node`
    pub fn add_error(&mut self, kind: ValidationErrorKind, node: &Node) {
        let error = ValidationError::new(kind, self.instance_path.clone())
            .with_schema_path(self.schema_path.clone())
            .with_location(node.source_info.clone());
        self.errors.push(error);
    }

    /// Execute a function with a new instance path segment
    pub fn with_instance_path<F, R>(&mut self, segment: PathSegment, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.instance_path.push(segment);
        let result = f(self);
        self.instance_path.pop();
        result
    }

    /// Execute a function with a new schema path segment
    pub fn with_schema_path<F, R>(&mut self, segment: impl Into<String>, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.schema_path.push(segment);
        let result = f(self);
        self.schema_path.pop();
        result
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Main validation dispatcher
fn validate_generic(node: &Node, schema: &Schema, context: &mut ValidationContext) {
    let start = context.errors.len();

    match schema {
        Schema::True | Schema::Any(_) => {}
        Schema::False => context.add_error(ValidationErrorKind::NotAllowed, node),
        Schema::Boolean(_) => context.with_schema_path("boolean", |ctx| {
            if !matches!(node.as_yaml(), Some(Yaml::Boolean(_))) {
                type_mismatch(ctx, "boolean", node);
            }
        }),
        Schema::Null(_) => context.with_schema_path("null", |ctx| {
            if !node.is_null() {
                type_mismatch(ctx, "null", node);
            }
        }),
        Schema::Number(s) => context.with_schema_path(schema.type_name(), |ctx| {
            validate_number(node, s, ctx)
        }),
        Schema::String(s) => {
            context.with_schema_path("string", |ctx| validate_string(node, s, ctx))
        }
        Schema::Enum(s) => context.with_schema_path("enum", |ctx| validate_enum(node, s, ctx)),
        Schema::AnyOf(s) => context.with_schema_path("anyOf", |ctx| validate_any_of(node, s, ctx)),
        Schema::AllOf(s) => context.with_schema_path("allOf", |ctx| validate_all_of(node, s, ctx)),
        Schema::Array(s) => context.with_schema_path("array", |ctx| validate_array(node, s, ctx)),
        Schema::Object(s) => {
            context.with_schema_path("object", |ctx| validate_object(node, s, ctx))
        }
        Schema::Ref(s) => validate_ref(node, s, context),
    }

    // errorMessage replaces whatever this schema reported
    if context.errors.len() > start
        && let Some(message) = &schema.annotations().error_message
    {
        context.errors.truncate(start);
        context.add_error(
            ValidationErrorKind::Custom {
                message: message.clone(),
            },
            node,
        );
    }
}

fn type_mismatch(context: &mut ValidationContext, expected: &str, node: &Node) {
    context.add_error(
        ValidationErrorKind::TypeMismatch {
            expected: expected.to_string(),
            got: node.type_name().to_string(),
        },
        node,
    );
}

fn validate_ref(node: &Node, schema: &RefSchema, context: &mut ValidationContext) {
    let Some(resolved) = context.registry.resolve(&schema.reference) else {
        context.add_error(
            ValidationErrorKind::UnresolvedReference {
                ref_id: schema.reference.clone(),
            },
            node,
        );
        return;
    };

    if context.ref_depth >= MAX_REF_DEPTH {
        context.add_error(
            ValidationErrorKind::Custom {
                message: format!(
                    "Schema reference '{}' nests too deeply (cyclic definition?)",
                    schema.reference
                ),
            },
            node,
        );
        return;
    }

    context.ref_depth += 1;
    context.with_schema_path(format!("ref({})", schema.reference), |ctx| {
        validate_generic(node, resolved, ctx)
    });
    context.ref_depth -= 1;
}

/// Validate a number value
///
/// Integer schemas only accept integer scalars; every violated bound is
/// reported separately.
fn validate_number(node: &Node, schema: &NumberSchema, context: &mut ValidationContext) {
    let num = match node.as_yaml() {
        Some(Yaml::Integer(n)) => *n as f64,
        Some(real @ Yaml::Real(_)) if !schema.integer => real.as_f64().unwrap_or(f64::NAN),
        _ => {
            let expected = if schema.integer { "integer" } else { "number" };
            return type_mismatch(context, expected, node);
        }
    };

    let out_of_range = |minimum: Option<f64>,
                        maximum: Option<f64>,
                        exclusive_minimum: Option<f64>,
                        exclusive_maximum: Option<f64>| {
        ValidationErrorKind::NumberOutOfRange {
            value: num,
            minimum,
            maximum,
            exclusive_minimum,
            exclusive_maximum,
        }
    };

    if let Some(min) = schema.minimum
        && num < min
    {
        context.add_error(out_of_range(Some(min), None, None, None), node);
    }

    if let Some(max) = schema.maximum
        && num > max
    {
        context.add_error(out_of_range(None, Some(max), None, None), node);
    }

    if let Some(min) = schema.exclusive_minimum
        && num <= min
    {
        context.add_error(out_of_range(None, None, Some(min), None), node);
    }

    if let Some(max) = schema.exclusive_maximum
        && num >= max
    {
        context.add_error(out_of_range(None, None, None, Some(max)), node);
    }

    if let Some(multiple) = schema.multiple_of
        && multiple != 0.0
        && !is_multiple_of(num, multiple)
    {
        context.add_error(
            ValidationErrorKind::NumberNotMultipleOf {
                value: num,
                multiple_of: multiple,
            },
            node,
        );
    }
}

/// Whether `num` is a whole multiple of `multiple`, allowing for the
/// rounding error of decimal fractions such as `0.1`.
fn is_multiple_of(num: f64, multiple: f64) -> bool {
    let quotient = num / multiple;
    (quotient - quotient.round()).abs() <= 1e-9 * quotient.abs().max(1.0)
}

/// Validate a string value; lengths count characters.
fn validate_string(node: &Node, schema: &StringSchema, context: &mut ValidationContext) {
    let Some(s) = node.as_str() else {
        return type_mismatch(context, "string", node);
    };
    let length = s.chars().count();

    if let Some(min) = schema.min_length
        && length < min
    {
        context.add_error(
            ValidationErrorKind::StringLengthInvalid {
                length,
                min_length: Some(min),
                max_length: None,
            },
            node,
        );
    }

    if let Some(max) = schema.max_length
        && length > max
    {
        context.add_error(
            ValidationErrorKind::StringLengthInvalid {
                length,
                min_length: None,
                max_length: Some(max),
            },
            node,
        );
    }

    if let Some(pattern) = &schema.pattern
        && !pattern.is_match(s)
    {
        context.add_error(
            ValidationErrorKind::StringPatternMismatch {
                value: s.to_string(),
                pattern: pattern.as_str().to_string(),
            },
            node,
        );
    }
}

fn validate_enum(node: &Node, schema: &EnumSchema, context: &mut ValidationContext) {
    let value = node_to_json_value(node);
    if schema.values.contains(&value) {
        return;
    }

    context.add_error(
        ValidationErrorKind::InvalidEnumValue {
            value: node
                .scalar_text()
                .unwrap_or_else(|| node.type_name().to_string()),
            allowed: schema.values.iter().map(json_value_text).collect(),
        },
        node,
    );
}

/// Validate anyOf (at least one schema must match)
///
/// When nothing matches, the errors of the closest alternative (fewest
/// errors) are reported. If no alternative even has the right type, a
/// single type mismatch naming all of them is reported instead.
fn validate_any_of(node: &Node, schema: &AnyOfSchema, context: &mut ValidationContext) {
    if schema.schemas.is_empty() {
        context.add_error(
            ValidationErrorKind::NoAlternativeMatched { alternatives: 0 },
            node,
        );
        return;
    }

    let mut attempts = Vec::with_capacity(schema.schemas.len());
    for (i, subschema) in schema.schemas.iter().enumerate() {
        let mut sub_context = context.fork();
        sub_context.with_schema_path(i.to_string(), |ctx| validate_generic(node, subschema, ctx));
        if !sub_context.has_errors() {
            return;
        }
        attempts.push(sub_context.errors);
    }

    let depth = context.instance_path.len();
    let all_type_mismatches = attempts.iter().all(|errors| {
        errors.len() == 1
            && errors[0].instance_path.len() == depth
            && matches!(errors[0].kind, ValidationErrorKind::TypeMismatch { .. })
    });

    if all_type_mismatches {
        let expected: Vec<&str> = schema.schemas.iter().map(Schema::type_name).collect();
        return type_mismatch(context, &expected.join(" or "), node);
    }

    if let Some(best) = attempts.into_iter().min_by_key(Vec::len) {
        context.errors.extend(best);
    }
}

/// Validate allOf (all schemas must match)
fn validate_all_of(node: &Node, schema: &AllOfSchema, context: &mut ValidationContext) {
    for (i, subschema) in schema.schemas.iter().enumerate() {
        context.with_schema_path(i.to_string(), |ctx| validate_generic(node, subschema, ctx));
    }
}

fn validate_array(node: &Node, schema: &ArraySchema, context: &mut ValidationContext) {
    let Some(items) = node.as_sequence() else {
        return type_mismatch(context, "array", node);
    };

    if let Some(min) = schema.min_items
        && items.len() < min
    {
        context.add_error(
            ValidationErrorKind::ArrayLengthInvalid {
                length: items.len(),
                min_items: Some(min),
                max_items: None,
            },
            node,
        );
    }

    if let Some(max) = schema.max_items
        && items.len() > max
    {
        context.add_error(
            ValidationErrorKind::ArrayLengthInvalid {
                length: items.len(),
                min_items: None,
                max_items: Some(max),
            },
            node,
        );
    }

    if schema.unique_items == Some(true) {
        let mut seen = HashSet::new();
        if !items
            .iter()
            .all(|item| seen.insert(node_to_json_value(item).to_string()))
        {
            context.add_error(ValidationErrorKind::ArrayItemsNotUnique, node);
        }
    }

    if let Some(item_schema) = &schema.items {
        context.with_schema_path("items", |ctx| {
            for (i, item) in items.iter().enumerate() {
                ctx.with_instance_path(PathSegment::Index(i), |ctx| {
                    validate_generic(item, item_schema, ctx)
                });
            }
        });
    }
}

fn validate_object(node: &Node, schema: &ObjectSchema, context: &mut ValidationContext) {
    let Some(entries) = node.as_mapping() else {
        return type_mismatch(context, "object", node);
    };

    for required in &schema.required {
        if !entries.contains_key(required) {
            context.add_error(
                ValidationErrorKind::MissingRequiredProperty {
                    property: required.clone(),
                },
                node,
            );
        }
    }

    if let Some(min) = schema.min_properties
        && entries.len() < min
    {
        context.add_error(
            ValidationErrorKind::ObjectPropertyCountInvalid {
                count: entries.len(),
                min_properties: Some(min),
                max_properties: None,
            },
            node,
        );
    }

    if let Some(max) = schema.max_properties
        && entries.len() > max
    {
        context.add_error(
            ValidationErrorKind::ObjectPropertyCountInvalid {
                count: entries.len(),
                min_properties: None,
                max_properties: Some(max),
            },
            node,
        );
    }

    let reject_undeclared = context.strict || schema.closed;
    for (key, value) in entries {
        context.with_instance_path(PathSegment::Key(key.clone()), |ctx| {
            match schema.schema_for_key(key) {
                // additionalProperties: false
                Some(Schema::False) => unknown_property(ctx, key, value),
                Some(property_schema) => {
                    ctx.with_schema_path(key.clone(), |ctx| {
                        validate_generic(value, property_schema, ctx)
                    });
                }
                None if reject_undeclared => unknown_property(ctx, key, value),
                None => {}
            }
        });
    }
}

fn unknown_property(context: &mut ValidationContext, key: &str, value: &Node) {
    context.add_error(
        ValidationErrorKind::UnknownProperty {
            property: key.to_string(),
        },
        value,
    );
}

/// Convert a node to a JSON value for enum and uniqueness comparison
fn node_to_json_value(node: &Node) -> serde_json::Value {
    match &node.kind {
        NodeKind::Scalar(yaml) => match yaml {
            Yaml::Null | Yaml::BadValue | Yaml::Alias(_) => serde_json::Value::Null,
            Yaml::Boolean(b) => serde_json::Value::Bool(*b),
            Yaml::Integer(n) => serde_json::Value::Number((*n).into()),
            Yaml::Real(_) => yaml
                .as_f64()
                .and_then(serde_json::Number::from_f64)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Yaml::String(s) => serde_json::Value::String(s.clone()),
            Yaml::Array(_) | Yaml::Hash(_) => serde_json::Value::String(scalar_to_string(yaml)),
        },
        NodeKind::Sequence(items) => {
            serde_json::Value::Array(items.iter().map(node_to_json_value).collect())
        }
        NodeKind::Mapping(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), node_to_json_value(value)))
                .collect(),
        ),
    }
}

fn json_value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BooleanSchema, SchemaAnnotations};
    use iacv_yaml::{SourceInfo, parse, parse_file};

    fn schema(text: &str) -> Schema {
        Schema::from_node(&parse(text).unwrap()).unwrap()
    }

    fn check(schema_text: &str, data: &str, strict: bool) -> Vec<ValidationError> {
        validate(
            &parse(data).unwrap(),
            &schema(schema_text),
            &SchemaRegistry::new(),
            strict,
        )
    }

    fn messages(errors: &[ValidationError]) -> Vec<String> {
        errors.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_validate_boolean() {
        let registry = SchemaRegistry::new();
        let schema = Schema::Boolean(BooleanSchema {
            annotations: SchemaAnnotations::default(),
        });

        let yes = Node::new_scalar(Yaml::Boolean(true), SourceInfo::default());
        assert!(validate(&yes, &schema, &registry, true).is_empty());

        let text = Node::new_scalar(Yaml::String("yes".into()), SourceInfo::default());
        let errors = validate(&text, &schema, &registry, true);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Expected boolean, got string");
    }

    #[test]
    fn test_integer_rejects_float() {
        let errors = check("object: {properties: {vlan: integer}}", "vlan: 1.5", true);
        assert_eq!(messages(&errors), vec!["vlan: Expected integer, got float (line 1, column 7)"]);
        assert!(check("object: {properties: {vlan: number}}", "vlan: 1.5", true).is_empty());
    }

    #[test]
    fn test_number_bounds_all_reported() {
        let s = "integer: {minimum: 10, multipleOf: 4}";
        let errors = check(s, "7", true);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message(), "Number 7 is less than minimum 10");
        assert_eq!(errors[1].message(), "Number 7 is not a multiple of 4");

        let errors = check("integer: {minimum: 1, maximum: 4094}", "5000", true);
        assert_eq!(errors[0].message(), "Number 5000 is greater than maximum 4094");
    }

    #[test]
    fn test_decimal_multiple_of() {
        let s = "number: {multipleOf: 0.1}";
        assert!(check(s, "0.3", true).is_empty());
        assert!(check(s, "2.7", true).is_empty());
        assert!(check(s, "-0.7", true).is_empty());
        assert_eq!(check(s, "0.35", true).len(), 1);
        assert!(check("number: {multipleOf: 0.5}", "1.5", true).is_empty());
    }

    #[test]
    fn test_string_constraints() {
        let s = "string: {minLength: 2, pattern: '^[a-z]+$'}";
        assert!(check(s, "ab", true).is_empty());

        let errors = check(s, "A", true);
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0].kind, ValidationErrorKind::StringLengthInvalid { .. }));
        assert!(matches!(errors[1].kind, ValidationErrorKind::StringPatternMismatch { .. }));
    }

    #[test]
    fn test_enum() {
        assert!(check("[access, trunk]", "trunk", true).is_empty());
        let errors = check("[access, trunk]", "hybrid", true);
        assert_eq!(
            errors[0].message(),
            "Value must be one of: access, trunk, got 'hybrid'"
        );
        assert!(check("enum: [1, 2]", "2", true).is_empty());
        assert_eq!(check("enum: [1, 2]", "'2'", true).len(), 1);
    }

    #[test]
    fn test_collects_all_object_errors() {
        let s = "object:\n  properties:\n    name: string\n    id: integer\n  required: [name, id]\n";
        let errors = check(s, "id: x\n", true);
        assert_eq!(
            messages(&errors),
            vec![
                "(root): Missing required property 'name' (line 1, column 1)",
                "id: Expected integer, got string (line 1, column 5)",
            ]
        );
    }

    #[test]
    fn test_strict_rejects_undeclared_keys() {
        let s = "object: {properties: {name: string}}";
        let errors = check(s, "name: a\nextra: 1\n", true);
        assert_eq!(messages(&errors), vec!["extra: Unknown property 'extra' (line 2, column 8)"]);
        assert!(check(s, "name: a\nextra: 1\n", false).is_empty());
    }

    #[test]
    fn test_closed_rejects_in_non_strict_mode() {
        let s = "object: {properties: {name: string}, closed: true}";
        assert_eq!(check(s, "name: a\nextra: 1\n", false).len(), 1);
    }

    #[test]
    fn test_additional_and_pattern_properties() {
        let s = "object:\n  patternProperties:\n    '^x-': string\n  additionalProperties: integer\n";
        assert!(check(s, "x-tag: a\ncount: 3\n", true).is_empty());
        assert_eq!(check(s, "x-tag: 1\ncount: c\n", true).len(), 2);

        let closed = "object: {properties: {a: string}, additionalProperties: false}";
        let errors = check(closed, "b: 1", false);
        assert!(matches!(errors[0].kind, ValidationErrorKind::UnknownProperty { .. }));
    }

    #[test]
    fn test_nested_instance_path() {
        let s = "object:\n  properties:\n    root:\n      object:\n        properties:\n          children:\n            arrayOf:\n              object:\n                properties:\n                  name: string\n                required: [name]\n";
        let data = "root:\n  children:\n    - name: a\n    - other: b\n";
        let errors = check(s, data, false);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].instance_path.to_string(), "root.children[1]");
        assert_eq!(errors[0].location.as_ref().map(|l| l.line), Some(4));
    }

    #[test]
    fn test_array_constraints() {
        let s = "array: {items: string, minItems: 1, uniqueItems: true}";
        assert!(check(s, "[a, b]", true).is_empty());
        assert!(matches!(
            check(s, "[]", true)[0].kind,
            ValidationErrorKind::ArrayLengthInvalid { .. }
        ));
        assert!(matches!(
            check(s, "[a, a]", true)[0].kind,
            ValidationErrorKind::ArrayItemsNotUnique
        ));
        assert_eq!(check(s, "[a, 1]", true)[0].instance_path.to_string(), "[1]");
    }

    #[test]
    fn test_any_of_type_mismatch() {
        let errors = check("anyOf: [string, boolean]", "42", true);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Expected string or boolean, got integer");
        assert!(check("anyOf: [string, boolean]", "yes", true).is_empty());
    }

    #[test]
    fn test_any_of_reports_closest_alternative() {
        let s = "anyOf:\n  - object: {properties: {a: string, b: string}, required: [a, b]}\n  - string\n";
        let errors = check(s, "a: x\n", true);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0].kind,
            ValidationErrorKind::MissingRequiredProperty { property } if property == "b"
        ));
    }

    #[test]
    fn test_all_of() {
        let s = "allOf:\n  - string: {minLength: 2}\n  - string: {maxLength: 3}\n";
        assert!(check(s, "abc", true).is_empty());
        assert_eq!(check(s, "abcd", true).len(), 1);
    }

    #[test]
    fn test_error_message_replaces_errors() {
        let s = "string:\n  pattern: '^[a-z]+$'\n  minLength: 3\nerrorMessage: must be a short lowercase name\n";
        let errors = check(s, "A", true);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "must be a short lowercase name");
    }

    #[test]
    fn test_false_schema() {
        let errors = check("false", "anything", true);
        assert!(matches!(errors[0].kind, ValidationErrorKind::NotAllowed));
        assert!(check("true", "anything", true).is_empty());
        assert!(check("any", "[1, {a: b}]", true).is_empty());
    }

    #[test]
    fn test_ref_resolution_and_cycle_guard() {
        let mut registry = SchemaRegistry::new();
        registry.register("name".into(), schema("string"));
        registry.register("loop".into(), schema("ref: loop"));

        let data = parse("7").unwrap();
        let errors = validate(&data, &schema("ref: name"), &registry, true);
        assert_eq!(errors[0].message(), "Expected string, got integer");

        let errors = validate(&data, &schema("ref: loop"), &registry, true);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message().contains("nests too deeply"));

        let errors = validate(&data, &schema("ref: missing"), &registry, true);
        assert!(matches!(errors[0].kind, ValidationErrorKind::UnresolvedReference { .. }));
    }

    #[test]
    fn test_errors_carry_file() {
        let data = parse_file("name: 1\n", "data/a.yaml").unwrap();
        let errors = validate(
            &data,
            &schema("object: {properties: {name: string}}"),
            &SchemaRegistry::new(),
            true,
        );
        assert_eq!(errors[0].file(), Some("data/a.yaml"));
        assert_eq!(errors[0].schema_path.to_string(), "object > name > string");
    }
}
