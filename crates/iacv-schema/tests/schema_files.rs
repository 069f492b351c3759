use iacv_schema::{SchemaError, SchemaFile, ValidationErrorKind};
use std::io::Write;

const SCHEMA: &str = r#"
schema:
  object:
    properties:
      root:
        object:
          properties:
            children:
              arrayOf:
                ref: child
          required: [children]
    required: [root]
definitions:
  child:
    object:
      properties:
        name:
          string:
            pattern: "^[a-z]+$"
        vlan:
          integer: {minimum: 1, maximum: 4094}
        mode: [access, trunk]
      required: [name]
"#;

fn schema_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn load_and_validate() {
    let file = schema_file(SCHEMA);
    let schema = SchemaFile::load(file.path()).unwrap();

    let valid = iacv_yaml::parse("root:\n  children:\n    - name: a\n      vlan: 10\n      mode: trunk\n").unwrap();
    assert!(schema.validate(&valid, true).is_empty());

    let invalid = iacv_yaml::parse_file(
        "root:\n  children:\n    - name: A1\n      vlan: 0\n      mode: hybrid\n",
        "data/children.yaml",
    )
    .unwrap();
    let errors = schema.validate(&invalid, true);
    let paths: Vec<String> = errors.iter().map(|e| e.instance_path.to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "root.children[0].name",
            "root.children[0].vlan",
            "root.children[0].mode",
        ]
    );
    assert!(errors.iter().all(|e| e.file() == Some("data/children.yaml")));
    assert_eq!(errors[1].location.as_ref().map(|l| l.line), Some(4));
}

#[test]
fn missing_required_field_is_one_violation() {
    let schema = SchemaFile::parse(SCHEMA, "schema.yaml").unwrap();
    let data = iacv_yaml::parse("root:\n  children:\n    - vlan: 5\n").unwrap();

    let errors = schema.validate(&data, true);
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0].kind,
        ValidationErrorKind::MissingRequiredProperty { property } if property == "name"
    ));
}

#[test]
fn strict_mode_controls_undeclared_keys() {
    let schema = SchemaFile::parse(SCHEMA, "schema.yaml").unwrap();
    let data = iacv_yaml::parse("root:\n  children: []\n  comment: free text\n").unwrap();

    assert_eq!(schema.validate(&data, true).len(), 1);
    assert!(schema.validate(&data, false).is_empty());
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SchemaFile::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, SchemaError::Io { .. }));
}

#[test]
fn invalid_schema_reports_location() {
    let file = schema_file("object:\n  properties:\n    name: strin\n");
    let err = SchemaFile::load(file.path()).unwrap_err();
    match err {
        SchemaError::InvalidType { name, location } => {
            assert_eq!(name, "strin");
            assert_eq!(location.line, 3);
        }
        other => panic!("Expected InvalidType, got {other:?}"),
    }
}
