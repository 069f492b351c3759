use iacv_rules::{RuleError, RuleKinds, Severity, evaluate, load_rules};
use std::fs;

const CHILD_NAMES: &str = r#"
id: "101"
description: Verify child naming restrictions
severity: HIGH
kind: forbidden_values
path: root.children.name
values: [FORBIDDEN]
"#;

#[test]
fn loads_rules_in_file_name_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b_unique.yml"), "id: '102'\ndescription: Unique names\nkind: unique_values\npath: root.children.name\n").unwrap();
    fs::write(dir.path().join("a_names.yaml"), CHILD_NAMES).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a rule").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("c.yaml"), CHILD_NAMES).unwrap();

    let loaded = load_rules(dir.path(), &RuleKinds::new());
    assert!(loaded.errors.is_empty());
    assert_eq!(loaded.rules.keys().collect::<Vec<_>>(), vec!["101", "102"]);
    assert_eq!(loaded.rules["101"].severity(), Severity::High);
    assert_eq!(loaded.rules["101"].description(), "Verify child naming restrictions");
}

#[test]
fn broken_files_are_recorded_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("good.yaml"), CHILD_NAMES).unwrap();
    fs::write(dir.path().join("kind.yaml"), "id: x\ndescription: d\nkind: shell_script\n").unwrap();
    fs::write(dir.path().join("syntax.yaml"), "id: [unclosed\n").unwrap();

    let loaded = load_rules(dir.path(), &RuleKinds::new());
    assert_eq!(loaded.rules.len(), 1);
    assert_eq!(loaded.errors.len(), 2);
    assert!(matches!(loaded.errors[0].source, RuleError::UnknownKind(_)));
    assert!(matches!(loaded.errors[1].source, RuleError::Yaml(_)));
    assert!(
        loaded.errors[0]
            .to_string()
            .starts_with("Failed loading rule '")
    );
}

#[test]
fn later_file_wins_on_id_collision() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("1.yaml"), CHILD_NAMES).unwrap();
    fs::write(
        dir.path().join("2.yaml"),
        "id: '101'\ndescription: Verify schema passed\nkind: schema_present\n",
    )
    .unwrap();

    let loaded = load_rules(dir.path(), &RuleKinds::new());
    assert_eq!(loaded.rules.len(), 1);
    assert_eq!(loaded.rules["101"].description(), "Verify schema passed");
}

#[test]
fn missing_directory_is_one_error() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = load_rules(&dir.path().join("absent"), &RuleKinds::new());
    assert!(loaded.rules.is_empty());
    assert!(matches!(loaded.errors.as_slice(), [err] if matches!(err.source, RuleError::Io(_))));
}

#[test]
fn evaluates_loaded_rules() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("rule.yaml"), CHILD_NAMES).unwrap();
    let loaded = load_rules(dir.path(), &RuleKinds::new());

    let tree = iacv_yaml::parse("root:\n  children:\n    - name: FORBIDDEN\n").unwrap();
    let results = evaluate(&loaded.rules, &tree, None);
    assert_eq!(results["101"], vec!["root.children.name - FORBIDDEN"]);

    let tree = iacv_yaml::parse("root:\n  children:\n    - name: allowed\n").unwrap();
    assert!(evaluate(&loaded.rules, &tree, None).is_empty());
}
