//! Parsing files from disk with custom tags.

use iacv_yaml::{Decryptor, Error, TagError, TagResolver, parse_path, to_yaml_string};
use std::sync::Arc;

struct Fixed(&'static str);

impl Decryptor for Fixed {
    fn decrypt(&self, _ciphertext: &str, _key_id: Option<&str>) -> Result<String, TagError> {
        Ok(self.0.to_string())
    }
}

#[test]
fn parse_path_records_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.yaml");
    std::fs::write(&path, "site:\n  name: hq\n  vlans: [10, 20]\n").unwrap();

    let node = parse_path(&path, &TagResolver::new()).unwrap();
    let name = node.get_path(&["site", "name"]).unwrap();
    assert_eq!(name.source_info.file.as_deref(), Some(path.display().to_string().as_str()));
    assert_eq!(name.source_info.line, 2);
}

#[test]
fn parse_path_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_path(&dir.path().join("absent.yaml"), &TagResolver::new()).unwrap_err();
    assert!(matches!(err, Error::ParseError { location: None, .. }));
}

#[test]
fn vault_values_are_decrypted_before_emitting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yaml");
    std::fs::write(
        &path,
        "credentials:\n  password: !vault |\n    $ANSIBLE_VAULT;1.1;AES256\n    6162\n",
    )
    .unwrap();

    let resolver = TagResolver::new().with_decryptor(Arc::new(Fixed("hunter2")));
    let node = parse_path(&path, &resolver).unwrap();
    assert_eq!(
        node.get_path(&["credentials", "password"]).and_then(|n| n.as_str()),
        Some("hunter2")
    );

    let text = to_yaml_string(&node).unwrap();
    assert!(text.contains("hunter2"));
    assert!(!text.contains("ANSIBLE_VAULT"));
}
