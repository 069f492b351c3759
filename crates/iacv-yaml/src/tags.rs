//! Resolution of custom scalar tags.
//!
//! Two local tags are recognized in input documents:
//!
//! - `!env NAME` is replaced by the value of the environment variable `NAME`
//!   (empty when unset).
//! - `!vault CIPHERTEXT` is replaced by the decrypted plaintext. Decryption
//!   is delegated to a [`Decryptor`]; without one the value is empty.
//!
//! Any other local tag is rejected by the parser.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use thiserror::Error;

/// Environment variable holding the optional vault key id.
pub const VAULT_ID_ENV: &str = "ANSIBLE_VAULT_ID";

/// The custom tags understood by [`TagResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomTag {
    /// `!env`
    Env,
    /// `!vault`
    Vault,
}

impl CustomTag {
    /// Look up a local tag by its suffix (`"env"` for `!env`).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "env" => Some(CustomTag::Env),
            "vault" => Some(CustomTag::Vault),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CustomTag::Env => "env",
            CustomTag::Vault => "vault",
        }
    }
}

/// Errors raised while resolving a tagged scalar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The decryption capability reported a failure.
    #[error("decryption failed: {0}")]
    Decryption(String),
}

/// Capability that turns vault ciphertext into plaintext.
pub trait Decryptor: Send + Sync {
    /// Decrypt `ciphertext`, optionally selecting the key identified by `key_id`.
    fn decrypt(&self, ciphertext: &str, key_id: Option<&str>) -> Result<String, TagError>;
}

/// Decryptor backed by the `ansible-vault` command line tool.
///
/// The ciphertext is written to the tool's stdin and the plaintext is read
/// from its stdout. The vault id passed to the tool is `<key_id>@<password
/// source>` when a key id is present, otherwise just the password source.
#[derive(Debug, Clone)]
pub struct AnsibleVaultDecryptor {
    program: PathBuf,
    password_source: PathBuf,
}

impl AnsibleVaultDecryptor {
    pub fn new(password_source: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("ansible-vault"),
            password_source: password_source.into(),
        }
    }

    /// Use a different executable instead of `ansible-vault` from `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn vault_id(&self, key_id: Option<&str>) -> String {
        let source = self.password_source.display();
        match key_id {
            Some(id) => format!("{}@{}", id, source),
            None => source.to_string(),
        }
    }
}

impl Decryptor for AnsibleVaultDecryptor {
    fn decrypt(&self, ciphertext: &str, key_id: Option<&str>) -> Result<String, TagError> {
        let vault_id = self.vault_id(key_id);
        tracing::debug!(program = %self.program.display(), %vault_id, "decrypting vault value");

        let mut child = Command::new(&self.program)
            .args(["decrypt", "--vault-id", &vault_id])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TagError::Decryption(format!("cannot run {}: {}", self.program.display(), e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(ciphertext.as_bytes())
                .map_err(|e| TagError::Decryption(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| TagError::Decryption(e.to_string()))?;

        if !output.status.success() {
            return Err(TagError::Decryption(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| TagError::Decryption("plaintext is not valid UTF-8".to_string()))
    }
}

/// Resolves `!env` and `!vault` scalars while a document is parsed.
#[derive(Clone, Default)]
pub struct TagResolver {
    decryptor: Option<Arc<dyn Decryptor>>,
}

impl TagResolver {
    /// A resolver without decryption support: `!vault` values become empty.
    pub fn new() -> Self {
        Self { decryptor: None }
    }

    pub fn with_decryptor(mut self, decryptor: Arc<dyn Decryptor>) -> Self {
        self.decryptor = Some(decryptor);
        self
    }

    /// Resolve a tagged scalar payload into its plain value.
    pub fn resolve(&self, tag: CustomTag, payload: &str) -> Result<String, TagError> {
        match tag {
            CustomTag::Env => Ok(std::env::var(payload.trim()).unwrap_or_default()),
            CustomTag::Vault => match &self.decryptor {
                Some(decryptor) => {
                    let key_id = std::env::var(VAULT_ID_ENV).ok();
                    decryptor.decrypt(payload, key_id.as_deref())
                }
                None => Ok(String::new()),
            },
        }
    }
}

impl std::fmt::Debug for TagResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagResolver")
            .field("decryptor", &self.decryptor.is_some())
            .finish()
    }
}
