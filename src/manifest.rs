use serde_json::Value;
use std::fs;

use crate::error::{DeployError, Result};
use crate::ui;

/// Access to the `version` field of version-bearing manifest files.
///
/// The reconciler only ever needs to read and rewrite that one field; every
/// other part of the document passes through unmodified. Abstracted as a trait
/// so the reconciliation logic can be tested against an in-memory store.
pub trait ManifestStore {
    /// Read the stored version string from a manifest.
    ///
    /// # Arguments
    /// * `path` - Manifest file path
    ///
    /// # Returns
    /// * `Ok(String)` - The `version` field value
    /// * `Err` - If the file is unreadable, not valid JSON, or has no string `version`
    fn read_version(&self, path: &str) -> Result<String>;

    /// Persist a new version string into a manifest, leaving all other fields intact.
    fn write_version(&mut self, path: &str, version: &str) -> Result<()>;
}

/// Filesystem-backed store for `package.json`-style JSON manifests.
pub struct JsonManifestStore {
    dry_run: bool,
}

impl JsonManifestStore {
    /// Creates a store; in dry-run mode writes are logged but not performed.
    pub fn new(dry_run: bool) -> Self {
        JsonManifestStore { dry_run }
    }
}

impl ManifestStore for JsonManifestStore {
    fn read_version(&self, path: &str) -> Result<String> {
        let raw = fs::read_to_string(path)?;
        let doc: Value = serde_json::from_str(&raw)?;
        doc.get("version")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| {
                DeployError::manifest(format!("No version field found in {}", path))
            })
    }

    fn write_version(&mut self, path: &str, version: &str) -> Result<()> {
        if self.dry_run {
            ui::display_status(&format!("Not actually writing {}", path));
            return Ok(());
        }

        let raw = fs::read_to_string(path)?;
        let mut doc: Value = serde_json::from_str(&raw)?;
        match doc.as_object_mut() {
            Some(fields) => {
                fields.insert("version".to_string(), Value::String(version.to_string()));
            }
            None => {
                return Err(DeployError::manifest(format!(
                    "{} is not a JSON object",
                    path
                )));
            }
        }

        let mut rendered = serde_json::to_string_pretty(&doc)?;
        rendered.push('\n');
        fs::write(path, rendered)?;
        Ok(())
    }
}
