//! Version reconciliation across manifest files.
//!
//! Processes manifests strictly in configuration order: the first file's stored
//! version becomes the run's reference version, and with `sync_versions` every
//! later file is bumped from that reference instead of its own version. Files
//! that shared a stored version before bumping land in the same [ReleaseUnit],
//! which is the unit the orchestrator commits and deploys.

use semver::Version;

use crate::error::{DeployError, Result};
use crate::manifest::ManifestStore;
use crate::ui;
use crate::version::{self, BumpKind};

/// One manifest's version transition, computed once during reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestVersion {
    pub file_path: String,
    pub original_version: String,
    pub new_version: String,
}

/// Group of manifests that shared a stored version before bumping.
///
/// This is the unit of commit/branch/deploy. `file_paths` is never empty and
/// preserves encounter order; `resolved_version` is the same for every member.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseUnit {
    pub origin_version: String,
    pub resolved_version: String,
    pub file_paths: Vec<String>,
}

/// Everything the reconciliation run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    pub manifests: Vec<ManifestVersion>,
    pub units: Vec<ReleaseUnit>,
}

/// Bumps the version in every configured manifest and groups them into
/// release units.
///
/// Two corrections are applied on top of the plain increment:
///
/// - a `patch` bump of a prerelease version overshoots by one, so the trailing
///   digit run of the bumped string is decremented ("1.2.3-alpha.0" ends up at
///   "1.2.3", not "1.2.4");
/// - a `prerelease` bump of a stable version advances the patch number before
///   entering prerelease ("2.0.0" becomes "2.0.1-0", never "2.0.0-0").
///
/// Each new version is persisted through the store as soon as it is computed.
///
/// # Arguments
/// * `filepaths` - Manifest paths in processing order
/// * `sync_versions` - Bump every file from the first file's stored version
/// * `kind` - Kind of semver increment to apply
/// * `store` - Manifest access; a dry-run store may skip the actual writes
///
/// # Returns
/// * `Ok(ReconcileOutcome)` - Per-file transitions and the release units
/// * `Err` - First unreadable manifest or unparsable version, nothing substituted
pub fn reconcile(
    filepaths: &[String],
    sync_versions: bool,
    kind: BumpKind,
    store: &mut dyn ManifestStore,
) -> Result<ReconcileOutcome> {
    let mut manifests = Vec::new();
    let mut units: Vec<ReleaseUnit> = Vec::new();
    let mut first_version: Option<String> = None;

    for path in filepaths {
        let stored = store.read_version(path)?;

        // Only grab the version from the first file, guaranteeing new versions
        // will always be in sync.
        let effective = match (&first_version, sync_versions) {
            (Some(first), true) => first.clone(),
            _ => stored.clone(),
        };
        if first_version.is_none() {
            first_version = Some(stored.clone());
        }

        let current = Version::parse(&effective).map_err(|e| {
            DeployError::version(format!(
                "Cannot parse version '{}' in {}: {}",
                effective, path, e
            ))
        })?;

        let new_version = if kind == BumpKind::Prerelease && current.pre.is_empty() {
            // Prerelease on a stable version: advance patch first.
            let patched = version::bump_version(&current, BumpKind::Patch)?;
            version::bump_version(&patched, BumpKind::Prerelease)?.to_string()
        } else {
            let bumped = version::bump_version(&current, kind)?.to_string();
            if kind == BumpKind::Patch && version::is_prerelease(&effective) {
                version::decrement_trailing_number(&bumped)
            } else {
                bumped
            }
        };

        ui::display_status(&format!(
            "Bumping version in {} from {} to {}",
            path, stored, new_version
        ));
        store.write_version(path, &new_version)?;

        match units.iter_mut().find(|u| u.origin_version == stored) {
            Some(unit) => unit.file_paths.push(path.clone()),
            None => units.push(ReleaseUnit {
                origin_version: stored.clone(),
                resolved_version: new_version.clone(),
                file_paths: vec![path.clone()],
            }),
        }

        manifests.push(ManifestVersion {
            file_path: path.clone(),
            original_version: stored,
            new_version,
        });
    }

    Ok(ReconcileOutcome { manifests, units })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory manifest store for exercising the reconciler without files.
    struct MemoryStore {
        versions: HashMap<String, String>,
        writes: Vec<(String, String)>,
    }

    impl MemoryStore {
        fn new(entries: &[(&str, &str)]) -> Self {
            MemoryStore {
                versions: entries
                    .iter()
                    .map(|(p, v)| (p.to_string(), v.to_string()))
                    .collect(),
                writes: Vec::new(),
            }
        }
    }

    impl ManifestStore for MemoryStore {
        fn read_version(&self, path: &str) -> Result<String> {
            self.versions
                .get(path)
                .cloned()
                .ok_or_else(|| DeployError::manifest(format!("No version field found in {}", path)))
        }

        fn write_version(&mut self, path: &str, version: &str) -> Result<()> {
            self.versions.insert(path.to_string(), version.to_string());
            self.writes.push((path.to_string(), version.to_string()));
            Ok(())
        }
    }

    fn paths(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_patch_bump_single_file() {
        let mut store = MemoryStore::new(&[("package.json", "1.2.3")]);
        let outcome = reconcile(
            &paths(&["package.json"]),
            true,
            BumpKind::Patch,
            &mut store,
        )
        .unwrap();

        assert_eq!(outcome.units.len(), 1);
        assert_eq!(outcome.units[0].origin_version, "1.2.3");
        assert_eq!(outcome.units[0].resolved_version, "1.2.4");
        assert_eq!(store.versions["package.json"], "1.2.4");
    }

    #[test]
    fn test_synced_files_share_one_unit() {
        let mut store = MemoryStore::new(&[("a.json", "1.2.3"), ("b.json", "1.2.3")]);
        let outcome = reconcile(
            &paths(&["a.json", "b.json"]),
            true,
            BumpKind::Patch,
            &mut store,
        )
        .unwrap();

        assert_eq!(outcome.units.len(), 1);
        assert_eq!(outcome.units[0].file_paths, vec!["a.json", "b.json"]);
        assert_eq!(store.versions["a.json"], "1.2.4");
        assert_eq!(store.versions["b.json"], "1.2.4");
    }

    #[test]
    fn test_sync_overrides_later_versions() {
        // b.json starts somewhere else entirely but is bumped from a.json's
        // version; it still groups under its own stored version.
        let mut store = MemoryStore::new(&[("a.json", "1.2.3"), ("b.json", "2.0.0")]);
        let outcome = reconcile(
            &paths(&["a.json", "b.json"]),
            true,
            BumpKind::Patch,
            &mut store,
        )
        .unwrap();

        assert_eq!(store.versions["a.json"], "1.2.4");
        assert_eq!(store.versions["b.json"], "1.2.4");
        assert_eq!(outcome.units.len(), 2);
        assert_eq!(outcome.units[0].origin_version, "1.2.3");
        assert_eq!(outcome.units[1].origin_version, "2.0.0");
        assert_eq!(outcome.units[1].resolved_version, "1.2.4");
    }

    #[test]
    fn test_unsynced_files_bump_independently() {
        let mut store = MemoryStore::new(&[("a.json", "1.2.3"), ("b.json", "2.0.0")]);
        let outcome = reconcile(
            &paths(&["a.json", "b.json"]),
            false,
            BumpKind::Minor,
            &mut store,
        )
        .unwrap();

        assert_eq!(store.versions["a.json"], "1.3.0");
        assert_eq!(store.versions["b.json"], "2.1.0");
        assert_eq!(outcome.units.len(), 2);
    }

    #[test]
    fn test_prerelease_patch_correction_exact_string() {
        let mut store = MemoryStore::new(&[("package.json", "1.2.3-alpha.0")]);
        let outcome = reconcile(
            &paths(&["package.json"]),
            true,
            BumpKind::Patch,
            &mut store,
        )
        .unwrap();

        // Naive bump gives 1.2.4; the trailing digit is pulled back.
        assert_eq!(outcome.units[0].resolved_version, "1.2.3");
        assert_eq!(store.versions["package.json"], "1.2.3");
    }

    #[test]
    fn test_prerelease_bootstrap_on_stable_version() {
        let mut store = MemoryStore::new(&[("package.json", "2.0.0")]);
        let outcome = reconcile(
            &paths(&["package.json"]),
            true,
            BumpKind::Prerelease,
            &mut store,
        )
        .unwrap();

        assert_eq!(outcome.units[0].resolved_version, "2.0.1-0");
        assert_ne!(outcome.units[0].resolved_version, "2.0.0-0");
    }

    #[test]
    fn test_prerelease_bump_on_prerelease_version() {
        let mut store = MemoryStore::new(&[("package.json", "1.4.0-beta.2")]);
        let outcome = reconcile(
            &paths(&["package.json"]),
            true,
            BumpKind::Prerelease,
            &mut store,
        )
        .unwrap();

        assert_eq!(outcome.units[0].resolved_version, "1.4.0-beta.3");
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let mut store = MemoryStore::new(&[
            ("a.json", "1.0.0"),
            ("b.json", "2.0.0"),
            ("c.json", "1.0.0"),
        ]);
        let outcome = reconcile(
            &paths(&["a.json", "b.json", "c.json"]),
            false,
            BumpKind::Patch,
            &mut store,
        )
        .unwrap();

        assert_eq!(outcome.units.len(), 2);
        assert_eq!(outcome.units[0].origin_version, "1.0.0");
        assert_eq!(outcome.units[0].file_paths, vec!["a.json", "c.json"]);
        assert_eq!(outcome.units[1].origin_version, "2.0.0");
        assert_eq!(outcome.units[1].file_paths, vec!["b.json"]);
    }

    #[test]
    fn test_every_manifest_in_exactly_one_unit() {
        let mut store = MemoryStore::new(&[
            ("a.json", "1.0.0"),
            ("b.json", "2.0.0"),
            ("c.json", "1.0.0"),
        ]);
        let outcome = reconcile(
            &paths(&["a.json", "b.json", "c.json"]),
            false,
            BumpKind::Patch,
            &mut store,
        )
        .unwrap();

        let mut all_paths: Vec<&str> = outcome
            .units
            .iter()
            .flat_map(|u| u.file_paths.iter().map(String::as_str))
            .collect();
        all_paths.sort();
        assert_eq!(all_paths, vec!["a.json", "b.json", "c.json"]);
        assert!(outcome.units.iter().all(|u| !u.file_paths.is_empty()));
    }

    #[test]
    fn test_unparsable_version_is_fatal() {
        let mut store = MemoryStore::new(&[("package.json", "not-a-version")]);
        let err = reconcile(
            &paths(&["package.json"]),
            true,
            BumpKind::Patch,
            &mut store,
        )
        .unwrap_err();

        assert!(err.to_string().contains("not-a-version"));
        assert!(store.writes.is_empty());
    }

    #[test]
    fn test_manifest_transitions_recorded() {
        let mut store = MemoryStore::new(&[("a.json", "1.2.3"), ("b.json", "1.2.3")]);
        let outcome = reconcile(
            &paths(&["a.json", "b.json"]),
            true,
            BumpKind::Major,
            &mut store,
        )
        .unwrap();

        assert_eq!(
            outcome.manifests,
            vec![
                ManifestVersion {
                    file_path: "a.json".to_string(),
                    original_version: "1.2.3".to_string(),
                    new_version: "2.0.0".to_string(),
                },
                ManifestVersion {
                    file_path: "b.json".to_string(),
                    original_version: "1.2.3".to_string(),
                    new_version: "2.0.0".to_string(),
                },
            ]
        );
    }
}
