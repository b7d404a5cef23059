use crate::error::{DeployError, Result};
use regex::Regex;
use semver::{Prerelease, Version};
use std::fmt;
use std::str::FromStr;

/// Represents the kind of semantic version increment to apply.
///
/// Parsed from the CLI's positional mode argument. An unrecognized mode is a
/// configuration error and aborts the run before anything else happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
    Prerelease,
}

impl FromStr for BumpKind {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(BumpKind::Major),
            "minor" => Ok(BumpKind::Minor),
            "patch" => Ok(BumpKind::Patch),
            "prerelease" => Ok(BumpKind::Prerelease),
            other => Err(DeployError::config(format!(
                "Versioning mode '{}' is not supported. Valid modes are: major, minor, patch, prerelease.",
                other
            ))),
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpKind::Major => write!(f, "major"),
            BumpKind::Minor => write!(f, "minor"),
            BumpKind::Patch => write!(f, "patch"),
            BumpKind::Prerelease => write!(f, "prerelease"),
        }
    }
}

/// Bumps a version according to the specified bump kind.
///
/// Increments the appropriate component and resets lower components to 0:
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1, prerelease dropped
/// - **Prerelease**: trailing numeric prerelease identifier += 1; a version
///   without a prerelease enters one at `-0` without touching the patch number
///
/// The patch increment is deliberately naive on prerelease versions (it always
/// advances the patch number); the reconciler applies the trailing-digit
/// correction on top of it.
///
/// # Arguments
/// * `current` - Current version to bump
/// * `kind` - Kind of bump to apply
///
/// # Returns
/// New version with the appropriate component incremented
///
/// # Example
/// ```ignore
/// let v = semver::Version::parse("1.2.3")?;
/// assert_eq!(bump_version(&v, BumpKind::Major)?.to_string(), "2.0.0");
/// assert_eq!(bump_version(&v, BumpKind::Patch)?.to_string(), "1.2.4");
/// ```
pub fn bump_version(current: &Version, kind: BumpKind) -> Result<Version> {
    let bumped = match kind {
        BumpKind::Major => Version::new(current.major + 1, 0, 0),
        BumpKind::Minor => Version::new(current.major, current.minor + 1, 0),
        BumpKind::Patch => Version::new(current.major, current.minor, current.patch + 1),
        BumpKind::Prerelease => increment_prerelease(current)?,
    };
    Ok(bumped)
}

/// Returns true if a version string carries a prerelease identifier.
///
/// Matches the hyphenated-suffix convention ("1.2.3-alpha.0").
pub fn is_prerelease(version: &str) -> bool {
    version.contains('-')
}

/// Decrements the trailing run of digits in a version string by one.
///
/// Used for the pre-release patch correction: a patch bump on a prerelease
/// version overshoots by one, so the final digit run of the bumped string is
/// pulled back ("1.2.4" becomes "1.2.3"). Returns the string unchanged if it
/// does not end in digits.
pub fn decrement_trailing_number(version: &str) -> String {
    match Regex::new(r"\d+$") {
        Ok(re) => re
            .replace(version, |caps: &regex::Captures| {
                let n = caps[0].parse::<u64>().unwrap_or(0);
                n.saturating_sub(1).to_string()
            })
            .into_owned(),
        Err(_) => version.to_string(),
    }
}

fn increment_prerelease(current: &Version) -> Result<Version> {
    let pre = if current.pre.is_empty() {
        Prerelease::new("0")
    } else {
        let mut identifiers: Vec<String> =
            current.pre.as_str().split('.').map(String::from).collect();
        match identifiers.last().and_then(|id| id.parse::<u64>().ok()) {
            Some(n) => {
                let last = identifiers.len() - 1;
                identifiers[last] = (n + 1).to_string();
            }
            None => identifiers.push("0".to_string()),
        }
        Prerelease::new(&identifiers.join("."))
    };

    let pre = pre.map_err(|e| {
        DeployError::version(format!(
            "Cannot build prerelease identifier from '{}': {}",
            current, e
        ))
    })?;

    let mut next = Version::new(current.major, current.minor, current.patch);
    next.pre = pre;
    Ok(next)
}
