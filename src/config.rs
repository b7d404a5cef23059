use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{DeployError, Result};

/// Represents the complete configuration for bump-deploy.
///
/// Controls which manifests are bumped, how the change is committed and pushed,
/// and how the deploy branch is built and published.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Manifest files whose `version` field is bumped, in processing order.
    #[serde(default = "default_filepaths")]
    pub filepaths: Vec<String>,

    /// Force every manifest onto the version of the first one processed.
    #[serde(default = "default_true")]
    pub sync_versions: bool,

    /// Commit the bumped manifests.
    #[serde(default = "default_true")]
    pub commit: bool,

    /// Commit message template; `{version}` and `{orig_version}` are expanded.
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Stage the whole working tree instead of just the bumped manifests.
    #[serde(default = "default_true")]
    pub add_all_to_commit: bool,

    /// Push the commit to the remote.
    #[serde(default = "default_true")]
    pub push: bool,

    /// Create, build, push, and deploy a dedicated deploy branch.
    #[serde(default = "default_true")]
    pub deploy_branch: bool,

    /// StrongLoop PM server URL the deploy branch is published to.
    /// Required whenever `deploy_branch` is enabled.
    #[serde(default)]
    pub deploy_server_url: Option<String>,

    /// Deploy branch name template; `{version}` and `{orig_version}` are expanded.
    #[serde(default = "default_branch_name")]
    pub branch_name: String,

    /// Branch checked out again after the deploy branch has been published.
    #[serde(default = "default_primary_branch")]
    pub primary_branch: String,
}

fn default_filepaths() -> Vec<String> {
    vec!["package.json".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_commit_message() -> String {
    "Bumping version to {version}.".to_string()
}

fn default_branch_name() -> String {
    "deploy_{version}".to_string()
}

fn default_primary_branch() -> String {
    "master".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            filepaths: default_filepaths(),
            sync_versions: true,
            commit: true,
            commit_message: default_commit_message(),
            add_all_to_commit: true,
            push: true,
            deploy_branch: true,
            deploy_server_url: None,
            branch_name: default_branch_name(),
            primary_branch: default_primary_branch(),
        }
    }
}

impl Config {
    /// Checks the configuration invariants that must hold before any manifest
    /// is touched or any command is run.
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is usable
    /// * `Err` - Deploy requested without a server URL, or no manifests configured
    pub fn validate(&self) -> Result<()> {
        if self.filepaths.is_empty() {
            return Err(DeployError::config(
                "No manifest filepaths configured; nothing to bump.",
            ));
        }
        if self.deploy_branch && self.deploy_server_url.is_none() {
            return Err(DeployError::config(
                "deploy_branch is enabled but no deploy_server_url provided.",
            ));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `bumpdeploy.toml` in current directory
/// 3. `.bumpdeploy.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./bumpdeploy.toml").exists() {
        fs::read_to_string("./bumpdeploy.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".bumpdeploy.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
