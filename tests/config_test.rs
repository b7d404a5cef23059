// tests/config_test.rs
use bump_deploy::config::{load_config, Config};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.filepaths, vec!["package.json".to_string()]);
    assert!(config.sync_versions);
    assert!(config.commit);
    assert_eq!(config.commit_message, "Bumping version to {version}.");
    assert!(config.add_all_to_commit);
    assert!(config.push);
    assert!(config.deploy_branch);
    assert_eq!(config.deploy_server_url, None);
    assert_eq!(config.branch_name, "deploy_{version}");
    assert_eq!(config.primary_branch, "master");
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
filepaths = ["package.json", "bower.json"]
sync_versions = false
commit_message = "Release {orig_version} -> {version}"
deploy_server_url = "http://prod.example.com:8701"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(
        config.filepaths,
        vec!["package.json".to_string(), "bower.json".to_string()]
    );
    assert!(!config.sync_versions);
    assert_eq!(config.commit_message, "Release {orig_version} -> {version}");
    assert_eq!(
        config.deploy_server_url,
        Some("http://prod.example.com:8701".to_string())
    );
    // Unspecified keys keep their defaults.
    assert!(config.commit);
    assert_eq!(config.branch_name, "deploy_{version}");
}

#[test]
fn test_load_missing_file_is_an_error() {
    assert!(load_config(Some("/nonexistent/bumpdeploy.toml")).is_err());
}

#[test]
fn test_load_invalid_toml_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"filepaths = not-a-list").unwrap();
    temp_file.flush().unwrap();

    assert!(load_config(Some(temp_file.path().to_str().unwrap())).is_err());
}

#[test]
fn test_validate_requires_server_url_for_deploy() {
    let config = Config::default();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("deploy_server_url"));

    let config = Config {
        deploy_server_url: Some("http://prod.example.com:8701".to_string()),
        ..Config::default()
    };
    assert!(config.validate().is_ok());
}
