//! Integration tests for config loading and validation.

use std::path::PathBuf;

use vidshelf::config::{load_config, load_config_or_default, validate_config, Config};
use vidshelf::scanner::{DuplicatePolicy, LooseFilePolicy};

fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vidshelf.toml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn defaults_apply_to_empty_file() {
    let (_dir, path) = write_config("");
    let config = load_config(&path).unwrap();

    assert_eq!(config.scan.cache_ttl_hours, 24);
    assert_eq!(config.scan.max_depth, 10);
    assert_eq!(config.scan.duplicate_episodes, DuplicatePolicy::KeepFirst);
    assert_eq!(config.scan.loose_files, LooseFilePolicy::FoldIntoSeasons);
    assert!(!config.metadata.enabled);
    assert_eq!(config.metadata.language, "en-US");
    assert!(config.metadata.download_images);
    assert!(config.volumes.is_empty());
}

#[test]
fn full_file_round_trips_into_walk_policy() {
    let (dir, path) = write_config(
        r#"
data_dir = "/srv/vidshelf"

[scan]
cache_ttl_hours = 6
max_depth = 4
extra_extensions = ["rmvb"]
duplicate_episodes = "keep_last"
loose_files = "ignore"

[metadata]
enabled = true
tmdb_api_key = "abc"
language = "pt-BR"
download_images = false

[[volumes]]
id = "hd"
name = "Main HD"
path = "/mnt/hd"

[[volumes]]
id = "usb"
path = "/mnt/usb"
"#,
    );
    let config = load_config(&path).unwrap();
    drop(dir);

    assert_eq!(config.db_path(), PathBuf::from("/srv/vidshelf/vidshelf.db"));
    assert_eq!(config.cache_dir(), PathBuf::from("/srv/vidshelf/scan-cache"));
    assert_eq!(config.images_dir(), PathBuf::from("/srv/vidshelf/images"));

    let policy = config.walk_policy();
    assert_eq!(policy.max_depth, 4);
    assert_eq!(policy.extra_extensions, vec!["rmvb".to_string()]);
    assert_eq!(policy.duplicate_episodes, DuplicatePolicy::KeepLast);
    assert_eq!(policy.loose_files, LooseFilePolicy::Ignore);

    assert_eq!(config.metadata.language, "pt-BR");
    assert_eq!(config.volumes.len(), 2);
    assert_eq!(config.volumes[0].display_name(), "Main HD");
    assert_eq!(config.volumes[1].display_name(), "usb");
}

#[test]
fn data_files_live_under_data_dir() {
    let config = Config::default();
    let resolved = config.resolved_data_dir();
    assert!(resolved.ends_with(".local/share/vidshelf"));
    assert_eq!(config.db_path(), resolved.join("vidshelf.db"));
}

#[test]
fn invalid_values_are_rejected() {
    let mut config = Config::default();
    config.scan.max_depth = 0;
    assert!(validate_config(&config).is_err());

    let mut config = Config::default();
    config.scan.cache_ttl_hours = 0;
    assert!(validate_config(&config).is_err());

    let mut config = Config::default();
    config.metadata.enabled = true;
    assert!(validate_config(&config).is_err());
    config.metadata.tmdb_api_key = Some("   ".into());
    assert!(validate_config(&config).is_err());
    config.metadata.tmdb_api_key = Some("key".into());
    assert!(validate_config(&config).is_ok());
}

#[test]
fn duplicate_volume_ids_are_rejected() {
    let (_dir, path) = write_config(
        r#"
[[volumes]]
id = "hd"
path = "/mnt/a"

[[volumes]]
id = "hd"
path = "/mnt/b"
"#,
    );
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("Duplicate volume id"));
}

#[test]
fn malformed_file_is_an_error() {
    let (_dir, path) = write_config("[scan\nmax_depth = ");
    assert!(load_config(&path).is_err());
}

#[test]
fn explicit_missing_path_is_an_error() {
    let result = load_config_or_default(Some(std::path::Path::new("/nonexistent/vidshelf.toml")));
    assert!(result.is_err());
}
