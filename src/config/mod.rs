mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./vidshelf.toml",
        "./config.toml",
        "~/.config/vidshelf/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.scan.max_depth == 0 {
        anyhow::bail!("scan.max_depth must be at least 1");
    }

    if config.scan.cache_ttl_hours == 0 {
        anyhow::bail!("scan.cache_ttl_hours must be at least 1");
    }

    let mut seen = HashSet::new();
    for volume in &config.volumes {
        if volume.id.trim().is_empty() {
            anyhow::bail!("Volume at {:?} has an empty id", volume.path);
        }
        if !seen.insert(volume.id.as_str()) {
            anyhow::bail!("Duplicate volume id '{}'", volume.id);
        }
        if !volume.path.exists() {
            tracing::warn!("Volume path does not exist: {:?}", volume.path);
        }
    }

    let has_key = config
        .metadata
        .tmdb_api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());
    if config.metadata.enabled && !has_key {
        anyhow::bail!("Metadata is enabled but no TMDB API key is set");
    }

    Ok(())
}
