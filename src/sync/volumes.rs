//! Storage volumes a scan runs over.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::VolumeConfig;

/// One storage root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Volume {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    /// Only connected volumes are scanned.
    pub connected: bool,
}

/// Source of the volumes to scan.
pub trait VolumeProvider: Send + Sync {
    fn volumes(&self) -> Vec<Volume>;
}

/// Volumes listed in the `[[volumes]]` config section.
///
/// Connectivity is checked on every call, so a drive attached after startup
/// is picked up by the next scan.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredVolumes {
    entries: Vec<VolumeConfig>,
}

impl ConfiguredVolumes {
    pub fn new(entries: Vec<VolumeConfig>) -> Self {
        Self { entries }
    }
}

impl VolumeProvider for ConfiguredVolumes {
    fn volumes(&self) -> Vec<Volume> {
        self.entries
            .iter()
            .map(|v| Volume {
                id: v.id.clone(),
                name: v.display_name().to_string(),
                path: v.path.clone(),
                connected: v.path.is_dir(),
            })
            .collect()
    }
}

impl VolumeProvider for Vec<Volume> {
    fn volumes(&self) -> Vec<Volume> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn connectivity_follows_directory_presence() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let volumes = ConfiguredVolumes::new(vec![
            VolumeConfig {
                id: "hd".into(),
                name: Some("Main HD".into()),
                path: dir.path().to_path_buf(),
            },
            VolumeConfig {
                id: "usb".into(),
                name: None,
                path: dir.path().join("missing"),
            },
            VolumeConfig {
                id: "file".into(),
                name: None,
                path: file,
            },
        ])
        .volumes();

        assert_eq!(volumes.len(), 3);
        assert!(volumes[0].connected);
        assert_eq!(volumes[0].name, "Main HD");
        assert!(!volumes[1].connected);
        assert_eq!(volumes[1].name, "usb");
        assert!(!volumes[2].connected);
    }
}
