// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Manifest serialization.
//!
//! The manifest is written as JSON by default, or as YAML when the target
//! path has a `.yaml`/`.yml` extension.

use crate::models::manifest::Manifest;
use anyhow::{Context, Result};
use std::path::Path;

/// Export the manifest to YAML format.
pub fn export_yaml(manifest: &Manifest, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(manifest)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export the manifest to JSON format.
pub fn export_json(manifest: &Manifest, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Export the manifest in the format implied by the file extension.
pub fn export_manifest(manifest: &Manifest, path: &Path) -> Result<()> {
    let extension = path.extension().and_then(|s| s.to_str());
    let result = match extension {
        Some("yaml") | Some("yml") => export_yaml(manifest, path),
        _ => export_json(manifest, path),
    };
    result.with_context(|| format!("Could not write manifest {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::manifest::ManifestEntry;
    use tempfile::tempdir;

    fn sample() -> Manifest {
        let mut manifest = Manifest::new();
        manifest.add("out-1.jpg".into(), None);
        manifest.add("out-1+2.jpg".into(), Some("out-1.jpg".into()));
        manifest
    }

    #[test]
    fn test_export_json_by_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clipper-images.json");
        export_manifest(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let entries: Vec<ManifestEntry> = serde_json::from_str(&text).unwrap();
        assert_eq!(entries, sample().entries());
    }

    #[test]
    fn test_export_yaml_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("images.yml");
        export_manifest(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let manifest: Manifest = serde_yaml::from_str(&text).unwrap();
        assert_eq!(manifest, sample());
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("m.json");
        assert!(export_manifest(&sample(), &path).is_err());
    }
}
