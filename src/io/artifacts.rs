// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Output artifacts: saved images plus their manifest entries.
//!
//! Artifact names are derived from the output pattern and the navigator's
//! path markers, e.g. `out-1-2.jpg` for the whole image and `out-1-2+3.jpg`
//! for the sub-image of annotation 3 on it.

use crate::io::serialization;
use crate::models::manifest::Manifest;
use anyhow::{Context, Result};
use image::{DynamicImage, RgbaImage};
use std::path::PathBuf;

const EXTENSION: &str = ".jpg";

/// Name of the artifact for `markers`, and its parent for sub-images.
pub fn artifact_name(pattern: &str, markers: &[u32], ordinal: Option<u32>) -> (String, Option<String>) {
    let mut stem = pattern.to_string();
    for marker in markers {
        stem.push('-');
        stem.push_str(&marker.to_string());
    }

    match ordinal {
        Some(ordinal) => (
            format!("{}+{}{}", stem, ordinal, EXTENSION),
            Some(format!("{}{}", stem, EXTENSION)),
        ),
        None => (format!("{}{}", stem, EXTENSION), None),
    }
}

/// Where saved images go.
pub trait ArtifactStore {
    /// Store `image` under the name derived from `markers` and return that
    /// name. `ordinal` marks a sub-image of the whole image at `markers`.
    fn persist(&mut self, image: &RgbaImage, markers: &[u32], ordinal: Option<u32>) -> Result<String>;

    /// Delete a persisted artifact and its manifest entry.
    fn remove(&mut self, name: &str) -> Result<()>;

    /// Flush the manifest. Called once when the program terminates.
    fn finalize(&mut self) -> Result<()>;
}

/// Writes JPEG files next to the output pattern and keeps the manifest.
pub struct FileArtifactStore {
    pattern: String,
    manifest_path: PathBuf,
    manifest: Manifest,
}

impl FileArtifactStore {
    pub fn new(pattern: impl Into<String>, manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            pattern: pattern.into(),
            manifest_path: manifest_path.into(),
            manifest: Manifest::new(),
        }
    }

    #[cfg(test)]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

impl ArtifactStore for FileArtifactStore {
    fn persist(&mut self, image: &RgbaImage, markers: &[u32], ordinal: Option<u32>) -> Result<String> {
        let (name, parent) = artifact_name(&self.pattern, markers, ordinal);

        // JPEG has no alpha channel.
        DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .save(&name)
            .with_context(|| format!("Could not save {}", name))?;

        log::info!("Saved {} ({}x{})", name, image.width(), image.height());
        self.manifest.add(name.clone(), parent);
        Ok(name)
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        log::info!("Removing {}", name);
        self.manifest.remove(name);
        std::fs::remove_file(name).with_context(|| format!("Could not remove {}", name))
    }

    fn finalize(&mut self) -> Result<()> {
        log::info!(
            "Writing {} manifest entries to {}",
            self.manifest.entries().len(),
            self.manifest_path.display()
        );
        serialization::export_manifest(&self.manifest, &self.manifest_path)
    }
}
