// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Manifest of saved images.
//!
//! One entry per written artifact, in the order they were written. Sub-images
//! name the whole image they were cut from as their parent.

use serde::{Deserialize, Serialize};

/// A single saved artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// All artifacts written during a run. Serializes as a plain list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: String, parent: Option<String>) {
        self.entries.push(ManifestEntry { name, parent });
    }

    /// Remove the first entry with this name. Returns false if there was none.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|e| e.name == name) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }
}
