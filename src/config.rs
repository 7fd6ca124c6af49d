// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Command line options.

use anyhow::{bail, Result};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// Manifest written when no `--manifest` is given.
pub const DEFAULT_MANIFEST: &str = "clipper-images.json";

#[derive(Parser, Debug)]
#[command(name = "clipper", version, about = "Image clipping application.")]
pub struct Options {
    /// Input images, processed in order
    pub infiles: Vec<PathBuf>,
    /// Pattern of output files
    #[arg(short = 'o', long = "out", value_name = "OUTPATTERN")]
    pub out: String,
    /// Discard the image when saving if not changed
    #[arg(short = 'd', long = "discard-if-not-changed", action = ArgAction::SetTrue)]
    pub discard_unchanged: bool,
    /// Manifest of saved images (.json, or .yaml/.yml)
    #[arg(long, default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,
}

impl Options {
    /// Directory the output pattern points into.
    pub fn output_dir(&self) -> &Path {
        match Path::new(&self.out).parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// Check the options that clap cannot.
    pub fn validate(&self) -> Result<()> {
        let dir = self.output_dir();
        if !dir.is_dir() {
            bail!("--out directory {} does not exist", dir.display());
        }
        Ok(())
    }
}
