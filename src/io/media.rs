// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Input image loading.
//!
//! Input files are decoded lazily, one at a time, as the navigator asks for
//! the next top-level image.

use crate::models::navigation::InputSource;
use crate::models::session::Frame;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Extensions offered by the file picker.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "gif", "webp"];

/// Decode an image file into RGBA pixels.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(img.to_rgba8())
}

/// Input queue backed by a list of file paths.
pub struct FileInputs {
    paths: VecDeque<PathBuf>,
}

impl FileInputs {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }
}

impl InputSource for FileInputs {
    fn next_input(&mut self) -> Option<Result<Frame>> {
        let path = self.paths.pop_front()?;
        Some(load_image(&path).map(|image| {
            log::info!("Loaded {} ({}x{})", path.display(), image.width(), image.height());
            Frame::new(path.display().to_string(), image)
        }))
    }
}
