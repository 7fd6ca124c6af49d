// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Clipper - interactive image clipping
//!
//! Walks through a list of images, cuts out rectangular regions, descends
//! into regions to cut them further, and saves everything with names that
//! follow the path taken. Every step can be undone and redone.

mod app;
mod config;
mod controller;
mod history;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::ClipperApp;
use clap::Parser;
use config::Options;
use controller::{Clipper, Outcome};
use io::artifacts::FileArtifactStore;
use io::media::{FileInputs, IMAGE_EXTENSIONS};
use models::navigation::Navigator;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let mut options = Options::parse();
    options.validate()?;

    if options.infiles.is_empty() {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_files()
        {
            options.infiles = paths;
        }
    }
    if options.infiles.is_empty() {
        log::info!("No input images");
        return Ok(());
    }
    log::debug!("Options: {:?}", options);

    let nav = Navigator::new(Box::new(FileInputs::new(options.infiles.clone())));
    let store = FileArtifactStore::new(options.out.clone(), options.manifest.clone());
    let mut clipper = Clipper::new(nav, Box::new(store), options.discard_unchanged);
    if clipper.start() == Outcome::Quit {
        return Ok(());
    }

    // Configure egui options
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Clipper"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Clipper",
        native_options,
        Box::new(|_cc| Ok(Box::new(ClipperApp::new(clipper)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
