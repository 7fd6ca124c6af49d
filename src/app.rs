// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The window is a thin shell around the [`Clipper`] controller: it forwards
//! keyboard and canvas events, acts on the returned [`Outcome`] and keeps a
//! texture of the current session up to date.

use crate::controller::{Clipper, InputEvent, KeyCommand, Outcome};
use crate::ui::canvas;

/// Main application state.
pub struct ClipperApp {
    clipper: Clipper,

    /// Texture of the current session and the revision it was made from
    texture: Option<(u64, egui::TextureHandle)>,

    /// Held pointer button and collected wheel scroll
    pointer: canvas::PointerState,
}

impl ClipperApp {
    /// Wrap an already started controller.
    pub fn new(clipper: Clipper) -> Self {
        Self {
            clipper,
            texture: None,
            pointer: canvas::PointerState::default(),
        }
    }

    /// Re-render the texture if the controller changed since the last frame.
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        let revision = self.clipper.revision();
        if matches!(self.texture, Some((seen, _)) if seen == revision) {
            return;
        }

        self.texture = self.clipper.current().map(|session| {
            let image = session.render_scene();
            let size = [image.width() as usize, image.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
            let texture = ctx.load_texture("session", color_image, egui::TextureOptions::LINEAR);
            log::debug!("Uploaded texture for {} ({}x{})", session.label(), size[0], size[1]);
            (revision, texture)
        });
    }

    /// Keyboard shortcuts, ignored while a text field has focus.
    fn key_command(ctx: &egui::Context) -> Option<KeyCommand> {
        if ctx.wants_keyboard_input() {
            return None;
        }
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                Some(KeyCommand::Quit)
            } else if i.key_pressed(egui::Key::F) {
                Some(KeyCommand::ToggleFullscreen)
            } else if i.key_pressed(egui::Key::U)
                || (i.modifiers.command && !i.modifiers.shift && i.key_pressed(egui::Key::Z))
            {
                Some(KeyCommand::Undo)
            } else if (i.key_pressed(egui::Key::R) && !i.modifiers.command)
                || (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                || (i.modifiers.command && i.key_pressed(egui::Key::Y))
            {
                Some(KeyCommand::Redo)
            } else {
                None
            }
        })
    }

    fn apply(&mut self, ctx: &egui::Context, outcome: Outcome) {
        match outcome {
            Outcome::Idle => {}
            Outcome::Redraw => ctx.request_repaint(),
            Outcome::ToggleFullscreen => {
                let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
                ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!fullscreen));
            }
            Outcome::Quit => {
                log::info!("Closing window");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}

impl eframe::App for ClipperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(key) = Self::key_command(ctx) {
            let outcome = self.clipper.handle(InputEvent::Key(key));
            self.apply(ctx, outcome);
        }

        self.refresh_texture(ctx);

        // Main canvas (center)
        let texture = self.texture.as_ref().map(|(_, t)| t);
        let event = egui::CentralPanel::default()
            .show(ctx, |ui| canvas::show(ui, &self.clipper, texture, &mut self.pointer))
            .inner;

        if let Some(event) = event {
            let outcome = self.clipper.handle(event);
            self.apply(ctx, outcome);
        }
    }
}
