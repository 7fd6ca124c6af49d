// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the current session.
//!
//! Shows the session's image fitted into the available space, draws its
//! annotations on top and turns pointer input into controller events in
//! scene coordinates.

use crate::controller::{Button, Clipper, InputEvent, Modifiers};
use crate::models::annotation::{Annotation, Style};
use crate::util::geometry::{Point, Rect};

/// A pointer button held down over the canvas.
#[derive(Debug, Clone, Copy)]
pub struct Press {
    button: Button,
    start: Point,
}

/// Scroll distance, in points, that makes one rotation step. About one
/// notch of a mouse wheel.
const SCROLL_STEP: f32 = 40.0;

/// Pointer input carried from one frame to the next.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    press: Option<Press>,
    /// Scroll collected towards the next rotation step.
    scroll: f32,
}

impl PointerState {
    /// Add `delta` to the collected scroll and take one step out of it if a
    /// full step has built up. At most one step is taken per call and the
    /// excess is dropped. Reversing direction starts over.
    fn scroll_step(&mut self, delta: f32) -> Option<f64> {
        if delta == 0.0 {
            return None;
        }
        if self.scroll * delta < 0.0 {
            self.scroll = 0.0;
        }
        self.scroll += delta;
        if self.scroll.abs() < SCROLL_STEP {
            return None;
        }
        let sign = self.scroll.signum();
        self.scroll = self.scroll.clamp(-SCROLL_STEP, SCROLL_STEP) - sign * SCROLL_STEP;
        Some(sign as f64)
    }
}

const BUTTONS: [(egui::PointerButton, Button); 3] = [
    (egui::PointerButton::Primary, Button::Primary),
    (egui::PointerButton::Secondary, Button::Secondary),
    (egui::PointerButton::Middle, Button::Middle),
];

/// Maps between scene coordinates and screen coordinates.
#[derive(Debug, Clone, Copy)]
struct ScreenMapping {
    scene: Rect,
    screen: egui::Rect,
    scale: f32,
}

impl ScreenMapping {
    /// Fit `scene` into `available`, keeping the aspect ratio, centered.
    fn fit(scene: Rect, available: egui::Rect) -> Self {
        let scene_aspect = (scene.width / scene.height) as f32;
        let available_aspect = available.width() / available.height();

        let (display_width, display_height) = if scene_aspect > available_aspect {
            // Image is wider - fit to width
            let width = available.width();
            (width, width / scene_aspect)
        } else {
            // Image is taller - fit to height
            let height = available.height();
            (height * scene_aspect, height)
        };

        let x_offset = (available.width() - display_width) / 2.0;
        let y_offset = (available.height() - display_height) / 2.0;
        let screen = egui::Rect::from_min_size(
            available.min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width, display_height),
        );

        Self {
            scene,
            screen,
            scale: display_width / scene.width as f32,
        }
    }

    fn to_screen(&self, p: Point) -> egui::Pos2 {
        egui::pos2(
            self.screen.min.x + (p.x - self.scene.x) as f32 * self.scale,
            self.screen.min.y + (p.y - self.scene.y) as f32 * self.scale,
        )
    }

    fn to_scene(&self, p: egui::Pos2) -> Point {
        Point::new(
            self.scene.x + ((p.x - self.screen.min.x) / self.scale) as f64,
            self.scene.y + ((p.y - self.screen.min.y) / self.scale) as f64,
        )
    }
}

/// Display the current session and collect pointer input.
pub fn show(
    ui: &mut egui::Ui,
    clipper: &Clipper,
    texture: Option<&egui::TextureHandle>,
    pointer: &mut PointerState,
) -> Option<InputEvent> {
    let mut event = None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size() - egui::vec2(0.0, 24.0);

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(session), Some(texture)) = (clipper.current(), texture) else {
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new("No image").color(egui::Color32::from_gray(180)));
            });
            return;
        };

        let canvas_rect = egui::Rect::from_min_size(ui.min_rect().min, available_size);
        let mapping = ScreenMapping::fit(session.scene_rect(), canvas_rect);
        let response = ui.allocate_rect(canvas_rect, egui::Sense::click_and_drag());

        ui.painter().image(
            texture.id(),
            mapping.screen,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        for annotation in session.annotations().iter() {
            draw_annotation(ui.painter(), annotation, &mapping);
        }

        event = pointer_event(ui, &response, &mapping, pointer);

        // Rubber band while dragging out a new annotation
        if let Some(Press { button: Button::Primary, start }) = pointer.press {
            if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
                let draft = Annotation::draft(Rect::from_points(start, mapping.to_scene(pos)));
                draw_annotation(ui.painter(), &draft, &mapping);
            }
        }
    });

    // Status line at the bottom
    ui.separator();
    ui.horizontal(|ui| match clipper.current() {
        Some(session) => {
            let path: Vec<String> = clipper.markers().iter().map(|m| m.to_string()).collect();
            ui.label(session.label());
            ui.separator();
            ui.label(format!("Path: {}", path.join("-")));
            ui.separator();
            ui.label(format!("Regions: {}", session.annotations().len()));
            ui.separator();
            let undo = if clipper.can_undo() { "u: undo" } else { "" };
            let redo = if clipper.can_redo() { "r: redo" } else { "" };
            ui.label(egui::RichText::new(format!("{} {}", undo, redo)).italics().weak());
        }
        None => {
            ui.label("Done");
        }
    });

    event
}

/// Translate raw pointer state into at most one controller event.
fn pointer_event(
    ui: &egui::Ui,
    response: &egui::Response,
    mapping: &ScreenMapping,
    pointer: &mut PointerState,
) -> Option<InputEvent> {
    let (pos, scroll, modifiers) = ui.input(|i| {
        (
            i.pointer.interact_pos(),
            i.raw_scroll_delta,
            Modifiers {
                shift: i.modifiers.shift,
                ctrl: i.modifiers.ctrl || i.modifiers.command,
            },
        )
    });
    let pos = pos?;

    for (egui_button, button) in BUTTONS {
        if pointer.press.is_none() && response.hovered() && ui.input(|i| i.pointer.button_pressed(egui_button)) {
            pointer.press = Some(Press {
                button,
                start: mapping.to_scene(pos),
            });
        }

        let released = ui.input(|i| i.pointer.button_released(egui_button));
        if let Some(current) = pointer.press {
            if released && current.button == button {
                pointer.press = None;
                return Some(InputEvent::PointerDragged {
                    button,
                    start: current.start,
                    end: mapping.to_scene(pos),
                });
            }
        }
    }

    if !response.hovered() {
        pointer.scroll = 0.0;
        return None;
    }
    // Shift may turn vertical wheel motion into horizontal.
    let delta = pointer.scroll_step(scroll.x + scroll.y)?;
    Some(InputEvent::WheelRotate { delta, modifiers })
}

/// Draw an annotation on the canvas.
fn draw_annotation(painter: &egui::Painter, annotation: &Annotation, mapping: &ScreenMapping) {
    let points: Vec<egui::Pos2> = annotation
        .outline()
        .iter()
        .map(|p| mapping.to_screen(*p))
        .collect();

    let (stroke, fill) = match annotation.style {
        Style::Drafting => (
            egui::Stroke::new(3.0, egui::Color32::BLACK),
            egui::Color32::TRANSPARENT,
        ),
        Style::Active => (
            egui::Stroke::new(2.0, egui::Color32::GREEN),
            egui::Color32::from_rgba_unmultiplied(0, 100, 0, 60),
        ),
        Style::Committed => (
            egui::Stroke::new(2.0, egui::Color32::GRAY),
            egui::Color32::from_rgba_unmultiplied(128, 128, 128, 90),
        ),
    };

    painter.add(egui::Shape::convex_polygon(points, fill, stroke));
}
