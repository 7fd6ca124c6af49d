// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! One working image and the annotations drawn on it.
//!
//! A [`Frame`] is the image itself together with the display transform
//! accumulated from rotations. A [`Session`] adds the annotation store.
//! Sessions live on the navigation stack; frames are what survives when a
//! session is left and may later be re-entered.

use image::{Rgba, RgbaImage};

use super::annotation::{Annotation, AnnotationSnapshot, AnnotationStore, Style};
use crate::util::geometry::{Point, Rect, Transform};

/// Fill for parts of a rendered region that fall outside the image.
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// An image placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub label: String,
    pub image: RgbaImage,
    pub transform: Transform,
    /// Set once the image has been rotated.
    pub changed: bool,
}

impl Frame {
    pub fn new(label: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            label: label.into(),
            image,
            transform: Transform::identity(),
            changed: false,
        }
    }
}

/// A frame plus its annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    frame: Frame,
    annotations: AnnotationStore,
}

impl From<Frame> for Session {
    fn from(frame: Frame) -> Self {
        Self {
            frame,
            annotations: AnnotationStore::new(),
        }
    }
}

impl Session {
    pub fn label(&self) -> &str {
        &self.frame.label
    }

    pub fn image(&self) -> &RgbaImage {
        &self.frame.image
    }

    pub fn transform(&self) -> Transform {
        self.frame.transform
    }

    pub fn is_changed(&self) -> bool {
        self.frame.changed
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    /// Drop the annotations and keep only the frame.
    pub fn into_frame(self) -> Frame {
        self.frame
    }

    /// The untransformed image bounds.
    pub fn image_rect(&self) -> Rect {
        let (width, height) = self.frame.image.dimensions();
        Rect::new(0.0, 0.0, width as f64, height as f64)
    }

    /// Where the image currently sits in the scene.
    pub fn scene_rect(&self) -> Rect {
        self.frame.transform.map_rect(&self.image_rect())
    }

    /// Render `region` of the scene with the image placed by `transform`.
    ///
    /// Annotations are overlays owned by the front end and never end up in
    /// the returned pixels.
    pub fn render(&self, region: Rect, transform: &Transform) -> RgbaImage {
        if transform.is_identity() && region == self.image_rect() {
            return self.frame.image.clone();
        }

        let width = (region.width.round() as u32).max(1);
        let height = (region.height.round() as u32).max(1);
        let mut out = RgbaImage::from_pixel(width, height, BACKGROUND);

        let inverse = match transform.inverse() {
            Some(inverse) => inverse,
            None => {
                log::warn!("Degenerate transform while rendering {}", self.frame.label);
                return out;
            }
        };

        let source = &self.frame.image;
        let (src_width, src_height) = source.dimensions();
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let scene = Point::new(region.x + x as f64 + 0.5, region.y + y as f64 + 0.5);
            let p = inverse.map_point(scene);
            let (sx, sy) = (p.x.floor(), p.y.floor());
            if sx >= 0.0 && sy >= 0.0 && sx < src_width as f64 && sy < src_height as f64 {
                *pixel = *source.get_pixel(sx as u32, sy as u32);
            }
        }
        out
    }

    /// The whole image as it is currently displayed.
    pub fn render_scene(&self) -> RgbaImage {
        self.render(self.scene_rect(), &self.frame.transform)
    }

    /// The region of an annotation, cut out under the transform the image
    /// had when the annotation was drawn.
    pub fn render_annotation(&self, id: u32) -> Option<RgbaImage> {
        let annotation = self.annotations.get(id)?;
        Some(self.render(annotation.bounds, &annotation.anchor))
    }

    /// Add an annotation anchored to the current image transform and return
    /// its id.
    pub fn add_annotation(&mut self, bounds: Rect, explicit_id: Option<u32>) -> u32 {
        self.annotations.add(bounds, explicit_id, self.frame.transform).id
    }

    pub fn remove_annotation(&mut self, id: u32) -> Option<(usize, Annotation)> {
        self.annotations.remove(id)
    }

    /// Put a removed annotation back, catching its display transform up with
    /// any rotation that happened while it was gone.
    pub fn reinsert_annotation(&mut self, index: usize, mut annotation: Annotation) {
        if let Some(inverse) = annotation.anchor.inverse() {
            annotation.transform = inverse * self.frame.transform;
        }
        self.annotations.insert(index, annotation);
    }

    pub fn annotation(&self, id: u32) -> Option<&Annotation> {
        self.annotations.get(id)
    }

    /// Change the style of an annotation. Returns false if it is absent.
    pub fn set_style(&mut self, id: u32, style: Style) -> bool {
        match self.annotations.get_mut(id) {
            Some(annotation) => {
                annotation.style = style;
                true
            }
            None => false,
        }
    }

    /// Id of the topmost annotation under a scene point.
    pub fn annotation_at(&self, point: Point) -> Option<u32> {
        self.annotations.at(point)
    }

    pub fn snapshot_annotations(&self) -> AnnotationSnapshot {
        self.annotations.snapshot()
    }

    pub fn restore_annotations(&mut self, snapshot: AnnotationSnapshot) {
        self.annotations.restore(snapshot);
    }

    /// Rotate the displayed image about its center. Existing annotations
    /// follow on screen but keep their anchors.
    pub fn apply_rotation(&mut self, degrees: f64) {
        let center = self.scene_rect().center();
        let delta = Transform::rotation_about(center, degrees);
        self.frame.transform = self.frame.transform * delta;
        self.annotations.apply(delta);
        self.frame.changed = true;
        log::debug!("Rotated {} by {} degrees", self.frame.label, degrees);
    }
}
