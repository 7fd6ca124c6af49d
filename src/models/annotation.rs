// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rectangle annotations and the per-session store that owns them.
//!
//! An annotation is a region the user dragged out on top of an image. Its
//! bounds are recorded in the scene coordinates of the moment it was drawn,
//! together with the image transform of that moment (the anchor), so the
//! region can later be cut out of the image exactly as it looked then.

use crate::util::geometry::{Point, Rect, Transform};

/// Visual and lifecycle state of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Rubber band while the pointer is still being dragged.
    Drafting,
    /// Drawn and neither saved nor discarded yet.
    Active,
    /// Saved as a sub-image. Committed regions cannot be discarded.
    Committed,
}

/// A rectangle annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: u32,
    pub bounds: Rect,
    pub style: Style,
    /// Rotations applied to the image since the annotation was drawn.
    pub transform: Transform,
    /// Image transform at creation time.
    pub anchor: Transform,
}

impl Annotation {
    /// An uncommitted rubber band, as shown while dragging.
    pub fn draft(bounds: Rect) -> Self {
        Self {
            id: 0,
            bounds,
            style: Style::Drafting,
            transform: Transform::identity(),
            anchor: Transform::identity(),
        }
    }

    /// Corners of the annotation as currently displayed.
    pub fn outline(&self) -> [Point; 4] {
        self.transform.map_corners(&self.bounds)
    }

    /// Whether `point` (in current scene coordinates) falls inside the
    /// displayed annotation.
    pub fn contains(&self, point: Point) -> bool {
        match self.transform.inverse() {
            Some(inverse) => self.bounds.contains(inverse.map_point(point)),
            None => false,
        }
    }

    pub fn is_committed(&self) -> bool {
        self.style == Style::Committed
    }
}

/// Saved copy of a store, used to bring a session back after it was left.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationSnapshot {
    annotations: Vec<Annotation>,
    last_id: u32,
}

/// Ordered annotations of one session plus their id allocator.
///
/// Ids only ever grow: removing an annotation does not free its id, and
/// re-adding one with an explicit id never lowers the counter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    last_id: u32,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an annotation drawn under `anchor`. Allocates the next id unless
    /// `explicit_id` is given.
    pub fn add(&mut self, bounds: Rect, explicit_id: Option<u32>, anchor: Transform) -> &Annotation {
        let id = explicit_id.unwrap_or(self.last_id + 1);
        self.last_id = self.last_id.max(id);
        self.annotations.push(Annotation {
            id,
            bounds,
            style: Style::Active,
            transform: Transform::identity(),
            anchor,
        });
        &self.annotations[self.annotations.len() - 1]
    }

    /// Put a previously removed annotation back at `index` (clamped).
    pub fn insert(&mut self, index: usize, annotation: Annotation) {
        self.last_id = self.last_id.max(annotation.id);
        let index = index.min(self.annotations.len());
        self.annotations.insert(index, annotation);
    }

    /// Remove by id, returning the annotation and its former position.
    /// Absent ids are ignored.
    pub fn remove(&mut self, id: u32) -> Option<(usize, Annotation)> {
        let index = self.annotations.iter().position(|a| a.id == id)?;
        Some((index, self.annotations.remove(index)))
    }

    pub fn get(&self, id: u32) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| a.id == id)
    }

    /// Topmost annotation under `point`.
    pub fn at(&self, point: Point) -> Option<u32> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.contains(point))
            .map(|a| a.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    #[cfg(test)]
    pub fn last_id(&self) -> u32 {
        self.last_id
    }

    /// Compose `delta` onto every annotation's display transform. Anchors
    /// are left alone.
    pub fn apply(&mut self, delta: Transform) {
        for annotation in &mut self.annotations {
            annotation.transform = annotation.transform * delta;
        }
    }

    pub fn snapshot(&self) -> AnnotationSnapshot {
        AnnotationSnapshot {
            annotations: self.annotations.clone(),
            last_id: self.last_id,
        }
    }

    pub fn restore(&mut self, snapshot: AnnotationSnapshot) {
        self.annotations = snapshot.annotations;
        self.last_id = self.last_id.max(snapshot.last_id);
    }
}
