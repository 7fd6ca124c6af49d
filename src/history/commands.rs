// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The concrete reversible operations.
//!
//! Every command acts on the current session of the navigator it is handed,
//! which the history guarantees is the same session it acted on before.

use super::Command;
use crate::controller::Workspace;
use crate::models::annotation::{Annotation, AnnotationSnapshot, Style};
use crate::models::navigation::{Ascent, PathStep};
use crate::models::session::Frame;
use crate::util::geometry::Rect;

/// Draw a new annotation.
pub struct CreateAnnotation {
    bounds: Rect,
    /// Allocated on the first run and reused on every redo.
    id: Option<u32>,
    /// The undone annotation, anchor included, waiting for a redo.
    removed: Option<(usize, Annotation)>,
}

impl CreateAnnotation {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            id: None,
            removed: None,
        }
    }
}

impl Command for CreateAnnotation {
    fn name(&self) -> &'static str {
        "create annotation"
    }

    fn forward(&mut self, ws: &mut Workspace) {
        let Some(session) = ws.nav.current_mut() else {
            return;
        };
        match self.removed.take() {
            Some((index, annotation)) => session.reinsert_annotation(index, annotation),
            None => {
                let id = session.add_annotation(self.bounds, self.id);
                log::debug!("Annotation {} at {:?}", id, self.bounds);
                self.id = Some(id);
            }
        }
    }

    fn backward(&mut self, ws: &mut Workspace) {
        if let (Some(id), Some(session)) = (self.id, ws.nav.current_mut()) {
            self.removed = session.remove_annotation(id);
        }
    }
}

/// Remove an annotation that has not been saved yet. Right-clicking an
/// annotation discards it this way.
pub struct RemoveAnnotation {
    id: u32,
    /// The removed annotation and where it sat.
    removed: Option<(usize, Annotation)>,
}

impl RemoveAnnotation {
    pub fn new(id: u32) -> Self {
        Self { id, removed: None }
    }
}

impl Command for RemoveAnnotation {
    fn name(&self) -> &'static str {
        "remove annotation"
    }

    fn forward(&mut self, ws: &mut Workspace) {
        let Some(session) = ws.nav.current_mut() else {
            return;
        };
        if session.annotation(self.id).is_some_and(Annotation::is_committed) {
            log::warn!("Annotation {} is saved and cannot be discarded", self.id);
            return;
        }
        self.removed = session.remove_annotation(self.id);
    }

    fn backward(&mut self, ws: &mut Workspace) {
        if let (Some((index, annotation)), Some(session)) = (self.removed.take(), ws.nav.current_mut()) {
            session.reinsert_annotation(index, annotation);
        }
    }
}

/// What a whole-image command keeps of the session it left.
struct LeftSession {
    artifact: Option<String>,
    annotations: AnnotationSnapshot,
    ascent: Ascent,
}

/// Bring a left session back: drop its artifact, re-enter its frame and put
/// its annotations back.
fn return_to(left: LeftSession, ws: &mut Workspace) {
    if let Some(name) = &left.artifact {
        if let Err(e) = ws.store.remove(name) {
            log::warn!("{:#}", e);
        }
    }
    ws.nav.restore(left.ascent);
    if let Some(session) = ws.nav.current_mut() {
        session.restore_annotations(left.annotations);
    }
}

/// Save the whole current image and move on.
pub struct SaveWholeImage {
    /// Skip writing because the image is unchanged and unchanged images are
    /// discarded.
    skip: bool,
    left: Option<LeftSession>,
}

impl SaveWholeImage {
    pub fn new(skip: bool) -> Self {
        Self { skip, left: None }
    }
}

impl Command for SaveWholeImage {
    fn name(&self) -> &'static str {
        "save image"
    }

    fn forward(&mut self, ws: &mut Workspace) {
        let Workspace { nav, store } = ws;
        let Some(session) = nav.current() else {
            return;
        };

        let artifact = if self.skip {
            log::info!("{} is unchanged, not saving", session.label());
            None
        } else {
            let image = session.render_scene();
            match store.persist(&image, nav.markers(), None) {
                Ok(name) => Some(name),
                Err(e) => {
                    log::error!("{:#}", e);
                    None
                }
            }
        };
        let annotations = session.snapshot_annotations();

        if let Some(ascent) = nav.ascend() {
            self.left = Some(LeftSession {
                artifact,
                annotations,
                ascent,
            });
        }
    }

    fn backward(&mut self, ws: &mut Workspace) {
        if let Some(left) = self.left.take() {
            return_to(left, ws);
        }
    }
}

/// Leave the current image without saving it.
pub struct DiscardWholeImage {
    left: Option<LeftSession>,
}

impl DiscardWholeImage {
    pub fn new() -> Self {
        Self { left: None }
    }
}

impl Default for DiscardWholeImage {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for DiscardWholeImage {
    fn name(&self) -> &'static str {
        "discard image"
    }

    fn forward(&mut self, ws: &mut Workspace) {
        let Some(session) = ws.nav.current() else {
            return;
        };
        log::info!("Discarding {}", session.label());
        let annotations = session.snapshot_annotations();

        if let Some(ascent) = ws.nav.ascend() {
            self.left = Some(LeftSession {
                artifact: None,
                annotations,
                ascent,
            });
        }
    }

    fn backward(&mut self, ws: &mut Workspace) {
        if let Some(left) = self.left.take() {
            return_to(left, ws);
        }
    }
}

/// Save the region of an annotation as a sub-image of the current image.
pub struct SaveSubImage {
    id: u32,
    artifact: Option<String>,
}

impl SaveSubImage {
    pub fn new(id: u32) -> Self {
        Self { id, artifact: None }
    }
}

impl Command for SaveSubImage {
    fn name(&self) -> &'static str {
        "save sub-image"
    }

    fn forward(&mut self, ws: &mut Workspace) {
        let Workspace { nav, store } = ws;
        let Some(image) = nav.current().and_then(|s| s.render_annotation(self.id)) else {
            log::warn!("No annotation {} to save", self.id);
            return;
        };

        self.artifact = match store.persist(&image, nav.markers(), Some(self.id)) {
            Ok(name) => Some(name),
            Err(e) => {
                log::error!("{:#}", e);
                None
            }
        };
        if let Some(session) = nav.current_mut() {
            session.set_style(self.id, Style::Committed);
        }
    }

    fn backward(&mut self, ws: &mut Workspace) {
        if let Some(name) = self.artifact.take() {
            if let Err(e) = ws.store.remove(&name) {
                log::warn!("{:#}", e);
            }
        }
        if let Some(session) = ws.nav.current_mut() {
            session.set_style(self.id, Style::Active);
        }
    }
}

/// Enter the region of an annotation as a new session.
pub struct ZoomIntoAnnotation {
    id: u32,
    entered: bool,
}

impl ZoomIntoAnnotation {
    pub fn new(id: u32) -> Self {
        Self { id, entered: false }
    }
}

impl Command for ZoomIntoAnnotation {
    fn name(&self) -> &'static str {
        "zoom into annotation"
    }

    fn forward(&mut self, ws: &mut Workspace) {
        let Some(session) = ws.nav.current() else {
            return;
        };
        let Some(image) = session.render_annotation(self.id) else {
            log::warn!("No annotation {} to zoom into", self.id);
            return;
        };
        let label = format!("{}#{}", session.label(), self.id);
        ws.nav.descend(Frame::new(label, image), PathStep::Sub(self.id));
        self.entered = true;
    }

    fn backward(&mut self, ws: &mut Workspace) {
        if self.entered {
            ws.nav.ascend();
            self.entered = false;
        }
    }
}
