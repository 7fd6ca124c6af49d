// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Turns front-end input events into commands.
//!
//! The controller owns the navigator, the artifact store and the history.
//! It knows nothing about windows or pixels on screen: the front end feeds
//! it events in scene coordinates and asks it for the current session to
//! draw.

use crate::history::commands::{
    CreateAnnotation, DiscardWholeImage, RemoveAnnotation, SaveSubImage, SaveWholeImage,
    ZoomIntoAnnotation,
};
use crate::history::{Command, History};
use crate::io::artifacts::ArtifactStore;
use crate::models::navigation::Navigator;
use crate::models::session::Session;
use crate::util::geometry::{Point, Rect};

/// Rotation per wheel step, and with Ctrl held.
const ROTATION_STEP: f64 = 2.0;
const ROTATION_STEP_COARSE: f64 = 90.0;

/// State shared by all commands.
pub struct Workspace {
    pub nav: Navigator,
    pub store: Box<dyn ArtifactStore>,
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
    Middle,
}

/// Keyboard modifiers held during a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

/// Keyboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    ToggleFullscreen,
    Undo,
    Redo,
}

/// A discrete input event. Points are in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDragged {
        button: Button,
        start: Point,
        end: Point,
    },
    PointerClicked {
        button: Button,
        point: Point,
    },
    WheelRotate {
        delta: f64,
        modifiers: Modifiers,
    },
    Key(KeyCommand),
}

/// What the front end should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed.
    Idle,
    /// The current session changed and should be redrawn.
    Redraw,
    ToggleFullscreen,
    /// All work is done; close the window.
    Quit,
}

/// The interactive clipper.
pub struct Clipper {
    workspace: Workspace,
    history: History,
    discard_unchanged: bool,
    /// Bumped on every change to the displayed state.
    revision: u64,
    finished: bool,
}

impl Clipper {
    pub fn new(nav: Navigator, store: Box<dyn ArtifactStore>, discard_unchanged: bool) -> Self {
        Self {
            workspace: Workspace { nav, store },
            history: History::new(),
            discard_unchanged,
            revision: 0,
            finished: false,
        }
    }

    /// Load the first input. Quits right away if there is none.
    pub fn start(&mut self) -> Outcome {
        if self.workspace.nav.start() {
            self.revision += 1;
            Outcome::Redraw
        } else {
            self.finish()
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.workspace.nav.current()
    }

    pub fn markers(&self) -> &[u32] {
        self.workspace.nav.markers()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn handle(&mut self, event: InputEvent) -> Outcome {
        if self.finished {
            return Outcome::Idle;
        }

        match event {
            InputEvent::PointerDragged { button, start, end } => {
                let rect = Rect::from_points(start, end);
                if button == Button::Primary && !rect.is_empty() {
                    self.push(Box::new(CreateAnnotation::new(rect)))
                } else {
                    self.click(button, end)
                }
            }
            InputEvent::PointerClicked { button, point } => self.click(button, point),
            InputEvent::WheelRotate { delta, modifiers } => self.rotate(delta, modifiers),
            InputEvent::Key(KeyCommand::Quit) => self.finish(),
            InputEvent::Key(KeyCommand::ToggleFullscreen) => Outcome::ToggleFullscreen,
            InputEvent::Key(KeyCommand::Undo) => {
                let done = self.history.undo(&mut self.workspace);
                self.settle(done)
            }
            InputEvent::Key(KeyCommand::Redo) => {
                let done = self.history.redo(&mut self.workspace);
                self.settle(done)
            }
        }
    }

    fn click(&mut self, button: Button, point: Point) -> Outcome {
        let Some(session) = self.current() else {
            return Outcome::Idle;
        };
        let target = session
            .annotation_at(point)
            .and_then(|id| session.annotation(id))
            .map(|a| (a.id, a.is_committed()));

        let cmd: Box<dyn Command> = match (button, target) {
            (Button::Primary, None) => {
                let skip = self.discard_unchanged && !session.is_changed();
                Box::new(SaveWholeImage::new(skip))
            }
            (Button::Primary, Some((id, false))) => Box::new(SaveSubImage::new(id)),
            (Button::Secondary, None) => Box::new(DiscardWholeImage::new()),
            (Button::Secondary, Some((id, false))) => Box::new(RemoveAnnotation::new(id)),
            (Button::Middle, Some((id, _))) => Box::new(ZoomIntoAnnotation::new(id)),
            (Button::Primary | Button::Secondary, Some((id, true))) => {
                log::debug!("Annotation {} is already saved", id);
                return Outcome::Idle;
            }
            (Button::Middle, None) => return Outcome::Idle,
        };
        self.push(cmd)
    }

    fn rotate(&mut self, delta: f64, modifiers: Modifiers) -> Outcome {
        if !modifiers.shift || delta == 0.0 {
            return Outcome::Idle;
        }
        let step = if modifiers.ctrl {
            ROTATION_STEP_COARSE
        } else {
            ROTATION_STEP
        };
        match self.workspace.nav.current_mut() {
            Some(session) => {
                session.apply_rotation(step * delta.signum());
                self.revision += 1;
                Outcome::Redraw
            }
            None => Outcome::Idle,
        }
    }

    fn push(&mut self, cmd: Box<dyn Command>) -> Outcome {
        self.history.push(cmd, &mut self.workspace);
        self.settle(true)
    }

    fn settle(&mut self, changed: bool) -> Outcome {
        if !changed {
            return Outcome::Idle;
        }
        self.revision += 1;
        if self.workspace.nav.is_terminated() {
            self.finish()
        } else {
            Outcome::Redraw
        }
    }

    /// Flush the manifest once and stop accepting events.
    fn finish(&mut self) -> Outcome {
        if !self.finished {
            self.finished = true;
            log::info!("Finishing");
            if let Err(e) = self.workspace.store.finalize() {
                log::error!("{:#}", e);
            }
        }
        Outcome::Quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::artifacts::testing::{RecordingStore, StoreCall};
    use crate::models::annotation::{Annotation, Style};
    use crate::models::session::tests::gradient;
    use crate::models::session::Frame;
    use crate::util::geometry::Transform;
    use image::RgbaImage;
    use std::collections::VecDeque;

    fn clipper(count: usize, discard_unchanged: bool) -> (Clipper, RecordingStore) {
        let inputs: VecDeque<Frame> = (0..count)
            .map(|i| Frame::new(format!("img{}", i), gradient(40, 30)))
            .collect();
        let store = RecordingStore::default();
        let mut clipper = Clipper::new(
            Navigator::new(Box::new(inputs)),
            Box::new(store.clone()),
            discard_unchanged,
        );
        assert_eq!(clipper.start(), Outcome::Redraw);
        (clipper, store)
    }

    fn drag(clipper: &mut Clipper, x0: f64, y0: f64, x1: f64, y1: f64) -> Outcome {
        clipper.handle(InputEvent::PointerDragged {
            button: Button::Primary,
            start: Point::new(x0, y0),
            end: Point::new(x1, y1),
        })
    }

    fn click(clipper: &mut Clipper, button: Button, x: f64, y: f64) -> Outcome {
        clipper.handle(InputEvent::PointerClicked {
            button,
            point: Point::new(x, y),
        })
    }

    fn key(clipper: &mut Clipper, key: KeyCommand) -> Outcome {
        clipper.handle(InputEvent::Key(key))
    }

    type Observed = (Vec<u32>, Option<(String, RgbaImage, Transform, Vec<Annotation>)>);

    /// Everything visible about the navigation state. The id allocator is
    /// left out on purpose: it remembers ids of undone annotations.
    fn state(clipper: &Clipper) -> Observed {
        let session = clipper.current().map(|s| {
            (
                s.label().to_string(),
                s.image().clone(),
                s.transform(),
                s.annotations().iter().cloned().collect(),
            )
        });
        (clipper.markers().to_vec(), session)
    }

    fn ids(clipper: &Clipper) -> Vec<u32> {
        clipper
            .current()
            .unwrap()
            .annotations()
            .iter()
            .map(|a| a.id)
            .collect()
    }

    #[test]
    fn test_drag_creates_annotation() {
        let (mut clipper, _) = clipper(1, false);
        assert_eq!(drag(&mut clipper, 20.0, 20.0, 5.0, 4.0), Outcome::Redraw);
        let annotation = clipper.current().unwrap().annotation(1).unwrap();
        assert_eq!(annotation.bounds, Rect::new(5.0, 4.0, 15.0, 16.0));
        assert_eq!(annotation.style, Style::Active);
    }

    #[test]
    fn test_zero_area_drag_is_a_click() {
        let (mut clipper, store) = clipper(2, false);
        drag(&mut clipper, 5.0, 5.0, 5.0, 5.0);
        assert!(ids(&clipper).is_empty());
        assert_eq!(store.persisted(), vec!["out-1.jpg"]);
        assert_eq!(clipper.current().unwrap().label(), "img1");
    }

    #[test]
    fn test_undo_create_keeps_allocator() {
        let (mut clipper, _) = clipper(1, false);
        drag(&mut clipper, 0.0, 0.0, 5.0, 5.0);
        drag(&mut clipper, 10.0, 10.0, 15.0, 15.0);
        key(&mut clipper, KeyCommand::Undo);
        assert_eq!(ids(&clipper), vec![1]);

        drag(&mut clipper, 20.0, 20.0, 25.0, 25.0);
        assert_eq!(ids(&clipper), vec![1, 3]);
    }

    #[test]
    fn test_undo_then_redo_is_invisible() {
        let (mut clipper, _) = clipper(2, false);
        drag(&mut clipper, 0.0, 0.0, 10.0, 10.0);
        drag(&mut clipper, 12.0, 12.0, 30.0, 25.0);
        click(&mut clipper, Button::Primary, 2.0, 2.0);
        click(&mut clipper, Button::Middle, 20.0, 20.0);
        drag(&mut clipper, 1.0, 1.0, 4.0, 4.0);
        click(&mut clipper, Button::Secondary, 10.0, 10.0);
        click(&mut clipper, Button::Primary, 30.0, 29.0);

        // Walk the whole history back, checking each step on the way.
        let mut states = vec![state(&clipper)];
        while key(&mut clipper, KeyCommand::Undo) != Outcome::Idle {
            let before = state(&clipper);
            key(&mut clipper, KeyCommand::Redo);
            key(&mut clipper, KeyCommand::Undo);
            assert_eq!(state(&clipper), before);
            states.push(before);
        }
        states.pop();
        while let Some(expected) = states.pop() {
            key(&mut clipper, KeyCommand::Redo);
            assert_eq!(state(&clipper), expected);
        }
    }

    #[test]
    fn test_redo_after_rotation_keeps_region() {
        let (mut clipper, _) = clipper(1, false);
        drag(&mut clipper, 2.0, 2.0, 10.0, 6.0);
        let session = clipper.current().unwrap();
        let anchor = session.annotation(1).unwrap().anchor;
        let pixels = session.render_annotation(1).unwrap();

        key(&mut clipper, KeyCommand::Undo);
        clipper.handle(InputEvent::WheelRotate {
            delta: 1.0,
            modifiers: Modifiers { shift: true, ctrl: true },
        });
        key(&mut clipper, KeyCommand::Redo);

        let session = clipper.current().unwrap();
        assert_eq!(session.annotation(1).unwrap().anchor, anchor);
        assert_eq!(session.render_annotation(1).unwrap(), pixels);
    }

    #[test]
    fn test_eleventh_command_evicts_first() {
        let (mut clipper, _) = clipper(1, false);
        for i in 0..11 {
            let x = i as f64 * 3.0;
            drag(&mut clipper, x, 0.0, x + 2.0, 2.0);
        }
        while key(&mut clipper, KeyCommand::Undo) != Outcome::Idle {}
        assert_eq!(ids(&clipper), vec![1]);
    }

    #[test]
    fn test_artifact_names_follow_path() {
        let (mut clipper, store) = clipper(1, false);
        drag(&mut clipper, 0.0, 0.0, 5.0, 5.0);
        drag(&mut clipper, 10.0, 10.0, 30.0, 25.0);
        click(&mut clipper, Button::Middle, 20.0, 20.0);
        assert_eq!(clipper.markers(), &[1, 2]);

        drag(&mut clipper, 2.0, 2.0, 8.0, 6.0);
        click(&mut clipper, Button::Primary, 4.0, 4.0);
        click(&mut clipper, Button::Primary, 15.0, 1.0);

        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Persist {
                    name: "out-1-2+1.jpg".into(),
                    parent: Some("out-1-2.jpg".into()),
                    size: (6, 4),
                },
                StoreCall::Persist {
                    name: "out-1-2.jpg".into(),
                    parent: None,
                    size: (20, 15),
                },
            ]
        );
        assert_eq!(clipper.markers(), &[1]);
    }

    #[test]
    fn test_saved_annotation_is_not_saved_or_discarded_again() {
        let (mut clipper, store) = clipper(1, false);
        drag(&mut clipper, 0.0, 0.0, 5.0, 5.0);
        click(&mut clipper, Button::Primary, 2.0, 2.0);
        assert_eq!(click(&mut clipper, Button::Primary, 2.0, 2.0), Outcome::Idle);
        assert_eq!(click(&mut clipper, Button::Secondary, 2.0, 2.0), Outcome::Idle);
        assert_eq!(store.persisted(), vec!["out-1+1.jpg"]);
        assert_eq!(ids(&clipper), vec![1]);
    }

    #[test]
    fn test_discard_whole_image_undo_is_exact() {
        let (mut clipper, store) = clipper(2, false);
        drag(&mut clipper, 0.0, 0.0, 5.0, 5.0);
        drag(&mut clipper, 10.0, 10.0, 20.0, 20.0);
        clipper.handle(InputEvent::WheelRotate {
            delta: 1.0,
            modifiers: Modifiers { shift: true, ctrl: false },
        });
        let before = state(&clipper);

        click(&mut clipper, Button::Secondary, 39.0, 1.0);
        assert_eq!(clipper.current().unwrap().label(), "img1");
        key(&mut clipper, KeyCommand::Undo);

        assert_eq!(state(&clipper), before);
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_save_whole_image_undo_removes_artifact() {
        let (mut clipper, store) = clipper(2, false);
        drag(&mut clipper, 0.0, 0.0, 5.0, 5.0);
        let before = state(&clipper);

        click(&mut clipper, Button::Primary, 30.0, 20.0);
        key(&mut clipper, KeyCommand::Undo);
        assert_eq!(state(&clipper), before);
        assert_eq!(
            store.calls()[1..],
            [StoreCall::Remove("out-1.jpg".into())]
        );

        // The next image keeps its number after the round trip.
        click(&mut clipper, Button::Secondary, 30.0, 20.0);
        assert_eq!(clipper.markers(), &[2]);
        assert_eq!(clipper.current().unwrap().label(), "img1");
    }

    #[test]
    fn test_discard_unchanged_policy() {
        let (mut clipper, store) = clipper(3, true);
        click(&mut clipper, Button::Primary, 1.0, 1.0);
        assert!(store.calls().is_empty());

        clipper.handle(InputEvent::WheelRotate {
            delta: -3.0,
            modifiers: Modifiers { shift: true, ctrl: true },
        });
        drag(&mut clipper, 5.0, 5.0, 10.0, 10.0);
        click(&mut clipper, Button::Primary, 7.0, 7.0);
        click(&mut clipper, Button::Primary, 1.0, 1.0);
        // Sub-images are always written, the rotated image is too.
        assert_eq!(store.persisted(), vec!["out-2+1.jpg", "out-2.jpg"]);
    }

    #[test]
    fn test_failed_save_still_moves_on() {
        let (mut clipper, store) = clipper(2, false);
        store.fail_persist.set(true);
        click(&mut clipper, Button::Primary, 1.0, 1.0);
        assert_eq!(clipper.current().unwrap().label(), "img1");

        key(&mut clipper, KeyCommand::Undo);
        assert_eq!(clipper.current().unwrap().label(), "img0");
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_wheel_without_shift_does_nothing() {
        let (mut clipper, _) = clipper(1, false);
        let revision = clipper.revision();
        let outcome = clipper.handle(InputEvent::WheelRotate {
            delta: 1.0,
            modifiers: Modifiers::default(),
        });
        assert_eq!(outcome, Outcome::Idle);
        assert_eq!(clipper.revision(), revision);
        assert!(!clipper.current().unwrap().is_changed());
    }

    #[test]
    fn test_exhausted_input_terminates_once() {
        let (mut clipper, store) = clipper(1, false);
        assert_eq!(click(&mut clipper, Button::Secondary, 1.0, 1.0), Outcome::Quit);
        assert!(clipper.is_finished());
        assert!(clipper.current().is_none());

        assert_eq!(click(&mut clipper, Button::Secondary, 1.0, 1.0), Outcome::Idle);
        assert_eq!(key(&mut clipper, KeyCommand::Undo), Outcome::Idle);
        assert_eq!(key(&mut clipper, KeyCommand::Quit), Outcome::Idle);
        assert_eq!(store.calls(), vec![StoreCall::Finalize]);
    }

    #[test]
    fn test_quit_key_finalizes() {
        let (mut clipper, store) = clipper(2, false);
        drag(&mut clipper, 0.0, 0.0, 5.0, 5.0);
        assert_eq!(key(&mut clipper, KeyCommand::Quit), Outcome::Quit);
        assert_eq!(store.calls(), vec![StoreCall::Finalize]);
        assert_eq!(drag(&mut clipper, 0.0, 0.0, 5.0, 5.0), Outcome::Idle);
    }

    #[test]
    fn test_no_input_quits_on_start() {
        let store = RecordingStore::default();
        let mut clipper = Clipper::new(
            Navigator::new(Box::new(VecDeque::<Frame>::new())),
            Box::new(store.clone()),
            false,
        );
        assert_eq!(clipper.start(), Outcome::Quit);
        assert_eq!(store.calls(), vec![StoreCall::Finalize]);
    }

    #[test]
    fn test_fullscreen_key_is_reported() {
        let (mut clipper, _) = clipper(1, false);
        assert_eq!(key(&mut clipper, KeyCommand::ToggleFullscreen), Outcome::ToggleFullscreen);
    }
}
