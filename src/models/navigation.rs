// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The stack of nested sessions.
//!
//! The bottom session is a top-level input image; each session above it is a
//! crop of the one below. Next to the sessions runs a stack of path markers:
//! the bottom marker counts top-level inputs, every further marker is the id
//! of the annotation that was zoomed into. Joined together they name the
//! artifacts saved from the current session.
//!
//! Leaving the last session pulls the next input. When the input queue is
//! exhausted as well the navigator terminates.

use anyhow::Result;

use super::session::{Frame, Session};

/// Supplies top-level input images in order.
pub trait InputSource {
    /// The next input, `Err` for one that could not be read, `None` when the
    /// queue is exhausted.
    fn next_input(&mut self) -> Option<Result<Frame>>;
}

impl InputSource for std::collections::VecDeque<Frame> {
    fn next_input(&mut self) -> Option<Result<Frame>> {
        self.pop_front().map(Ok)
    }
}

/// How a descent extends the path markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    /// Move on to the next top-level input.
    Next,
    /// Enter the crop of the annotation with this id.
    Sub(u32),
}

/// What happened below the popped session.
#[derive(Debug, Clone, PartialEq)]
enum AscentKind {
    /// Back to the parent session. Carries the marker that was popped.
    Returned { marker: Option<u32> },
    /// The next input was loaded in place of the popped session.
    Advanced { marker: u32 },
    /// No input was left.
    Terminated { marker: u32 },
}

/// Record of one [`Navigator::ascend`], enough to undo it exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Ascent {
    frame: Frame,
    kind: AscentKind,
}

impl Ascent {
    /// The frame of the session that was left.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn terminated(&self) -> bool {
        matches!(self.kind, AscentKind::Terminated { .. })
    }
}

/// Stack of sessions and path markers.
pub struct Navigator {
    sessions: Vec<Session>,
    markers: Vec<u32>,
    inputs: Box<dyn InputSource>,
    /// Inputs handed back by an undone advance, with the marker they had.
    returned: Vec<(u32, Session)>,
    terminated: bool,
}

impl Navigator {
    /// A navigator with no session yet. Call [`Navigator::start`] to load
    /// the first input.
    pub fn new(inputs: Box<dyn InputSource>) -> Self {
        Self {
            sessions: Vec::new(),
            markers: vec![0],
            inputs,
            returned: Vec::new(),
            terminated: false,
        }
    }

    /// Load the first input. Returns false if there is none, which
    /// terminates the navigator right away.
    pub fn start(&mut self) -> bool {
        if self.sessions.is_empty() && !self.terminated {
            self.advance();
        }
        !self.terminated
    }

    pub fn current(&self) -> Option<&Session> {
        self.sessions.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Session> {
        self.sessions.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.sessions.len()
    }

    pub fn markers(&self) -> &[u32] {
        &self.markers
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Enter `frame` as the new current session.
    pub fn descend(&mut self, frame: Frame, step: PathStep) {
        match step {
            PathStep::Next => {
                if let Some(top) = self.markers.last_mut() {
                    *top += 1;
                }
            }
            PathStep::Sub(id) => self.markers.push(id),
        }
        log::debug!("Entering {} at {:?}", frame.label, self.markers);
        self.sessions.push(Session::from(frame));
    }

    /// Leave the current session. Its annotations are dropped; the frame is
    /// kept in the returned record. Does nothing once terminated.
    pub fn ascend(&mut self) -> Option<Ascent> {
        if self.terminated {
            return None;
        }
        let session = self.sessions.pop()?;

        let kind = if !self.sessions.is_empty() {
            let marker = if self.markers.len() > 1 {
                self.markers.pop()
            } else {
                None
            };
            AscentKind::Returned { marker }
        } else {
            let marker = self.top_marker();
            if self.advance() {
                AscentKind::Advanced { marker }
            } else {
                AscentKind::Terminated { marker }
            }
        };

        log::debug!("Left {} ({:?})", session.label(), kind);
        Some(Ascent {
            frame: session.into_frame(),
            kind,
        })
    }

    /// Undo an ascent: the frame becomes the current session again and the
    /// markers are put back as they were. The caller restores annotations.
    pub fn restore(&mut self, ascent: Ascent) {
        match ascent.kind {
            AscentKind::Returned { marker } => {
                if let Some(marker) = marker {
                    self.markers.push(marker);
                }
            }
            AscentKind::Advanced { marker } => {
                if let Some(next) = self.sessions.pop() {
                    self.returned.push((self.top_marker(), next));
                }
                self.set_top_marker(marker);
            }
            AscentKind::Terminated { marker } => {
                self.terminated = false;
                self.set_top_marker(marker);
            }
        }
        log::debug!("Back in {} at {:?}", ascent.frame.label, self.markers);
        self.sessions.push(Session::from(ascent.frame));
    }

    fn top_marker(&self) -> u32 {
        self.markers.last().copied().unwrap_or(0)
    }

    fn set_top_marker(&mut self, marker: u32) {
        if let Some(top) = self.markers.last_mut() {
            *top = marker;
        }
    }

    /// Load the next top-level input, skipping unreadable ones. Every
    /// attempted input consumes one marker value.
    fn advance(&mut self) -> bool {
        if let Some((marker, session)) = self.returned.pop() {
            self.set_top_marker(marker);
            self.sessions.push(session);
            return true;
        }

        while let Some(input) = self.inputs.next_input() {
            match input {
                Ok(frame) => {
                    self.descend(frame, PathStep::Next);
                    return true;
                }
                Err(e) => {
                    let top = self.top_marker();
                    self.set_top_marker(top + 1);
                    log::warn!("Skipping input {}: {:#}", top + 1, e);
                }
            }
        }

        log::info!("No more input images");
        self.terminated = true;
        false
    }
}
