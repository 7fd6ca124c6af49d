// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Undo/redo history of reversible commands.
//!
//! A command keeps whatever it learned while running forward (an allocated
//! id, a written artifact, the session it left) in its own fields, so that
//! running it backward and forward again reproduces the same state.

pub mod commands;

use crate::controller::Workspace;
use std::collections::VecDeque;

/// Number of commands kept. Older ones are dropped for good.
pub const HISTORY_CAPACITY: usize = 10;

/// A reversible unit of work.
pub trait Command {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Do (or redo) the command.
    fn forward(&mut self, ws: &mut Workspace);

    /// Undo the command.
    fn backward(&mut self, ws: &mut Workspace);
}

/// Bounded undo/redo stack.
///
/// Entries before `cursor` are done and can be undone, entries from
/// `cursor` on were undone and can be redone.
pub struct History {
    entries: VecDeque<Box<dyn Command>>,
    cursor: usize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            cursor: 0,
            capacity,
        }
    }

    /// Run `cmd` and record it, dropping anything that could have been
    /// redone.
    pub fn push(&mut self, mut cmd: Box<dyn Command>, ws: &mut Workspace) {
        self.entries.truncate(self.cursor);

        log::debug!("Do {} ({} undoable)", cmd.name(), self.len());
        cmd.forward(ws);
        self.entries.push_back(cmd);
        self.cursor += 1;

        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                log::debug!("History full, forgetting {}", evicted.name());
            }
            self.cursor -= 1;
        }
    }

    /// Undo the most recent done command. Returns false if there is none.
    pub fn undo(&mut self, ws: &mut Workspace) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let cmd = &mut self.entries[self.cursor];
        log::debug!("Undo {}", cmd.name());
        cmd.backward(ws);
        true
    }

    /// Redo the next undone command. Returns false if there is none.
    pub fn redo(&mut self, ws: &mut Workspace) -> bool {
        let Some(cmd) = self.entries.get_mut(self.cursor) else {
            return false;
        };
        log::debug!("Redo {}", cmd.name());
        cmd.forward(ws);
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
