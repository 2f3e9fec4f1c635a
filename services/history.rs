/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Generic undo/redo over whole-state snapshots.

use std::collections::VecDeque;

/// Default cap on retained undo steps.
pub const DEFAULT_UNDO_LIMIT: usize = 128;

/// Three-stack snapshot history: `past` (oldest first), `present`, `future`
/// (next redo first).
#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    limit: usize,
}

impl<T: Clone> History<T> {
    pub fn new(present: T) -> Self {
        Self::with_limit(present, DEFAULT_UNDO_LIMIT)
    }

    /// History that keeps at most `limit` undo steps (0 disables the cap).
    pub fn with_limit(present: T, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present,
            future: VecDeque::new(),
            limit,
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    /// Apply `f` to the present state as one undo step.
    ///
    /// `f` returns `None` for a no-op, which leaves both stacks untouched.
    /// Returns whether a step was recorded.
    pub fn mutate(&mut self, f: impl FnOnce(&T) -> Option<T>) -> bool {
        let Some(next) = f(&self.present) else {
            return false;
        };
        let previous = std::mem::replace(&mut self.present, next);
        self.past.push_back(previous);
        self.future.clear();
        if self.limit > 0 && self.past.len() > self.limit {
            let excess = self.past.len() - self.limit;
            self.past.drain(0..excess);
        }
        true
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        true
    }

    /// Replace the present and forget both stacks. Used for loads, which
    /// must not be undoable back into a previous session.
    pub fn reset(&mut self, present: T) {
        self.past.clear();
        self.future.clear();
        self.present = present;
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}

impl<T: Clone + Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
