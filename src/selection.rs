//! Explicit selection state for a document view.
//!
//! Operations that depend on "the selected step" take this value as an
//! argument instead of reaching into ambient context, so collection and
//! outline operations stay pure functions of their inputs.

use crate::document::{StepCollection, StepId};

/// Currently selected step, if any
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<StepId>,
}

impl Selection {
    pub fn select(&mut self, id: StepId) {
        self.selected = Some(id);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<StepId> {
        self.selected
    }

    /// Position of the selected step in the collection; `None` when nothing
    /// is selected or the step no longer exists there.
    pub fn position(&self, steps: &StepCollection) -> Option<usize> {
        steps.position(self.selected?)
    }

    /// Drop the selection if it pointed at a step that was just removed
    pub fn note_removed(&mut self, id: StepId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
    }
}
