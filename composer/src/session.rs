//! Composition session - the in-memory state of one not-yet-submitted draft.
//!
//! Invariants:
//! - `is_submitting` is true only while a save request is outstanding.
//! - The buffer is cleared synchronously when a submission begins
//!   (optimistic clear), independent of save completion.
//!
//! The session is exclusively owned by one composer actor; it is created at
//! spawn and destroyed at stop, with no persistence in between.

use form_types::{FormSnapshot, FormState};

#[derive(Debug, Default)]
pub struct CompositionSession {
    note_text: String,
    is_submitting: bool,
    is_editing: bool,
    closing_issue: bool,
    last_save_error: Option<String>,
}

impl CompositionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_text(&self) -> &str {
        &self.note_text
    }

    pub fn is_empty(&self) -> bool {
        self.note_text.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_closing(&self) -> bool {
        self.closing_issue
    }

    pub fn set_note_text(&mut self, text: String) {
        self.note_text = text;
    }

    /// Start a save: clears the buffer immediately and returns the drained
    /// draft for the backend call.
    pub fn begin_submission(&mut self) -> String {
        self.is_submitting = true;
        self.is_editing = false;
        self.last_save_error = None;
        std::mem::take(&mut self.note_text)
    }

    /// Settle the outstanding save, recording any failure for the
    /// presentation layer.
    pub fn finish_submission(&mut self, error: Option<String>) {
        self.is_submitting = false;
        self.last_save_error = error;
    }

    /// Start the empty-submit path: a pure issue-state toggle, no note save.
    pub fn begin_closing(&mut self) {
        self.closing_issue = true;
        self.last_save_error = None;
    }

    pub fn finish_closing(&mut self, error: Option<String>) {
        self.closing_issue = false;
        self.last_save_error = error;
    }

    /// Load prior content into the buffer for the edit-last-note flow.
    pub fn begin_editing(&mut self, text: String) {
        self.note_text = text;
        self.is_editing = true;
    }

    /// Throw the draft away and return to Idle.
    pub fn discard(&mut self) {
        self.note_text.clear();
        self.is_editing = false;
    }

    pub fn state(&self) -> FormState {
        if self.is_submitting {
            FormState::Submitting
        } else if self.closing_issue {
            FormState::ClosingIssue
        } else if self.note_text.is_empty() {
            FormState::Idle
        } else {
            FormState::Composing
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            note_text: self.note_text.clone(),
            is_submitting: self.is_submitting,
            is_editing: self.is_editing,
            state: self.state(),
            last_save_error: self.last_save_error.clone(),
        }
    }
}
