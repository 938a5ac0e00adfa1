//! Collaborator ports consumed by the composer.
//!
//! All three are opaque to the controller: it calls them, observes
//! success/failure, and owns none of their behavior. Hosts inject
//! implementations as `Arc<dyn ...>` at spawn.

use async_trait::async_trait;

use crate::error::SaveError;

/// Backend that persists notes and issue state.
#[async_trait]
pub trait NotesBackend: Send + Sync {
    /// Persist a note. Success/failure only, no partial results.
    async fn save_note(&self, text: &str) -> Result<(), SaveError>;

    /// Toggle the open/closed state of the issue (the empty-submit path).
    async fn toggle_issue_state(&self) -> Result<(), SaveError>;

    /// Content of the current user's most recent note, if any, for the
    /// edit-last-note flow.
    async fn current_user_last_note(&self) -> Option<String>;
}

/// Background data-refresh cycle for the notes list.
///
/// Stop/restart are always called in pairs around a save so incoming data
/// never races the optimistic local state.
#[async_trait]
pub trait PollingService: Send + Sync {
    async fn stop_polling(&self);
    async fn restart_polling(&self);
}

/// Host-side text input surface.
pub trait EditorSurface: Send + Sync {
    /// Resize the input to fit its content. Invoked after the buffer
    /// shrinks (submit, discard) or grows (edit-last-note load).
    fn resize_to_fit(&self);
}
