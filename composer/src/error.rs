//! Error types for the composition session.
//!
//! There are no fatal conditions here: every failure resets the session to
//! Idle or Composing and is handed to the presentation layer.

use thiserror::Error;

/// Failure reported by a backend collaborator (reject or timeout).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct SaveError {
    pub reason: String,
}

impl SaveError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Composer-level failures surfaced to the presentation layer.
///
/// Never retried and never swallowed: the session resets `is_submitting`
/// and reports the condition through the snapshot channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposerError {
    #[error("note save failed: {0}")]
    SaveFailed(SaveError),

    #[error("issue state toggle failed: {0}")]
    ToggleFailed(SaveError),
}
