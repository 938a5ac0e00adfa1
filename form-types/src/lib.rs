//! Shared types between the comment composer and its rendering layers
//!
//! These types are used by both:
//! - the composer actor (native Rust)
//! - rendering layers (native widgets or WASM components)
//!
//! Serializable with serde for JSON over WebSocket/HTTP

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ============================================================================
// Session Inputs
// ============================================================================

/// Read-only user/issue context, supplied at spawn.
///
/// The composer never reaches into ambient session state; everything it
/// needs to know about the viewer arrives through this struct.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export)]
pub struct UserContext {
    pub is_logged_in: bool,
    pub is_confidential_issue: bool,
}

/// External documentation targets rendered alongside the form.
///
/// Supplied by the host at spawn, never hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export)]
pub struct FormConfig {
    pub markdown_docs_path: String,
    pub quick_actions_docs_path: String,
}

// ============================================================================
// Session State
// ============================================================================

/// Composition session phase, derived from the session fields.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FormState {
    #[default]
    Idle,
    Composing,
    Submitting,
    ClosingIssue,
}

/// Serializable projection of one composition session.
///
/// Published on the composer's watch channel after every mutation; the
/// rendering layer subscribes and redraws on change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct FormSnapshot {
    pub note_text: String,
    pub is_submitting: bool,
    pub is_editing: bool,
    pub state: FormState,
    /// Most recent save/toggle failure, for the presentation layer.
    /// The composer never retries; it only reports.
    pub last_save_error: Option<String>,
}

// ============================================================================
// Rendering Contract
// ============================================================================

/// Declarative view model for the comment form.
///
/// This is the whole rendering contract: a renderer draws exactly what the
/// view model says and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(tag = "kind")]
#[ts(export)]
pub enum FormView {
    /// No input surface for signed-out viewers, just a static prompt.
    SignedOut { prompt: String },
    Editor(EditorView),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct EditorView {
    pub textarea: TextareaView,
    pub submit_button: ButtonView,
    pub action_button: ButtonView,
    /// Present only while there is a draft to throw away.
    pub discard_button: Option<ButtonView>,
    pub confidential_warning: bool,
    pub markdown_help: DocsLink,
    pub quick_actions_help: DocsLink,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct TextareaView {
    pub placeholder: String,
    pub disabled: bool,
    /// Discoverable capability flag: quick inline commands are always
    /// supported by this input.
    pub supports_quick_actions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct ButtonView {
    pub label: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct DocsLink {
    pub label: String,
    pub href: String,
}

// ============================================================================
// Tests
// ============================================================================
