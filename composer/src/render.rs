//! Pure view-model construction for the comment form.
//!
//! `render` is a function of (snapshot, user context, config) with no side
//! effects; the actor answers `Rendered` queries with it and any rendering
//! layer can call it against a subscribed snapshot.

use form_types::{
    ButtonView, DocsLink, EditorView, FormConfig, FormSnapshot, FormState, FormView, TextareaView,
    UserContext,
};

pub const TEXTAREA_PLACEHOLDER: &str = "Write a comment or drag your files here...";
pub const SIGNED_OUT_PROMPT: &str = "Please register or sign in to reply";
pub const SUBMIT_LABEL: &str = "Comment";
pub const CLOSE_ISSUE_LABEL: &str = "Close issue";
pub const COMMENT_AND_CLOSE_LABEL: &str = "Comment & close issue";
pub const DISCARD_LABEL: &str = "Discard draft";
pub const MARKDOWN_HELP_LABEL: &str = "Markdown";
pub const QUICK_ACTIONS_HELP_LABEL: &str = "quick actions";

pub fn render(snapshot: &FormSnapshot, user: &UserContext, config: &FormConfig) -> FormView {
    if !user.is_logged_in {
        return FormView::SignedOut {
            prompt: SIGNED_OUT_PROMPT.to_string(),
        };
    }

    let buffer_empty = snapshot.note_text.is_empty();
    let busy = snapshot.is_submitting || snapshot.state == FormState::ClosingIssue;

    let action_label = if buffer_empty {
        CLOSE_ISSUE_LABEL
    } else {
        COMMENT_AND_CLOSE_LABEL
    };

    FormView::Editor(EditorView {
        textarea: TextareaView {
            placeholder: TEXTAREA_PLACEHOLDER.to_string(),
            disabled: snapshot.is_submitting,
            supports_quick_actions: true,
        },
        // Disabled iff the buffer is empty or a request is outstanding;
        // derived from state, never from the DOM.
        submit_button: ButtonView {
            label: SUBMIT_LABEL.to_string(),
            disabled: buffer_empty || busy,
        },
        action_button: ButtonView {
            label: action_label.to_string(),
            disabled: busy,
        },
        discard_button: (!buffer_empty).then(|| ButtonView {
            label: DISCARD_LABEL.to_string(),
            disabled: busy,
        }),
        confidential_warning: user.is_confidential_issue,
        markdown_help: DocsLink {
            label: MARKDOWN_HELP_LABEL.to_string(),
            href: config.markdown_docs_path.clone(),
        },
        quick_actions_help: DocsLink {
            label: QUICK_ACTIONS_HELP_LABEL.to_string(),
            href: config.quick_actions_docs_path.clone(),
        },
    })
}
