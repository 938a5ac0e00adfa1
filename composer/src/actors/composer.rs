//! ComposerActor - owns one comment-composition session.
//!
//! The mailbox is the ordering guarantee: a Submit handler clears the
//! buffer, fires the resize side effect, and pauses polling before the
//! backend task is spawned, so any read processed after Submit observes the
//! optimistic state without waiting on the backend. Save completions come
//! back as messages (`SaveSettled`) correlated by ULID, which drops stale
//! settlements for free.
//!
//! State-change notification is an explicit contract: every mutation
//! publishes a `FormSnapshot` on a watch channel that rendering layers
//! subscribe to via `Updates`.

use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::sync::Arc;
use tokio::sync::watch;

use form_types::{FormConfig, FormSnapshot, FormView, UserContext};

use crate::error::{ComposerError, SaveError};
use crate::keymap::{ComposerAction, KeyChord, Keymap};
use crate::ports::{EditorSurface, NotesBackend, PollingService};
use crate::render::render;
use crate::session::CompositionSession;

pub struct ComposerArguments {
    pub backend: Arc<dyn NotesBackend>,
    pub polling: Arc<dyn PollingService>,
    pub surface: Arc<dyn EditorSurface>,
    pub user: UserContext,
    pub config: FormConfig,
    pub keymap: Keymap,
    pub options: ComposerOptions,
}

/// Presentation-layer choices the composer does not make on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposerOptions {
    /// Put the draft back into the buffer when a save fails. Off by
    /// default; the failed draft is only reported via `last_save_error`.
    pub restore_note_on_failure: bool,
}

pub struct ComposerState {
    session: CompositionSession,
    backend: Arc<dyn NotesBackend>,
    polling: Arc<dyn PollingService>,
    surface: Arc<dyn EditorSurface>,
    user: UserContext,
    config: FormConfig,
    keymap: Keymap,
    options: ComposerOptions,
    updates: watch::Sender<FormSnapshot>,
    active_submission: Option<ActiveSubmission>,
}

struct ActiveSubmission {
    id: String,
    draft: String,
}

#[derive(Debug)]
pub enum ComposerMsg {
    /// Buffer edit from the rendering layer.
    SetNoteText { text: String },
    /// Raw chord from the rendering layer, resolved through the keymap.
    KeyPressed { chord: KeyChord },
    /// Explicit submit action (button click).
    Submit,
    /// Throw the draft away.
    Discard,
    Snapshot {
        reply: RpcReplyPort<FormSnapshot>,
    },
    Rendered {
        reply: RpcReplyPort<FormView>,
    },
    /// Subscribe to state-change notifications.
    Updates {
        reply: RpcReplyPort<watch::Receiver<FormSnapshot>>,
    },
    /// Backend save finished (cast back by the spawned save task).
    SaveSettled {
        submission_id: String,
        result: Result<(), SaveError>,
    },
    /// Issue-state toggle finished.
    ToggleSettled { result: Result<(), SaveError> },
    /// Last-note content arrived for the edit flow.
    EditLoaded { text: Option<String> },
}

#[derive(Debug, Default)]
pub struct ComposerActor;

#[async_trait]
impl Actor for ComposerActor {
    type Msg = ComposerMsg;
    type State = ComposerState;
    type Arguments = ComposerArguments;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let session = CompositionSession::new();
        let (updates, _) = watch::channel(session.snapshot());

        Ok(ComposerState {
            session,
            backend: args.backend,
            polling: args.polling,
            surface: args.surface,
            user: args.user,
            config: args.config,
            keymap: args.keymap,
            options: args.options,
            updates,
            active_submission: None,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            ComposerMsg::SetNoteText { text } => {
                state.session.set_note_text(text);
                state.publish();
            }
            ComposerMsg::KeyPressed { chord } => {
                match state.keymap.resolve(chord, state.session.is_empty()) {
                    Some(ComposerAction::SubmitNote) => {
                        tracing::debug!(action = %ComposerAction::SubmitNote, "keyboard action resolved");
                        state.handle_save(&myself).await;
                    }
                    Some(ComposerAction::EditLastNote) => {
                        tracing::debug!(action = %ComposerAction::EditLastNote, "keyboard action resolved");
                        state.begin_edit(&myself);
                    }
                    None => {}
                }
            }
            ComposerMsg::Submit => {
                state.handle_save(&myself).await;
            }
            ComposerMsg::Discard => {
                state.session.discard();
                state.surface.resize_to_fit();
                state.publish();
            }
            ComposerMsg::Snapshot { reply } => {
                let _ = reply.send(state.session.snapshot());
            }
            ComposerMsg::Rendered { reply } => {
                let view = render(&state.session.snapshot(), &state.user, &state.config);
                let _ = reply.send(view);
            }
            ComposerMsg::Updates { reply } => {
                let _ = reply.send(state.updates.subscribe());
            }
            ComposerMsg::SaveSettled {
                submission_id,
                result,
            } => {
                state.settle_save(submission_id, result).await;
            }
            ComposerMsg::ToggleSettled { result } => {
                let error = match result {
                    Ok(()) => None,
                    Err(e) => {
                        let err = ComposerError::ToggleFailed(e);
                        tracing::warn!(error = %err, "issue state toggle failed");
                        Some(err.to_string())
                    }
                };
                state.session.finish_closing(error);
                state.publish();
            }
            ComposerMsg::EditLoaded { text } => match text {
                Some(text) if state.session.is_empty() && !state.session.is_submitting() => {
                    state.session.begin_editing(text);
                    state.surface.resize_to_fit();
                    state.publish();
                }
                Some(_) => {
                    tracing::debug!("last-note content dropped; buffer no longer empty");
                }
                None => {
                    tracing::debug!("no prior note to edit");
                }
            },
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        // A destroyed session must not leak a paused-polling state, even if
        // the save never settled within the actor's lifetime.
        if state.session.is_submitting() {
            state.polling.restart_polling().await;
            state.active_submission = None;
            tracing::info!(
                actor_id = %myself.get_id(),
                "polling resumed for save still outstanding at teardown"
            );
        }
        tracing::info!(actor_id = %myself.get_id(), "ComposerActor stopped");
        Ok(())
    }
}

impl ComposerState {
    fn publish(&self) {
        let _ = self.updates.send_replace(self.session.snapshot());
    }

    /// The save action. With an empty buffer this is redefined as a pure
    /// issue-state toggle and no note save is made.
    async fn handle_save(&mut self, myself: &ActorRef<ComposerMsg>) {
        if !self.user.is_logged_in {
            tracing::warn!("submit ignored for signed-out session");
            return;
        }
        if self.session.is_submitting() || self.session.is_closing() {
            tracing::debug!("submit ignored while a request is outstanding");
            return;
        }

        if self.session.is_empty() {
            self.session.begin_closing();
            self.publish();

            let backend = self.backend.clone();
            let myself = myself.clone();
            tokio::spawn(async move {
                let result = backend.toggle_issue_state().await;
                let _ = myself.cast(ComposerMsg::ToggleSettled { result });
            });
            return;
        }

        let submission_id = ulid::Ulid::new().to_string();
        let draft = self.session.begin_submission();
        self.surface.resize_to_fit();
        self.polling.stop_polling().await;
        self.active_submission = Some(ActiveSubmission {
            id: submission_id.clone(),
            draft: draft.clone(),
        });
        self.publish();
        tracing::info!(submission_id = %submission_id, "note save started");

        let backend = self.backend.clone();
        let myself = myself.clone();
        tokio::spawn(async move {
            let result = backend.save_note(&draft).await;
            let _ = myself.cast(ComposerMsg::SaveSettled {
                submission_id,
                result,
            });
        });
    }

    async fn settle_save(&mut self, submission_id: String, result: Result<(), SaveError>) {
        let Some(active) = self.active_submission.take() else {
            tracing::debug!(submission_id = %submission_id, "settlement without active submission dropped");
            return;
        };
        if active.id != submission_id {
            tracing::debug!(submission_id = %submission_id, "stale settlement dropped");
            self.active_submission = Some(active);
            return;
        }

        let error = match result {
            Ok(()) => {
                tracing::info!(submission_id = %submission_id, "note save settled");
                None
            }
            Err(e) => {
                let err = ComposerError::SaveFailed(e);
                tracing::warn!(submission_id = %submission_id, error = %err, "note save failed");
                // Buffer restore is a presentation-layer choice, and never
                // clobbers text the user typed during the save.
                if self.options.restore_note_on_failure && self.session.is_empty() {
                    self.session.set_note_text(active.draft);
                }
                Some(err.to_string())
            }
        };

        self.session.finish_submission(error);
        self.polling.restart_polling().await;
        self.publish();
    }

    fn begin_edit(&self, myself: &ActorRef<ComposerMsg>) {
        let backend = self.backend.clone();
        let myself = myself.clone();
        tokio::spawn(async move {
            let text = backend.current_user_last_note().await;
            let _ = myself.cast(ComposerMsg::EditLoaded { text });
        });
    }
}
