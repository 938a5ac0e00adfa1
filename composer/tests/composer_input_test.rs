//! Input-surface tests: keyboard dispatch, the edit-last-note flow,
//! discard, and the signed-out/confidential rendering paths through the
//! actor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ractor::{Actor, ActorRef};
use tokio::sync::watch;
use tokio::time::timeout;

use composer::actors::{ComposerActor, ComposerArguments, ComposerMsg, ComposerOptions};
use composer::error::SaveError;
use composer::keymap::{Key, KeyChord, Keymap};
use composer::ports::{EditorSurface, NotesBackend, PollingService};
use form_types::{FormConfig, FormSnapshot, FormState, FormView, UserContext};

// ============================================================================
// Mock collaborators
// ============================================================================

/// Backend whose calls settle immediately.
#[derive(Default)]
struct ImmediateBackend {
    save_calls: AtomicUsize,
    toggle_calls: AtomicUsize,
    last_note_calls: AtomicUsize,
    saved_texts: Mutex<Vec<String>>,
    last_note: Mutex<Option<String>>,
}

#[async_trait]
impl NotesBackend for ImmediateBackend {
    async fn save_note(&self, text: &str) -> Result<(), SaveError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.saved_texts.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn toggle_issue_state(&self) -> Result<(), SaveError> {
        self.toggle_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn current_user_last_note(&self) -> Option<String> {
        self.last_note_calls.fetch_add(1, Ordering::SeqCst);
        self.last_note.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct NoopPolling;

#[async_trait]
impl PollingService for NoopPolling {
    async fn stop_polling(&self) {}
    async fn restart_polling(&self) {}
}

#[derive(Default)]
struct CountingSurface {
    resizes: AtomicUsize,
}

impl EditorSurface for CountingSurface {
    fn resize_to_fit(&self) {
        self.resizes.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    backend: Arc<ImmediateBackend>,
    surface: Arc<CountingSurface>,
    actor: ActorRef<ComposerMsg>,
}

async fn spawn_composer(user: UserContext) -> Harness {
    let backend = Arc::new(ImmediateBackend::default());
    let surface = Arc::new(CountingSurface::default());

    let (actor, _handle) = Actor::spawn(
        None,
        ComposerActor,
        ComposerArguments {
            backend: backend.clone(),
            polling: Arc::new(NoopPolling),
            surface: surface.clone(),
            user,
            config: FormConfig {
                markdown_docs_path: "/help/markdown".to_string(),
                quick_actions_docs_path: "/help/quick-actions".to_string(),
            },
            keymap: Keymap::default(),
            options: ComposerOptions::default(),
        },
    )
    .await
    .unwrap();

    Harness {
        backend,
        surface,
        actor,
    }
}

fn logged_in() -> UserContext {
    UserContext {
        is_logged_in: true,
        is_confidential_issue: false,
    }
}

async fn snapshot(actor: &ActorRef<ComposerMsg>) -> FormSnapshot {
    ractor::call!(actor, |reply| ComposerMsg::Snapshot { reply }).unwrap()
}

async fn rendered(actor: &ActorRef<ComposerMsg>) -> FormView {
    ractor::call!(actor, |reply| ComposerMsg::Rendered { reply }).unwrap()
}

async fn subscribe(actor: &ActorRef<ComposerMsg>) -> watch::Receiver<FormSnapshot> {
    ractor::call!(actor, |reply| ComposerMsg::Updates { reply }).unwrap()
}

async fn wait_for(
    rx: &mut watch::Receiver<FormSnapshot>,
    what: &str,
    predicate: impl FnMut(&FormSnapshot) -> bool,
) -> FormSnapshot {
    timeout(Duration::from_secs(2), rx.wait_for(predicate))
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"))
        .unwrap()
        .clone()
}

// ============================================================================
// Keyboard dispatch
// ============================================================================

#[tokio::test]
async fn test_modifier_enter_saves_note() {
    let h = spawn_composer(logged_in()).await;
    let mut rx = subscribe(&h.actor).await;

    h.actor
        .cast(ComposerMsg::SetNoteText {
            text: "Foo".to_string(),
        })
        .unwrap();
    h.actor
        .cast(ComposerMsg::KeyPressed {
            chord: KeyChord::with_modifier(Key::Enter),
        })
        .unwrap();

    let snap = wait_for(&mut rx, "keyboard save to settle", |s| {
        !s.is_submitting && s.note_text.is_empty() && s.state == FormState::Idle
    })
    .await;
    assert!(snap.last_save_error.is_none());
    assert_eq!(h.backend.saved_texts.lock().unwrap().as_slice(), ["Foo"]);
}

#[tokio::test]
async fn test_plain_enter_does_nothing() {
    let h = spawn_composer(logged_in()).await;

    h.actor
        .cast(ComposerMsg::SetNoteText {
            text: "Foo".to_string(),
        })
        .unwrap();
    h.actor
        .cast(ComposerMsg::KeyPressed {
            chord: KeyChord::plain(Key::Enter),
        })
        .unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    let snap = snapshot(&h.actor).await;
    assert_eq!(snap.note_text, "Foo");
    assert_eq!(h.backend.save_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.backend.toggle_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_modifier_enter_with_empty_buffer_toggles_issue() {
    let h = spawn_composer(logged_in()).await;
    let mut rx = subscribe(&h.actor).await;

    h.actor
        .cast(ComposerMsg::KeyPressed {
            chord: KeyChord::with_modifier(Key::Enter),
        })
        .unwrap();

    let backend = h.backend.clone();
    timeout(Duration::from_secs(2), async move {
        while backend.toggle_calls.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("issue toggle was never called");

    wait_for(&mut rx, "toggle to settle", |s| s.state == FormState::Idle).await;
    assert_eq!(h.backend.save_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.backend.toggle_calls.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Edit-last-note flow
// ============================================================================

#[tokio::test]
async fn test_arrow_up_loads_last_note_into_buffer() {
    let h = spawn_composer(logged_in()).await;
    *h.backend.last_note.lock().unwrap() = Some("previous note".to_string());
    let mut rx = subscribe(&h.actor).await;

    h.actor
        .cast(ComposerMsg::KeyPressed {
            chord: KeyChord::plain(Key::ArrowUp),
        })
        .unwrap();

    let snap = wait_for(&mut rx, "last note to load", |s| s.is_editing).await;
    assert_eq!(snap.note_text, "previous note");
    assert_eq!(snap.state, FormState::Composing);
    // Growing the buffer resizes the input.
    assert_eq!(h.surface.resizes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_arrow_up_is_noop_when_buffer_has_text() {
    let h = spawn_composer(logged_in()).await;
    *h.backend.last_note.lock().unwrap() = Some("previous note".to_string());

    h.actor
        .cast(ComposerMsg::SetNoteText {
            text: "draft in progress".to_string(),
        })
        .unwrap();
    h.actor
        .cast(ComposerMsg::KeyPressed {
            chord: KeyChord::plain(Key::ArrowUp),
        })
        .unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    let snap = snapshot(&h.actor).await;
    assert_eq!(snap.note_text, "draft in progress");
    assert!(!snap.is_editing);
    assert_eq!(h.backend.last_note_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_arrow_up_with_no_prior_note_leaves_session_idle() {
    let h = spawn_composer(logged_in()).await;

    h.actor
        .cast(ComposerMsg::KeyPressed {
            chord: KeyChord::plain(Key::ArrowUp),
        })
        .unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    let snap = snapshot(&h.actor).await;
    assert!(snap.note_text.is_empty());
    assert!(!snap.is_editing);
    assert_eq!(snap.state, FormState::Idle);
}

// ============================================================================
// Discard
// ============================================================================

#[tokio::test]
async fn test_discard_clears_buffer_and_resizes_once() {
    let h = spawn_composer(logged_in()).await;

    h.actor
        .cast(ComposerMsg::SetNoteText {
            text: "foo".to_string(),
        })
        .unwrap();
    h.actor.cast(ComposerMsg::Discard).unwrap();

    let snap = snapshot(&h.actor).await;
    assert!(snap.note_text.is_empty());
    assert_eq!(snap.state, FormState::Idle);
    assert_eq!(h.surface.resizes.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Rendering through the actor
// ============================================================================

#[tokio::test]
async fn test_signed_out_session_renders_prompt_and_ignores_submit() {
    let h = spawn_composer(UserContext {
        is_logged_in: false,
        is_confidential_issue: false,
    })
    .await;

    match rendered(&h.actor).await {
        FormView::SignedOut { prompt } => {
            assert_eq!(prompt, "Please register or sign in to reply");
        }
        FormView::Editor(_) => panic!("signed-out session must not render an editor"),
    }

    h.actor.cast(ComposerMsg::Submit).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(h.backend.save_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.backend.toggle_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_confidential_issue_renders_warning() {
    let h = spawn_composer(UserContext {
        is_logged_in: true,
        is_confidential_issue: true,
    })
    .await;

    match rendered(&h.actor).await {
        FormView::Editor(editor) => {
            assert!(editor.confidential_warning);
            assert_eq!(editor.markdown_help.href, "/help/markdown");
            assert_eq!(editor.quick_actions_help.href, "/help/quick-actions");
        }
        FormView::SignedOut { .. } => panic!("expected editor view"),
    }
}

#[tokio::test]
async fn test_action_button_label_follows_buffer_through_actor() {
    let h = spawn_composer(logged_in()).await;

    match rendered(&h.actor).await {
        FormView::Editor(editor) => {
            assert_eq!(editor.action_button.label, "Close issue");
            assert!(editor.submit_button.disabled);
        }
        FormView::SignedOut { .. } => panic!("expected editor view"),
    }

    h.actor
        .cast(ComposerMsg::SetNoteText {
            text: "Foo".to_string(),
        })
        .unwrap();

    match rendered(&h.actor).await {
        FormView::Editor(editor) => {
            assert_eq!(editor.action_button.label, "Comment & close issue");
            assert!(!editor.submit_button.disabled);
            assert!(editor.discard_button.is_some());
        }
        FormView::SignedOut { .. } => panic!("expected editor view"),
    }
}
