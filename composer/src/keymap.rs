//! Named-action keyboard binding table.
//!
//! Shortcuts are data, not control flow: each binding pairs a chord with an
//! action and a buffer precondition, and the actor dispatches whatever the
//! table resolves. Hosts can deserialize a custom table to rebind keys.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Actions a keyboard chord can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComposerAction {
    SubmitNote,
    EditLastNote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    ArrowUp,
}

/// A key with the platform submit modifier (cmd on mac, ctrl elsewhere).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: Key,
    #[serde(default)]
    pub platform_modifier: bool,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            platform_modifier: false,
        }
    }

    pub fn with_modifier(key: Key) -> Self {
        Self {
            key,
            platform_modifier: true,
        }
    }
}

/// Buffer-state precondition gating a binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferPrecondition {
    #[default]
    Any,
    BufferEmpty,
}

impl BufferPrecondition {
    fn satisfied(self, buffer_empty: bool) -> bool {
        match self {
            BufferPrecondition::Any => true,
            BufferPrecondition::BufferEmpty => buffer_empty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Binding {
    pub chord: KeyChord,
    pub action: ComposerAction,
    #[serde(default)]
    pub precondition: BufferPrecondition,
}

impl Binding {
    /// A binding that requires the modifier only matches chords holding it;
    /// a binding that does not ignores the modifier entirely.
    fn matches(&self, chord: KeyChord) -> bool {
        self.chord.key == chord.key && (!self.chord.platform_modifier || chord.platform_modifier)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Keymap {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    /// Resolve a chord against the table. First satisfied binding wins.
    pub fn resolve(&self, chord: KeyChord, buffer_empty: bool) -> Option<ComposerAction> {
        self.bindings
            .iter()
            .find(|binding| binding.matches(chord) && binding.precondition.satisfied(buffer_empty))
            .map(|binding| binding.action)
    }
}

impl Default for Keymap {
    /// platform-modifier + Enter submits regardless of buffer state (an
    /// empty submit becomes the issue toggle); ArrowUp enters the
    /// edit-last-note flow only while the buffer is empty.
    fn default() -> Self {
        Self::new(vec![
            Binding {
                chord: KeyChord::with_modifier(Key::Enter),
                action: ComposerAction::SubmitNote,
                precondition: BufferPrecondition::Any,
            },
            Binding {
                chord: KeyChord::plain(Key::ArrowUp),
                action: ComposerAction::EditLastNote,
                precondition: BufferPrecondition::BufferEmpty,
            },
        ])
    }
}
