pub mod composer;

pub use composer::{ComposerActor, ComposerArguments, ComposerMsg, ComposerOptions};
