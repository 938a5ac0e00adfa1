//! Comment composition controller
//!
//! This crate owns the lifecycle of a single comment-composition session:
//! the text buffer, submission state, keyboard shortcuts, and coordination
//! of an asynchronous backend save with a background polling service.
//!
//! Rendering is deliberately out of scope. The controller publishes
//! [`form_types::FormSnapshot`] values on a watch channel and answers
//! [`form_types::FormView`] queries; any rendering layer subscribes and
//! redraws on notification.

pub mod actors;
pub mod error;
pub mod keymap;
pub mod ports;
pub mod render;
pub mod session;
