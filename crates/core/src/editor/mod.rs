//! Section Editor Controller.
//!
//! [`SectionEditor`] is the pure state machine: every user intent and every
//! server outcome goes through [`SectionEditor::apply`], which updates the
//! state and returns the [`Effect`] to run. [`EditorController`] runs those
//! effects against a [`ContentStore`](crate::client::ContentStore).

mod controller;
mod error;
mod state;

pub use controller::EditorController;
pub use error::EditorError;
pub use state::{Effect, EditorEvent, SectionEditor};
