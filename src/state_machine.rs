//! Core dialogue state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the runtime hands a session, a turn context and an event to
//! [`transition`] and gets back the next session, a reply and effects.

mod business;
mod effect;
pub mod event;
mod personal;
pub mod prompts;
pub mod reply;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Event, FormSubmission};
pub use reply::{Reply, UiHint};
pub use state::{Draft, FlowSettings, FlowVariant, Recipient, Session, Stage};
pub use transition::{transition, TransitionError, TransitionResult, TurnContext};
