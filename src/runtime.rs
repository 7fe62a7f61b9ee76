//! Runtime for chat turns
//!
//! Wraps the pure state machine with session storage, per-session locking
//! and effect execution.

mod executor;
mod store;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{DialogueRuntime, RuntimeError, TurnOutcome};
pub use store::InMemorySessionStore;
pub use traits::*;

use std::sync::Arc;

/// Runtime over trait objects, so the router does not care which store or
/// token source it drives
pub type SharedRuntime = DialogueRuntime<Arc<dyn SessionStore>, Arc<dyn TokenSource>>;

impl SharedRuntime {
    pub fn shared(
        flow: crate::state_machine::FlowSettings,
        store: impl SessionStore + 'static,
        tokens: impl TokenSource + 'static,
    ) -> Self {
        DialogueRuntime::new(flow, Arc::new(store), Arc::new(tokens))
    }
}
