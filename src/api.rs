//! HTTP API for the gift-card chat

mod handlers;
mod types;

pub use handlers::{create_router, panic_response};
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::SharedRuntime;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<SharedRuntime>,
}

impl AppState {
    pub fn new(runtime: SharedRuntime) -> Self {
        Self {
            runtime: Arc::new(runtime),
        }
    }
}
