//! Trait abstractions for runtime I/O
//!
//! These traits let the turn runner be tested with deterministic mocks.

use crate::state_machine::Session;
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to one live session; holding its lock serializes turns
pub type SessionHandle = Arc<Mutex<Session>>;

/// A session resolved for the current turn
#[derive(Debug, Clone)]
pub struct SessionLease {
    pub session_id: String,
    pub session: SessionHandle,
    /// True when the id was absent, unknown or expired and a new session was minted
    pub created: bool,
}

/// Storage for dialogue sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolve `session_id` to a live session, minting a fresh one at idle
    /// when the id is absent, unknown or expired
    async fn checkout(&self, session_id: Option<&str>) -> Result<SessionLease, String>;

    /// Current state of a session without touching it
    async fn snapshot(&self, session_id: &str) -> Option<Session>;

    /// Number of live sessions
    async fn len(&self) -> usize;
}

/// Source of the random token minted into links and reference codes
pub trait TokenSource: Send + Sync {
    fn token(&self) -> String;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn checkout(&self, session_id: Option<&str>) -> Result<SessionLease, String> {
        (**self).checkout(session_id).await
    }

    async fn snapshot(&self, session_id: &str) -> Option<Session> {
        (**self).snapshot(session_id).await
    }

    async fn len(&self) -> usize {
        (**self).len().await
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Arc<T> {
    fn token(&self) -> String {
        (**self).token()
    }
}

// ============================================================================
// Production token source
// ============================================================================

const TOKEN_LEN: usize = 12;

/// Lowercase alphanumeric tokens from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokens;

impl TokenSource for RandomTokens {
    fn token(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect()
    }
}
